//! Targeted source rewrites applied to third-party modules.
//!
//! A [`SourcePatch`] is a pure text rule: modules whose path matches `test`
//! have every occurrence of `search` replaced by `replace`. Rules must be
//! idempotent: applying one to its own output changes nothing.

use std::borrow::Cow;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Module path of the `browser` namespace polyfill bundle.
pub const POLYFILL_MODULE_TEST: &str = r"webextension-polyfill[\\/]+dist[\\/]+browser-polyfill\.js$";

/// Detection check in the polyfill.
pub const POLYFILL_DETECTION_SEARCH: &str = r#"typeof browser === "undefined""#;

/// Replacement check.
///
/// When the bundler force-provides `browser` as a module binding, the plain
/// `typeof` check sees the binding itself and the polyfill skips defining
/// the namespace. Looking at `window.browser` and requiring a plain-object
/// prototype only accepts a real native namespace.
pub const POLYFILL_DETECTION_REPLACE: &str = r#"typeof window.browser === "undefined" || Object.getPrototypeOf(window.browser) !== Object.prototype"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePatch {
    /// Regex matched against the module path
    pub test: String,
    pub search: String,
    pub replace: String,
}

impl SourcePatch {
    pub fn new(
        test: impl Into<String>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            search: search.into(),
            replace: replace.into(),
        }
    }

    /// The patch making the `browser` polyfill tolerate being force-provided.
    pub fn polyfill_detection() -> Self {
        Self::new(
            POLYFILL_MODULE_TEST,
            POLYFILL_DETECTION_SEARCH,
            POLYFILL_DETECTION_REPLACE,
        )
    }

    /// Whether the patch targets the module at `path`.
    ///
    /// An invalid `test` regex matches nothing.
    pub fn applies_to(&self, path: &str) -> bool {
        Regex::new(&self.test)
            .map(|re| re.is_match(path))
            .unwrap_or(false)
    }

    /// Rewrite `source`, borrowing it unchanged when nothing matches.
    pub fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        if self.search.is_empty() || !source.contains(&self.search) {
            return Cow::Borrowed(source);
        }
        Cow::Owned(source.replace(&self.search, &self.replace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLYFILL_SNIPPET: &str = r#"
if (typeof browser === "undefined") {
  module.exports = wrapAPIs(chrome);
} else {
  module.exports = browser;
}
"#;

    #[test]
    fn rewrites_detection_check() {
        let patch = SourcePatch::polyfill_detection();
        let patched = patch.apply(POLYFILL_SNIPPET);
        assert!(patched.contains(
            r#"if (typeof window.browser === "undefined" || Object.getPrototypeOf(window.browser) !== Object.prototype) {"#
        ));
        assert!(!patched.contains(POLYFILL_DETECTION_SEARCH));
        assert!(patched.contains("module.exports = browser;"));
    }

    #[test]
    fn is_idempotent() {
        let patch = SourcePatch::polyfill_detection();
        let once = patch.apply(POLYFILL_SNIPPET).into_owned();
        let twice = patch.apply(&once);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice, once);
    }

    #[test]
    fn leaves_unrelated_source_borrowed() {
        let patch = SourcePatch::polyfill_detection();
        assert!(matches!(patch.apply("export default 1;"), Cow::Borrowed(_)));
    }

    #[test]
    fn targets_only_the_polyfill_bundle() {
        let patch = SourcePatch::polyfill_detection();
        assert!(patch.applies_to("/p/node_modules/webextension-polyfill/dist/browser-polyfill.js"));
        assert!(patch.applies_to(r"C:\p\node_modules\webextension-polyfill\dist\browser-polyfill.js"));
        assert!(!patch.applies_to("/p/node_modules/webextension-polyfill/dist/browser-polyfill.min.js"));
        assert!(!patch.applies_to("/p/app/background.js"));
    }
}
