//! Static file copy plan.
//!
//! Everything in the source tree that the bundler does not emit itself is
//! copied verbatim into the output directory. Locale catalogs are copied by
//! a second pattern that ignores `copy_ignore`, so excluding JSON in general
//! never drops `_locales/**/messages.json`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::walk;

/// Glob selecting locale catalogs, relative to the source directory.
pub const LOCALE_PATTERN: &str = "_locales/**/*.json";

/// One declarative copy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPattern {
    /// Directory `from` and `ignore` are relative to
    pub context: PathBuf,
    /// Files to copy
    pub from: String,
    /// Files to skip
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    /// Destination directory; relative layout is preserved
    pub to: PathBuf,
}

/// A concrete file copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// The standard patterns: everything except `copy_ignore`, then locales.
pub fn copy_patterns(source: &Path, output: &Path, copy_ignore: &[String]) -> Vec<CopyPattern> {
    vec![
        CopyPattern {
            context: source.to_path_buf(),
            from: "**/*".to_string(),
            ignore: copy_ignore.to_vec(),
            to: output.to_path_buf(),
        },
        CopyPattern {
            context: source.to_path_buf(),
            from: LOCALE_PATTERN.to_string(),
            ignore: Vec::new(),
            to: output.to_path_buf(),
        },
    ]
}

/// Expands copy patterns against the file system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    patterns: Vec<CopyPattern>,
}

impl CopyPlan {
    pub fn new(patterns: Vec<CopyPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[CopyPattern] {
        &self.patterns
    }

    /// Concrete copies, one per destination, in pattern then file order.
    pub fn resolve(&self) -> Result<Vec<CopyOperation>> {
        let mut operations: IndexMap<PathBuf, PathBuf> = IndexMap::new();
        for pattern in &self.patterns {
            let files = walk::matching_files(
                &pattern.context,
                std::slice::from_ref(&pattern.from),
                &pattern.ignore,
                false,
            )?;
            for (relative, absolute) in files {
                operations
                    .entry(pattern.to.join(&relative))
                    .or_insert(absolute);
            }
        }

        Ok(operations
            .into_iter()
            .map(|(to, from)| CopyOperation { from, to })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_pattern_never_ignores() {
        let patterns = copy_patterns(
            Path::new("/ext/app"),
            Path::new("/ext/build/chrome"),
            &["**/*.json".to_string()],
        );
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].ignore, vec!["**/*.json"]);
        assert_eq!(patterns[1].from, LOCALE_PATTERN);
        assert!(patterns[1].ignore.is_empty());
    }
}
