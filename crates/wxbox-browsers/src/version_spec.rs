//! Requested vendor versions.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("static regex"));

/// What the caller asked for when naming a vendor version.
///
/// Parsing never fails: anything that is neither numeric nor `auto`
/// (case-insensitive) falls back to [`VersionSpec::Latest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSpec {
    /// A pinned major version, used as-is
    Pinned(u32),
    /// The project's browserslist config restricted to the vendor, else defaults
    Auto,
    /// The vendor's most recent release
    #[default]
    Latest,
}

impl VersionSpec {
    /// Interpret an optional raw request.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(|s| s.parse().unwrap_or_default()).unwrap_or_default()
    }

    /// Returns the leading integer of a numeric string (`"67.0.1"` → 67).
    ///
    /// `None` unless the whole (trimmed) string looks like a version number.
    /// A major version past `u32::MAX` saturates, so a numeric request always
    /// stays pinned.
    pub fn numeric(raw: &str) -> Option<u32> {
        let raw = raw.trim();
        if !NUMERIC.is_match(raw) {
            return None;
        }
        Some(leading_integer(raw).unwrap_or(u32::MAX))
    }
}

/// Parses the run of ASCII digits at the start of `s`.
pub(crate) fn leading_integer(s: &str) -> Option<u32> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

impl FromStr for VersionSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(version) = Self::numeric(s) {
            return Ok(Self::Pinned(version));
        }
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        Ok(Self::Latest)
    }
}

impl From<u32> for VersionSpec {
    fn from(version: u32) -> Self {
        Self::Pinned(version)
    }
}

impl From<&str> for VersionSpec {
    fn from(raw: &str) -> Self {
        Self::parse(Some(raw))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pinned(version) => write!(f, "{version}"),
            Self::Auto => f.write_str("auto"),
            Self::Latest => f.write_str("latest"),
        }
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pinned(version) => serializer.serialize_u32(*version),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for VersionSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(version)) => Self::Pinned(version),
            Some(Raw::Text(text)) => Self::parse(Some(&text)),
            None => Self::Latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_are_pinned() {
        assert_eq!("67".parse::<VersionSpec>().unwrap(), VersionSpec::Pinned(67));
        assert_eq!(" 90.5 ".parse::<VersionSpec>().unwrap(), VersionSpec::Pinned(90));
        assert_eq!("120.0.1".parse::<VersionSpec>().unwrap(), VersionSpec::Pinned(120));
    }

    #[test]
    fn oversized_numbers_stay_pinned() {
        assert_eq!(
            "4294967296".parse::<VersionSpec>().unwrap(),
            VersionSpec::Pinned(u32::MAX)
        );
        assert_eq!(VersionSpec::numeric("99999999999.1"), Some(u32::MAX));
    }

    #[test]
    fn auto_is_case_insensitive() {
        for raw in ["auto", "AUTO", "Auto", " aUtO "] {
            assert_eq!(raw.parse::<VersionSpec>().unwrap(), VersionSpec::Auto, "{raw}");
        }
    }

    #[test]
    fn everything_else_is_latest() {
        for raw in ["", "latest", "67a", "v67", "-3", "beta"] {
            assert_eq!(raw.parse::<VersionSpec>().unwrap(), VersionSpec::Latest, "{raw}");
        }
        assert_eq!(VersionSpec::parse(None), VersionSpec::Latest);
    }

    #[test]
    fn deserializes_numbers_strings_and_null() {
        let pinned: VersionSpec = serde_json::from_str("80").unwrap();
        let text: VersionSpec = serde_json::from_str("\"81\"").unwrap();
        let auto: VersionSpec = serde_json::from_str("\"Auto\"").unwrap();
        let absent: VersionSpec = serde_json::from_str("null").unwrap();

        assert_eq!(pinned, VersionSpec::Pinned(80));
        assert_eq!(text, VersionSpec::Pinned(81));
        assert_eq!(auto, VersionSpec::Auto);
        assert_eq!(absent, VersionSpec::Latest);
    }

    #[test]
    fn serializes_back_to_request_form() {
        assert_eq!(serde_json::to_string(&VersionSpec::Pinned(9)).unwrap(), "9");
        assert_eq!(serde_json::to_string(&VersionSpec::Auto).unwrap(), "\"auto\"");
    }

    #[test]
    fn leading_integer_stops_at_first_non_digit() {
        assert_eq!(leading_integer("15.2-15.3"), Some(15));
        assert_eq!(leading_integer("TP"), None);
    }
}
