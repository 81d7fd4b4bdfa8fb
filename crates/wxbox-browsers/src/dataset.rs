//! Compatibility datasets.
//!
//! A dataset knows which versions exist per vendor and can answer the two
//! support-policy queries the resolver issues. Results always come back in
//! browserslist order: vendor name ascending, then version descending, so
//! the last entry for a vendor is its oldest match.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ResolutionError, Result};
use crate::vendor::VendorId;

/// A single `"<vendor> <version>"` entry returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub version: String,
}

impl Distribution {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn is_vendor(&self, vendor: &VendorId) -> bool {
        self.name == vendor.as_str()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

impl FromStr for Distribution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, version) =
            s.trim()
                .split_once(' ')
                .ok_or_else(|| ResolutionError::UnparsableVersion {
                    entry: s.to_string(),
                })?;
        Ok(Self::new(name, version.trim()))
    }
}

/// Support-policy queries issued by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatQuery {
    /// The project's configured support list restricted to `vendor`,
    /// unioned with the default support list.
    ConfiguredOrDefaults { vendor: VendorId },
    /// The most recent release of `vendor`.
    LastVersion { vendor: VendorId },
}

impl CompatQuery {
    pub fn vendor(&self) -> &VendorId {
        match self {
            Self::ConfiguredOrDefaults { vendor } | Self::LastVersion { vendor } => vendor,
        }
    }
}

impl fmt::Display for CompatQuery {
    /// Renders the query in browserslist syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfiguredOrDefaults { vendor } => {
                write!(f, "browserslist config and {vendor} > 0 or defaults")
            }
            Self::LastVersion { vendor } => write!(f, "last 1 {vendor} version"),
        }
    }
}

/// Source of browser compatibility data.
pub trait CompatDataset {
    /// Every version the dataset knows for `vendor`, oldest first.
    ///
    /// Empty when the vendor is unknown.
    fn known_versions(&self, vendor: &VendorId) -> Vec<String>;

    /// Run a support-policy query.
    fn query(&self, query: &CompatQuery) -> Result<Vec<Distribution>>;
}

impl<T: CompatDataset + ?Sized> CompatDataset for &T {
    fn known_versions(&self, vendor: &VendorId) -> Vec<String> {
        (**self).known_versions(vendor)
    }

    fn query(&self, query: &CompatQuery) -> Result<Vec<Distribution>> {
        (**self).query(query)
    }
}

/// Orders `"67.0"`-style versions numerically, segment by segment.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split(['.', '-']);
    let mut right = b.split(['.', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Sorts distributions into browserslist order.
pub fn sort_distributions(distribs: &mut [Distribution]) {
    distribs.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| compare_versions(&b.version, &a.version))
    });
}

/// An in-memory dataset.
///
/// Useful for embedders that ship their own support matrix and for tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDataset {
    /// Known versions per vendor, in any order
    #[serde(default)]
    pub versions: BTreeMap<String, Vec<String>>,

    /// The project's configured support list
    #[serde(default)]
    pub configured: Vec<Distribution>,

    /// The generic default support list
    #[serde(default)]
    pub defaults: Vec<Distribution>,
}

impl StaticDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register known versions for a vendor.
    pub fn with_versions<I, S>(mut self, vendor: &str, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.versions.entry(vendor.to_string()).or_default();
        entry.extend(versions.into_iter().map(Into::into));
        entry.sort_by(|a, b| compare_versions(a, b));
        entry.dedup();
        self
    }

    /// Add an entry to the configured support list.
    pub fn configured(mut self, vendor: &str, version: &str) -> Self {
        self.configured.push(Distribution::new(vendor, version));
        self
    }

    /// Add an entry to the default support list.
    pub fn default_entry(mut self, vendor: &str, version: &str) -> Self {
        self.defaults.push(Distribution::new(vendor, version));
        self
    }
}

impl CompatDataset for StaticDataset {
    /// Registered versions plus any the support lists mention for `vendor`.
    fn known_versions(&self, vendor: &VendorId) -> Vec<String> {
        let mut versions = self.versions.get(vendor.as_str()).cloned().unwrap_or_default();
        versions.extend(
            self.configured
                .iter()
                .chain(&self.defaults)
                .filter(|d| d.is_vendor(vendor))
                .map(|d| d.version.clone()),
        );
        versions.sort_by(|a, b| compare_versions(a, b));
        versions.dedup();
        versions
    }

    fn query(&self, query: &CompatQuery) -> Result<Vec<Distribution>> {
        let mut result: Vec<Distribution> = match query {
            CompatQuery::ConfiguredOrDefaults { vendor } => self
                .configured
                .iter()
                .filter(|d| d.is_vendor(vendor))
                .chain(self.defaults.iter())
                .cloned()
                .collect(),
            CompatQuery::LastVersion { vendor } => self
                .known_versions(vendor)
                .pop()
                .map(|newest| Distribution::new(vendor.as_str(), newest))
                .into_iter()
                .collect(),
        };

        sort_distributions(&mut result);
        result.dedup();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_render_browserslist_syntax() {
        let vendor = VendorId::chrome();
        assert_eq!(
            CompatQuery::ConfiguredOrDefaults { vendor: vendor.clone() }.to_string(),
            "browserslist config and chrome > 0 or defaults"
        );
        assert_eq!(
            CompatQuery::LastVersion { vendor }.to_string(),
            "last 1 chrome version"
        );
    }

    #[test]
    fn versions_compare_numerically() {
        assert_eq!(compare_versions("9", "10"), Ordering::Less);
        assert_eq!(compare_versions("15.2", "15.10"), Ordering::Less);
        assert_eq!(compare_versions("80", "80"), Ordering::Equal);
    }

    #[test]
    fn results_are_newest_first_per_vendor() {
        let dataset = StaticDataset::new()
            .with_versions("chrome", ["79", "80", "90"])
            .configured("chrome", "80")
            .configured("chrome", "90")
            .configured("firefox", "70")
            .default_entry("firefox", "78");

        let result = dataset
            .query(&CompatQuery::ConfiguredOrDefaults {
                vendor: VendorId::chrome(),
            })
            .unwrap();
        let rendered: Vec<String> = result.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["chrome 90", "chrome 80", "firefox 78"]);
    }

    #[test]
    fn support_lists_contribute_known_versions() {
        let dataset = StaticDataset::new()
            .with_versions("chrome", ["90"])
            .configured("chrome", "80")
            .default_entry("chrome", "120")
            .default_entry("firefox", "115");

        assert_eq!(dataset.known_versions(&VendorId::chrome()), ["80", "90", "120"]);
        assert_eq!(dataset.known_versions(&VendorId::firefox()), ["115"]);
        assert!(dataset.known_versions(&VendorId::new("netscape")).is_empty());
    }

    #[test]
    fn distribution_round_trips_through_text() {
        let distrib: Distribution = "chrome 67".parse().unwrap();
        assert_eq!(distrib, Distribution::new("chrome", "67"));
        assert!("chrome".parse::<Distribution>().is_err());
    }
}
