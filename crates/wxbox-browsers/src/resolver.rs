//! Vendor version resolution.
//!
//! Turns a [`VersionSpec`] into the concrete major version that syntax
//! downleveling should target.
//!
//! For `auto` and `latest` the resolver keeps the *oldest* entry that
//! survives the vendor filter: the transform pipeline has to produce code
//! that runs on the least capable browser still inside the support matrix.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{CompatDataset, CompatQuery};
use crate::error::{ResolutionError, Result};
use crate::vendor::VendorId;
use crate::version_spec::{VersionSpec, leading_integer};

/// A vendor paired with the concrete version to target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub vendor: VendorId,
    pub version: u32,
}

impl ResolvedTarget {
    pub fn new(vendor: impl Into<VendorId>, version: u32) -> Self {
        Self {
            vendor: vendor.into(),
            version,
        }
    }
}

impl fmt::Display for ResolvedTarget {
    /// Compact target id, e.g. `chrome67`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vendor, self.version)
    }
}

/// Resolves version requests against a compatibility dataset.
#[derive(Debug, Clone)]
pub struct VersionResolver<D> {
    dataset: D,
}

impl<D: CompatDataset> VersionResolver<D> {
    pub fn new(dataset: D) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Resolve `spec` for `vendor` to a major version.
    ///
    /// Pinned versions are returned without touching the dataset.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::UnknownVendor`] when the dataset has no entries for
    /// the vendor, [`ResolutionError::NoMatchingVersion`] when the query
    /// yields nothing for it.
    pub fn resolve_version(&self, vendor: &VendorId, spec: &VersionSpec) -> Result<u32> {
        let query = match spec {
            VersionSpec::Pinned(version) => {
                debug!(%vendor, version, "using pinned vendor version");
                return Ok(*version);
            }
            VersionSpec::Auto => CompatQuery::ConfiguredOrDefaults {
                vendor: vendor.clone(),
            },
            VersionSpec::Latest => CompatQuery::LastVersion {
                vendor: vendor.clone(),
            },
        };

        if self.dataset.known_versions(vendor).is_empty() {
            return Err(ResolutionError::UnknownVendor {
                vendor: vendor.to_string(),
            });
        }

        let oldest = self
            .dataset
            .query(&query)?
            .into_iter()
            .filter(|d| d.is_vendor(vendor))
            .last()
            .ok_or_else(|| ResolutionError::NoMatchingVersion {
                vendor: vendor.to_string(),
                query: query.to_string(),
            })?;

        let version =
            leading_integer(&oldest.version).ok_or_else(|| ResolutionError::UnparsableVersion {
                entry: oldest.to_string(),
            })?;

        debug!(%vendor, %spec, %query, version, "resolved vendor version");
        Ok(version)
    }

    /// Resolve `spec` into a [`ResolvedTarget`].
    pub fn resolve(&self, vendor: &VendorId, spec: &VersionSpec) -> Result<ResolvedTarget> {
        let version = self.resolve_version(vendor, spec)?;
        Ok(ResolvedTarget::new(vendor.clone(), version))
    }

    /// The newest version the dataset knows for `vendor`.
    ///
    /// Unlike [`VersionSpec::Latest`] in [`resolve_version`](Self::resolve_version),
    /// this reads the known-version list directly and issues no query.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::UnknownVendor`] when no known version of the vendor
    /// has a numeric major.
    ///
    /// # Examples
    ///
    /// ```
    /// use wxbox_browsers::{StaticDataset, VendorId, VersionResolver};
    ///
    /// let resolver = VersionResolver::new(
    ///     StaticDataset::new().with_versions("firefox", ["115", "128", "91"]),
    /// );
    /// assert_eq!(resolver.latest_version(&VendorId::firefox()).unwrap(), 128);
    /// ```
    pub fn latest_version(&self, vendor: &VendorId) -> Result<u32> {
        let versions = self.dataset.known_versions(vendor);
        let newest = versions
            .iter()
            .rev()
            .find_map(|v| leading_integer(v))
            .ok_or_else(|| ResolutionError::UnknownVendor {
                vendor: vendor.to_string(),
            })?;
        Ok(newest)
    }

    /// Compact target id such as `chrome67`.
    pub fn target_by_vendor(&self, vendor: &VendorId, spec: &VersionSpec) -> Result<String> {
        Ok(self.resolve(vendor, spec)?.to_string())
    }
}
