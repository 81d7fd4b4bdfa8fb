//! # wxbox-browsers
//!
//! Target browser resolution for wxbox extension builds.
//!
//! Given a vendor (`chrome`, `firefox`, ...) and a version request (a pinned
//! number, `auto`, or nothing), this crate works out the concrete major
//! version that syntax downleveling should target.
//!
//! ```
//! use wxbox_browsers::{StaticDataset, VendorId, VersionResolver, VersionSpec};
//!
//! let dataset = StaticDataset::new()
//!     .with_versions("chrome", ["80", "90"])
//!     .configured("chrome", "90")
//!     .configured("chrome", "80");
//!
//! let resolver = VersionResolver::new(dataset);
//! let version = resolver
//!     .resolve_version(&VendorId::chrome(), &"auto".parse::<VersionSpec>().unwrap())
//!     .unwrap();
//! assert_eq!(version, 80);
//! ```

pub mod dataset;
pub mod error;
pub mod resolver;
pub mod vendor;
pub mod version_spec;

#[cfg(feature = "browserslist")]
pub mod caniuse;

pub use dataset::{CompatDataset, CompatQuery, Distribution, StaticDataset};
pub use error::{ResolutionError, Result};
pub use resolver::{ResolvedTarget, VersionResolver};
pub use vendor::{VendorFamily, VendorId};
pub use version_spec::VersionSpec;

#[cfg(feature = "browserslist")]
pub use caniuse::BrowserslistDataset;
