//! Target browser vendors.
//!
//! Vendor ids are the browserslist browser names (`chrome`, `firefox`, ...).
//! The set is open: any name the compatibility dataset knows is a valid
//! vendor, but the well-known ones carry a [`VendorFamily`] that drives
//! vendor-conditional build steps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Engine family a vendor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorFamily {
    /// Chromium-based browsers (ship the `chrome.*` extension API only)
    Chromium,
    /// Gecko-based browsers (ship the promise-based `browser.*` API natively)
    Firefox,
    /// Anything else the dataset knows about
    Other,
}

/// Identifier of a target browser vendor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VendorId(String);

impl VendorId {
    pub const CHROME: &'static str = "chrome";
    pub const OPERA: &'static str = "opera";
    pub const EDGE: &'static str = "edge";
    pub const FIREFOX: &'static str = "firefox";

    /// Vendors that receive the `browser` namespace shim.
    const CHROMIUM_FAMILY: &'static [&'static str] = &[Self::CHROME, Self::OPERA, Self::EDGE];

    /// Create a vendor id. Names are normalised to lowercase.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn chrome() -> Self {
        Self::new(Self::CHROME)
    }

    pub fn firefox() -> Self {
        Self::new(Self::FIREFOX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> VendorFamily {
        if Self::CHROMIUM_FAMILY.contains(&self.as_str()) {
            VendorFamily::Chromium
        } else if self.0 == Self::FIREFOX {
            VendorFamily::Firefox
        } else {
            VendorFamily::Other
        }
    }

    #[inline]
    pub fn is_chromium(&self) -> bool {
        self.family() == VendorFamily::Chromium
    }
}

impl Default for VendorId {
    fn default() -> Self {
        Self::chrome()
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VendorId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for VendorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VendorId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<VendorId> for String {
    fn from(value: VendorId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromium_family_members() {
        for name in ["chrome", "opera", "edge", "Chrome"] {
            assert_eq!(VendorId::new(name).family(), VendorFamily::Chromium, "{name}");
        }
    }

    #[test]
    fn firefox_and_others() {
        assert_eq!(VendorId::firefox().family(), VendorFamily::Firefox);
        assert_eq!(VendorId::new("safari").family(), VendorFamily::Other);
        assert!(!VendorId::new("and_chr").is_chromium());
    }

    #[test]
    fn display_is_normalised_name() {
        assert_eq!(VendorId::new("  FireFox ").to_string(), "firefox");
    }
}
