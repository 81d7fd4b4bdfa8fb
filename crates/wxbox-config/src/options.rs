//! Build options accepted by the synthesizer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wxbox_browsers::{VendorId, VersionSpec};

use crate::error::{ConfigError, Result};

/// Token in directory templates replaced by the vendor id.
pub const VENDOR_PLACEHOLDER: &str = "[vendor]";

/// Options for one extension build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Extension source directory
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Output directory template (may contain `[vendor]`)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Packaged-archive directory template (may contain `[vendor]`)
    #[serde(default = "default_package_dir")]
    pub package_dir: String,

    /// Development build
    #[serde(default)]
    pub dev: bool,

    /// Glob patterns excluded from the static copy
    #[serde(default = "default_copy_ignore")]
    pub copy_ignore: Vec<String>,

    /// Source map mode handed to the bundler (`None` disables source maps)
    #[serde(default)]
    pub devtool: Option<String>,

    /// Minify emitted bundles
    #[serde(default)]
    pub minimize: bool,

    /// Target browser vendor
    #[serde(default)]
    pub vendor: VendorId,

    /// Requested vendor version: a number, `auto`, or absent for the latest
    #[serde(default)]
    pub vendor_version: VersionSpec,

    /// Base for relative paths; defaults to the process working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("app")
}

fn default_output_dir() -> String {
    format!("build/{VENDOR_PLACEHOLDER}")
}

fn default_package_dir() -> String {
    "packages".to_string()
}

fn default_copy_ignore() -> Vec<String> {
    vec!["**/*.js".to_string(), "**/*.json".to_string()]
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            package_dir: default_package_dir(),
            dev: false,
            copy_ignore: default_copy_ignore(),
            devtool: None,
            minimize: false,
            vendor: VendorId::default(),
            vendor_version: VersionSpec::default(),
            cwd: None,
        }
    }
}

impl BuildOptions {
    /// Options for the given source directory, everything else defaulted.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Self::default()
        }
    }

    /// Create from serde_json::Value (for options assembled by a host tool)
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn vendor(mut self, vendor: impl Into<VendorId>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn vendor_version(mut self, spec: impl Into<VersionSpec>) -> Self {
        self.vendor_version = spec.into();
        self
    }

    pub fn dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn output_dir(mut self, template: impl Into<String>) -> Self {
        self.output_dir = template.into();
        self
    }

    pub fn package_dir(mut self, template: impl Into<String>) -> Self {
        self.package_dir = template.into();
        self
    }

    pub fn copy_ignore(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.copy_ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn devtool(mut self, devtool: impl Into<String>) -> Self {
        self.devtool = Some(devtool.into());
        self
    }

    pub fn minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Working directory relative paths resolve against.
    pub fn base_dir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => Ok(path_clean::clean(cwd)),
            Some(cwd) => Ok(path_clean::clean(std::env::current_dir()?.join(cwd))),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Replace `[vendor]` in a directory template.
pub fn substitute_vendor(template: &str, vendor: &VendorId) -> String {
    template.replace(VENDOR_PLACEHOLDER, vendor.as_str())
}

/// Resolve `path` against `base` into a clean absolute path.
pub fn absolutize(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    path_clean::clean(base.join(path))
}

/// Absolute paths derived from [`BuildOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub cwd: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
    pub package: PathBuf,
}

impl ResolvedPaths {
    pub fn resolve(options: &BuildOptions) -> Result<Self> {
        let cwd = options.base_dir()?;
        Ok(Self {
            source: absolutize(&cwd, &options.source_dir),
            output: absolutize(&cwd, substitute_vendor(&options.output_dir, &options.vendor)),
            package: absolutize(&cwd, substitute_vendor(&options.package_dir, &options.vendor)),
            cwd,
        })
    }
}
