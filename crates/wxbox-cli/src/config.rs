//! Layered build options.
//!
//! Priority, lowest first: built-in defaults, `wxbox.config.json`,
//! `WXBOX_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized};
use serde::Serialize;
use tracing::debug;
use wxbox_config::BuildOptions;

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};

/// Options file picked up from the working directory.
pub const CONFIG_FILE: &str = "wxbox.config.json";

/// Prefix of option environment variables (`WXBOX_VENDOR`, `WXBOX_DEV`, ...).
pub const ENV_PREFIX: &str = "WXBOX_";

/// Flags the user actually passed; unset ones are left out so they do not
/// shadow lower layers.
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    source_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copy_ignore: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    devtool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cwd: Option<PathBuf>,
}

impl From<&ConfigArgs> for FlagOverrides {
    fn from(args: &ConfigArgs) -> Self {
        Self {
            source_dir: args.source_dir.clone(),
            output_dir: args.output_dir.clone(),
            package_dir: args.package_dir.clone(),
            dev: args.dev.then_some(true),
            copy_ignore: (!args.copy_ignore.is_empty()).then(|| args.copy_ignore.clone()),
            devtool: args.devtool.clone(),
            minimize: args.minimize.then_some(true),
            vendor: args.target.vendor.clone(),
            vendor_version: args.target.vendor_version.clone(),
            cwd: args.cwd.clone(),
        }
    }
}

/// The options file to read: `--config`, else `wxbox.config.json` under
/// `--cwd` (or the working directory) when it exists.
fn config_file(args: &ConfigArgs) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    let base = args.cwd.as_deref().unwrap_or(Path::new("."));
    let default_path = base.join(CONFIG_FILE);
    default_path.exists().then_some(default_path)
}

/// Merge every layer into [`BuildOptions`].
pub fn load_options(args: &ConfigArgs) -> Result<BuildOptions> {
    let mut figment = Figment::new().merge(Serialized::defaults(BuildOptions::default()));

    let file = config_file(args);
    if let Some(path) = &file {
        debug!(path = %path.display(), "reading options file");
        figment = figment.merge(Json::file(path));
    }

    figment = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(FlagOverrides::from(args)));

    figment.extract().map_err(|e| CliError::Options {
        message: e.to_string(),
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;
    use wxbox_browsers::{VendorId, VersionSpec};

    fn args_in(dir: &Path) -> ConfigArgs {
        ConfigArgs {
            cwd: Some(dir.to_path_buf()),
            ..ConfigArgs::default()
        }
    }

    fn clear_env() {
        // SAFETY: every caller is #[serial].
        unsafe {
            for key in ["WXBOX_VENDOR", "WXBOX_DEV", "WXBOX_VENDOR_VERSION", "WXBOX_OUTPUT_DIR"] {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_without_any_layer() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let options = load_options(&args_in(dir.path())).unwrap();
        assert_eq!(options.vendor, VendorId::chrome());
        assert_eq!(options.output_dir, "build/[vendor]");
        assert_eq!(options.copy_ignore, ["**/*.js", "**/*.json"]);
        assert_eq!(options.cwd.as_deref(), Some(dir.path()));
    }

    #[test]
    #[serial]
    fn file_then_env_then_flags() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "vendor": "opera", "output_dir": "dist/[vendor]", "vendor_version": 90, "minimize": true }"#,
        )
        .unwrap();

        let options = load_options(&args_in(dir.path())).unwrap();
        assert_eq!(options.vendor.as_str(), "opera");
        assert_eq!(options.output_dir, "dist/[vendor]");
        assert_eq!(options.vendor_version, VersionSpec::Pinned(90));
        assert!(options.minimize);

        // SAFETY: #[serial]
        unsafe {
            std::env::set_var("WXBOX_VENDOR", "edge");
            std::env::set_var("WXBOX_DEV", "true");
        }
        let options = load_options(&args_in(dir.path())).unwrap();
        assert_eq!(options.vendor.as_str(), "edge");
        assert!(options.dev);

        let mut args = args_in(dir.path());
        args.target.vendor = Some("firefox".into());
        args.target.vendor_version = Some("auto".into());
        let options = load_options(&args).unwrap();
        assert_eq!(options.vendor, VendorId::firefox());
        assert_eq!(options.vendor_version, VersionSpec::Auto);
        assert_eq!(options.output_dir, "dist/[vendor]");
        clear_env();
    }

    #[test]
    #[serial]
    fn explicit_config_path_must_parse() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{ "dev": "sometimes" }"#).unwrap();

        let mut args = args_in(dir.path());
        args.config = Some(path.clone());
        let err = load_options(&args).unwrap_err();
        assert!(matches!(err, CliError::Options { file: Some(ref f), .. } if f == &path));
    }
}
