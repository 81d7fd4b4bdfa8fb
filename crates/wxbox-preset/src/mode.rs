//! Build mode.
//!
//! The mode is an explicit value handed to the composer and the synthesizer
//! rather than a process-wide variable, so concurrent syntheses for
//! different modes cannot observe each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable external JS tooling reads the mode from.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Transform-specific override, consulted before [`MODE_ENV_VAR`].
pub const TRANSFORM_ENV_VAR: &str = "BABEL_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl BuildMode {
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::Development } else { Self::Production }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    #[inline]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Publish the mode to `NODE_ENV` for tooling layered on top of the build.
    ///
    /// Only call this from a process that runs a single synthesis.
    pub fn export_env(&self) {
        // SAFETY: called once from the CLI's main thread before any other
        // thread is spawned.
        unsafe { std::env::set_var(MODE_ENV_VAR, self.as_str()) };
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("invalid build mode: {other}")),
        }
    }
}

/// Per-synthesis context threaded through every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildContext {
    pub mode: BuildMode,
}

impl BuildContext {
    pub fn new(mode: BuildMode) -> Self {
        Self { mode }
    }

    pub fn from_dev_flag(dev: bool) -> Self {
        Self::new(BuildMode::from_dev_flag(dev))
    }

    /// Use the mode already in the environment, else the dev flag.
    ///
    /// The first non-empty of `BABEL_ENV` and `NODE_ENV` is taken; if it does
    /// not name a mode the dev flag decides.
    pub fn detect(dev: bool) -> Self {
        let from_env = [TRANSFORM_ENV_VAR, MODE_ENV_VAR]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| value.parse().ok());
        Self::new(from_env.unwrap_or_else(|| BuildMode::from_dev_flag(dev)))
    }

    #[inline]
    pub fn is_production(&self) -> bool {
        self.mode.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_or_remove(name: &str, value: Option<&str>) {
        unsafe {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }

    fn with_env<F: FnOnce()>(babel_env: Option<&str>, node_env: Option<&str>, f: F) {
        let previous_babel = std::env::var(TRANSFORM_ENV_VAR).ok();
        let previous_node = std::env::var(MODE_ENV_VAR).ok();
        set_or_remove(TRANSFORM_ENV_VAR, babel_env);
        set_or_remove(MODE_ENV_VAR, node_env);
        f();
        set_or_remove(TRANSFORM_ENV_VAR, previous_babel.as_deref());
        set_or_remove(MODE_ENV_VAR, previous_node.as_deref());
    }

    fn with_node_env<F: FnOnce()>(value: Option<&str>, f: F) {
        with_env(None, value, f);
    }

    #[test]
    fn dev_flag_picks_mode() {
        assert_eq!(BuildMode::from_dev_flag(true), BuildMode::Development);
        assert_eq!(BuildMode::from_dev_flag(false), BuildMode::Production);
    }

    #[test]
    #[serial]
    fn detect_prefers_existing_node_env() {
        with_node_env(Some("development"), || {
            assert_eq!(BuildContext::detect(false).mode, BuildMode::Development);
        });
    }

    #[test]
    #[serial]
    fn detect_ignores_unrelated_node_env() {
        with_node_env(Some("test"), || {
            assert_eq!(BuildContext::detect(true).mode, BuildMode::Development);
            assert_eq!(BuildContext::detect(false).mode, BuildMode::Production);
        });
    }

    #[test]
    #[serial]
    fn detect_reads_babel_env_before_node_env() {
        with_env(Some("development"), Some("production"), || {
            assert_eq!(BuildContext::detect(false).mode, BuildMode::Development);
        });
        with_env(Some(""), Some("production"), || {
            assert_eq!(BuildContext::detect(true).mode, BuildMode::Production);
        });
        with_env(Some("production"), None, || {
            assert_eq!(BuildContext::detect(true).mode, BuildMode::Production);
        });
    }

    #[test]
    #[serial]
    fn export_env_writes_node_env() {
        with_node_env(None, || {
            BuildMode::Production.export_env();
            assert_eq!(std::env::var(MODE_ENV_VAR).unwrap(), "production");
        });
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Production".parse::<BuildMode>().unwrap(), BuildMode::Production);
        assert_eq!("dev".parse::<BuildMode>().unwrap(), BuildMode::Development);
        assert!("staging".parse::<BuildMode>().is_err());
    }
}
