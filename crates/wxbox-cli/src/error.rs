//! CLI errors and their miette rendering.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;
use wxbox_browsers::ResolutionError;
use wxbox_config::ConfigError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The layered options could not be merged into valid build options.
    #[error("invalid options: {message}")]
    Options {
        message: String,
        file: Option<PathBuf>,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert to a miette report, keeping diagnostic codes and help.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => Report::new(e),
        CliError::Resolution(e) => Report::new(ConfigError::from(e)),
        CliError::Options {
            message,
            file: Some(file),
        } => miette::miette!(
            help = "Check the options file and WXBOX_* environment variables",
            "invalid options ({}): {}",
            file.display(),
            message
        ),
        CliError::Options { message, file: None } => miette::miette!(
            help = "Check WXBOX_* environment variables and flags",
            "invalid options: {}",
            message
        ),
        other => miette::miette!("{}", other),
    }
}
