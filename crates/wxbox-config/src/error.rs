//! Error types for configuration synthesis.

use std::path::PathBuf;

use thiserror::Error;
use wxbox_browsers::ResolutionError;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid build options: {0}")]
    InvalidValue(String),

    /// The extension source directory does not exist (or is not a directory).
    #[error("source directory not found: {}", .path.display())]
    SourceDirMissing { path: PathBuf },

    /// The extension source directory exists but cannot be listed.
    #[error("source directory is not readable: {}", .path.display())]
    SourceDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// name/version/description could not be read from the source tree.
    #[error("malformed extension metadata in {}: {reason}", .path.display())]
    MetadataMalformed { path: PathBuf, reason: String },

    /// Two discovered files map to the same entry name.
    #[error("entry '{name}' is provided by both {} and {}", .first.display(), .second.display())]
    DuplicateEntry {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target vendor version could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl miette::Diagnostic for ConfigError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            ConfigError::InvalidValue(_) => "INVALID_VALUE",
            ConfigError::SourceDirMissing { .. } => "SOURCE_DIR_MISSING",
            ConfigError::SourceDirUnreadable { .. } => "SOURCE_DIR_UNREADABLE",
            ConfigError::MetadataMalformed { .. } => "METADATA_MALFORMED",
            ConfigError::DuplicateEntry { .. } => "DUPLICATE_ENTRY",
            ConfigError::InvalidPattern { .. } => "INVALID_PATTERN",
            ConfigError::Walk(_) => "WALK_ERROR",
            ConfigError::Io(_) => "IO_ERROR",
            ConfigError::Resolution(_) => "RESOLUTION_ERROR",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            ConfigError::SourceDirMissing { path } => Some(Box::new(format!(
                "Create {} or point `source_dir` at your extension sources",
                path.display()
            ))),
            ConfigError::MetadataMalformed { .. } => Some(Box::new(
                "manifest.json (or the project's package.json) must provide `name` and `version`",
            )),
            ConfigError::DuplicateEntry { .. } => Some(Box::new(
                "Entry names drop the file extension; rename one of the files",
            )),
            ConfigError::Resolution(ResolutionError::UnknownVendor { .. }) => Some(Box::new(
                "Use a browserslist browser name such as chrome, firefox, opera or edge",
            )),
            ConfigError::Resolution(_) => Some(Box::new(
                "Pin a version (e.g. `vendor_version = 90`) or widen your browserslist config",
            )),
            _ => None,
        }
    }
}
