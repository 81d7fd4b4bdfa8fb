//! Extension metadata lookup.
//!
//! The synthesizer only needs `name`, `version` and `description` to seed
//! the manifest step. Loading is behind a trait so hosts can supply the
//! values from elsewhere.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Defaults seeded into the generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Supplies extension metadata for a source directory.
pub trait MetadataLoader {
    /// Load metadata from `source_dir`.
    ///
    /// # Errors
    ///
    /// Must fail with [`ConfigError::SourceDirMissing`] or
    /// [`ConfigError::SourceDirUnreadable`] when the directory is not usable.
    fn load(&self, source_dir: &Path) -> Result<ExtensionMetadata>;
}

impl<F> MetadataLoader for F
where
    F: Fn(&Path) -> Result<ExtensionMetadata>,
{
    fn load(&self, source_dir: &Path) -> Result<ExtensionMetadata> {
        self(source_dir)
    }
}

/// Fail unless `source_dir` exists, is a directory and can be listed.
pub fn ensure_source_dir(source_dir: &Path) -> Result<()> {
    match fs::metadata(source_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(ConfigError::SourceDirMissing {
                path: source_dir.to_path_buf(),
            });
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::SourceDirMissing {
                path: source_dir.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::SourceDirUnreadable {
                path: source_dir.to_path_buf(),
                source,
            });
        }
    }

    fs::read_dir(source_dir).map_err(|source| ConfigError::SourceDirUnreadable {
        path: source_dir.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Reads `manifest.json` in the source directory, filling gaps from the
/// `package.json` next to it (the project root).
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestMetadataLoader;

impl ManifestMetadataLoader {
    fn read_json(path: &Path) -> Result<Option<Value>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value = serde_json::from_str(&content).map_err(|e| ConfigError::MetadataMalformed {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Ok(Some(value))
    }

    fn field(sources: &[&Value], key: &str) -> Option<String> {
        sources
            .iter()
            .find_map(|v| v.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

impl MetadataLoader for ManifestMetadataLoader {
    fn load(&self, source_dir: &Path) -> Result<ExtensionMetadata> {
        ensure_source_dir(source_dir)?;

        let manifest_path = source_dir.join("manifest.json");
        let package_path = source_dir
            .parent()
            .map(|root| root.join("package.json"))
            .unwrap_or_else(|| PathBuf::from("package.json"));

        let manifest = Self::read_json(&manifest_path)?;
        let package = Self::read_json(&package_path)?;
        let sources: Vec<&Value> = manifest.iter().chain(package.iter()).collect();

        let missing = |key: &str| ConfigError::MetadataMalformed {
            path: manifest_path.clone(),
            reason: format!("no `{key}` in manifest.json or package.json"),
        };

        let metadata = ExtensionMetadata {
            name: Self::field(&sources, "name").ok_or_else(|| missing("name"))?,
            version: Self::field(&sources, "version").ok_or_else(|| missing("version"))?,
            description: Self::field(&sources, "description"),
        };

        debug!(
            name = %metadata.name,
            version = %metadata.version,
            "loaded extension metadata"
        );
        Ok(metadata)
    }
}
