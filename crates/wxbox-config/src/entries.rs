//! Entry point discovery.
//!
//! Entries are the top-level scripts of the source directory plus the
//! scripts directly under `scripts/`. Discovery is a full recompute every
//! time: a watcher that notices new files calls [`EntryDiscovery::discover`]
//! again and replaces the previous map.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::walk;

/// Logical entry name → absolute source file.
pub type EntryMap = IndexMap<String, PathBuf>;

/// Script extensions that become entries.
pub const ENTRY_EXTENSIONS: &str = "{js,mjs,jsx}";

/// Discovers entry files under a source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDiscovery {
    root: PathBuf,
    patterns: Vec<String>,
}

impl EntryDiscovery {
    /// The standard entry patterns rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: vec![
                format!("*.{ENTRY_EXTENSIONS}"),
                format!("scripts/*.{ENTRY_EXTENSIONS}"),
            ],
        }
    }

    /// Custom patterns, relative to `root`.
    pub fn with_patterns(root: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        Self {
            root: root.into(),
            patterns,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Patterns joined onto the root, as a watcher would register them.
    pub fn absolute_patterns(&self) -> Vec<String> {
        let root = self.root.to_string_lossy().replace('\\', "/");
        let root = root.trim_end_matches('/');
        self.patterns
            .iter()
            .map(|pattern| format!("{root}/{pattern}"))
            .collect()
    }

    /// Scan the source tree and build a fresh entry map.
    ///
    /// The logical name is the path relative to the root without its
    /// extension (`background`, `scripts/content`).
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateEntry`] when two files share a logical name.
    pub fn discover(&self) -> Result<EntryMap> {
        let files = walk::matching_files(&self.root, &self.patterns, &[], true)?;

        let mut entries = EntryMap::with_capacity(files.len());
        for (relative, path) in files {
            let name = entry_name(&relative);
            if let Some(first) = entries.get(&name) {
                return Err(ConfigError::DuplicateEntry {
                    name,
                    first: first.clone(),
                    second: path,
                });
            }
            entries.insert(name, path);
        }
        entries.sort_keys();

        debug!(root = %self.root.display(), count = entries.len(), "discovered entries");
        Ok(entries)
    }
}

fn entry_name(relative: &str) -> String {
    match relative.rfind('.') {
        Some(dot) if !relative[dot..].contains('/') => relative[..dot].to_string(),
        _ => relative.to_string(),
    }
}
