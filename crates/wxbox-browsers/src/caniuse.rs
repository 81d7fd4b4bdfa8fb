//! Dataset backed by the browserslist/caniuse data bundled in `browserslist-rs`.

use std::path::{Path, PathBuf};

use browserslist::{Opts, resolve};
use tracing::debug;

use crate::dataset::{CompatDataset, CompatQuery, Distribution, sort_distributions};
use crate::error::{ResolutionError, Result};
use crate::vendor::VendorId;

/// Queries the real browserslist data.
///
/// `browserslist config` is looked up from `project_dir` (a
/// `.browserslistrc` file or the `browserslist` key of `package.json`).
#[derive(Debug, Clone, Default)]
pub struct BrowserslistDataset {
    project_dir: Option<PathBuf>,
}

impl BrowserslistDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for the project's browserslist config starting at `dir`.
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn run(&self, query: &str) -> Result<Vec<Distribution>> {
        let opts = Opts {
            path: self
                .project_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            ..Default::default()
        };

        let distribs = resolve([query], &opts).map_err(|err| ResolutionError::Query {
            query: query.to_string(),
            message: err.to_string(),
        })?;

        let mut result: Vec<Distribution> = distribs
            .iter()
            .map(|d| Distribution::new(d.name(), d.version()))
            .collect();
        sort_distributions(&mut result);
        debug!(query, matches = result.len(), "browserslist query");
        Ok(result)
    }
}

impl CompatDataset for BrowserslistDataset {
    fn known_versions(&self, vendor: &VendorId) -> Vec<String> {
        // Unknown browser names make browserslist reject the query.
        let Ok(all) = self.run(&format!("{vendor} > 0")) else {
            return Vec::new();
        };
        all.into_iter()
            .rev()
            .filter(|d| d.is_vendor(vendor))
            .map(|d| d.version)
            .collect()
    }

    fn query(&self, query: &CompatQuery) -> Result<Vec<Distribution>> {
        self.run(&query.to_string())
    }
}
