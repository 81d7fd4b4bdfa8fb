//! Glob matching over a directory tree.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{ConfigError, Result};

/// Compile `patterns` into one matcher. `*` never crosses a `/`.
pub(crate) fn compile(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Deepest directory level any of `patterns` can reach (`None` = unbounded).
fn max_depth(patterns: &[String]) -> Option<usize> {
    if patterns.iter().any(|p| p.contains("**")) {
        return None;
    }
    patterns.iter().map(|p| p.matches('/').count() + 1).max()
}

/// `path` relative to `root`, `/`-separated.
pub(crate) fn relative_slash(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Files under `root` matching `include` and none of `exclude`, as
/// `(relative, absolute)` pairs in file-name order.
pub(crate) fn matching_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
    skip_hidden: bool,
) -> Result<Vec<(String, PathBuf)>> {
    let include_set = compile(include)?;
    let exclude_set = compile(exclude)?;

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth(include) {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_slash(root, entry.path()) else {
            continue;
        };
        if skip_hidden && relative.split('/').any(|part| part.starts_with('.')) {
            continue;
        }
        if include_set.is_match(&relative) && !exclude_set.is_match(&relative) {
            files.push((relative, entry.into_path()));
        }
    }
    Ok(files)
}
