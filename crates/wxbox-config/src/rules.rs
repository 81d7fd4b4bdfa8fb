//! Module rules: which files get which treatment.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use wxbox_preset::TransformPipeline;

use crate::patch::SourcePatch;

/// Script, TypeScript and JSX sources.
pub const SCRIPT_TEST: &str = r"\.((tsx?)|js|jsx|mjs)$";

/// Plain scripts that may carry an upstream source map.
pub const PLAIN_SCRIPT_TEST: &str = r"\.js$";

/// Installed dependencies are never transformed.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Prebuilt bundle shipped inside the source tree, relative to the project root.
pub const EXCLUDED_SOURCE: &str = "app/scripts/fontawesome.js";

/// When a rule runs relative to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

/// A path a rule skips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum RuleCondition {
    /// Any path with a component equal to this name
    Directory(String),
    /// Exactly this file
    File(PathBuf),
}

impl RuleCondition {
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Directory(name) => path
                .components()
                .any(|c| c.as_os_str() == name.as_str()),
            Self::File(file) => path == file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum RuleAction {
    /// Run the transform pipeline
    Transform {
        pipeline: TransformPipeline,
        source_maps: bool,
        cache_directory: bool,
    },
    /// Pull in source maps referenced by already-built scripts
    ExtractSourceMaps,
    /// Rewrite module text
    Patch { patch: SourcePatch },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRule {
    pub test: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<RuleCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,
    #[serde(flatten)]
    pub action: RuleAction,
}

impl ModuleRule {
    /// Transform every source file outside dependencies and the excluded bundle.
    pub fn transform(pipeline: TransformPipeline, cwd: &Path) -> Self {
        Self {
            test: SCRIPT_TEST.to_string(),
            exclude: vec![
                RuleCondition::Directory(DEPENDENCY_DIR.to_string()),
                RuleCondition::File(cwd.join(EXCLUDED_SOURCE)),
            ],
            enforce: None,
            action: RuleAction::Transform {
                pipeline,
                source_maps: true,
                cache_directory: true,
            },
        }
    }

    /// Extract existing source maps ahead of every other rule.
    pub fn extract_source_maps() -> Self {
        Self {
            test: PLAIN_SCRIPT_TEST.to_string(),
            exclude: Vec::new(),
            enforce: Some(Enforce::Pre),
            action: RuleAction::ExtractSourceMaps,
        }
    }

    /// Apply `patch` to the modules it targets.
    pub fn patch(patch: SourcePatch) -> Self {
        Self {
            test: patch.test.clone(),
            exclude: Vec::new(),
            enforce: None,
            action: RuleAction::Patch { patch },
        }
    }

    /// Whether this rule handles the module at `path`.
    pub fn matches(&self, path: &Path) -> bool {
        let Ok(test) = Regex::new(&self.test) else {
            return false;
        };
        test.is_match(&path.to_string_lossy()) && !self.exclude.iter().any(|c| c.matches(path))
    }

    pub fn pipeline(&self) -> Option<&TransformPipeline> {
        match &self.action {
            RuleAction::Transform { pipeline, .. } => Some(pipeline),
            _ => None,
        }
    }
}
