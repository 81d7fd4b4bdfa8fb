//! Transform pipeline types.
//!
//! A pipeline is an ordered list of named steps. Order is significant: the
//! downstream transformer runs presets first, then plugins, each in list
//! order, and several plugins assume the output shape of earlier ones.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// core-js release the entry polyfills expand against.
pub const COREJS_VERSION: &str = "3.20.3";

/// Whether a step is a preset (bundle of transforms) or a single plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformStage {
    Preset,
    Plugin,
}

/// How global polyfill imports are expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolyfillStrategy {
    /// Rewrite an explicit polyfill import into per-feature imports
    Entry,
    /// Inject imports based on static usage analysis
    Usage,
}

/// Discriminant of a [`TransformStep`], for ordering checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    StripTypes,
    TargetEnv,
    Jsx,
    LowerDestructuring,
    LowerClassFields,
    LowerObjectRestSpread,
    LowerJsxCalls,
    AsyncRuntime,
    RemovePropTypes,
}

/// A single step with its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum TransformStep {
    /// Strip TypeScript-only syntax
    StripTypes,

    /// Downlevel syntax for the resolved browser target
    TargetEnv {
        /// Vendor → major version; always a single entry
        targets: IndexMap<String, u32>,
        use_built_ins: PolyfillStrategy,
        corejs: String,
        /// `false` leaves ES module syntax to the bundler
        modules: bool,
    },

    /// JSX preset; `development` adds component stacks and `__self`/`__source`
    Jsx { development: bool },

    /// Destructuring lowering; later object-spread lowering depends on it
    LowerDestructuring,

    /// `class { handler = () => {} }`
    LowerClassFields,

    /// `{ ...obj }` using native `Object.assign`
    LowerObjectRestSpread { use_built_ins: bool },

    /// JSX to plain calls using native `Object.assign`
    LowerJsxCalls { use_built_ins: bool },

    /// Shared regenerator runtime for async functions and generators
    AsyncRuntime { helpers: bool, regenerator: bool },

    /// Drop `propTypes` assignments and the import providing them
    RemovePropTypes { remove_import: bool },
}

impl TransformStep {
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::StripTypes => TransformKind::StripTypes,
            Self::TargetEnv { .. } => TransformKind::TargetEnv,
            Self::Jsx { .. } => TransformKind::Jsx,
            Self::LowerDestructuring => TransformKind::LowerDestructuring,
            Self::LowerClassFields => TransformKind::LowerClassFields,
            Self::LowerObjectRestSpread { .. } => TransformKind::LowerObjectRestSpread,
            Self::LowerJsxCalls { .. } => TransformKind::LowerJsxCalls,
            Self::AsyncRuntime { .. } => TransformKind::AsyncRuntime,
            Self::RemovePropTypes { .. } => TransformKind::RemovePropTypes,
        }
    }

    pub fn stage(&self) -> TransformStage {
        match self {
            Self::StripTypes | Self::TargetEnv { .. } | Self::Jsx { .. } => TransformStage::Preset,
            _ => TransformStage::Plugin,
        }
    }

    /// Package implementing the step in the downstream transformer.
    pub fn package(&self) -> &'static str {
        match self {
            Self::StripTypes => "@babel/preset-typescript",
            Self::TargetEnv { .. } => "@babel/preset-env",
            Self::Jsx { .. } => "@babel/preset-react",
            Self::LowerDestructuring => "@babel/plugin-transform-destructuring",
            Self::LowerClassFields => "@babel/plugin-proposal-class-properties",
            Self::LowerObjectRestSpread { .. } => "@babel/plugin-proposal-object-rest-spread",
            Self::LowerJsxCalls { .. } => "@babel/plugin-transform-react-jsx",
            Self::AsyncRuntime { .. } => "@babel/plugin-transform-runtime",
            Self::RemovePropTypes { .. } => "babel-plugin-transform-react-remove-prop-types",
        }
    }
}

/// Ordered transform steps for one file rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformPipeline {
    steps: Vec<TransformStep>,
}

impl TransformPipeline {
    pub(crate) fn from_steps(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn presets(&self) -> impl Iterator<Item = &TransformStep> {
        self.steps
            .iter()
            .filter(|s| s.stage() == TransformStage::Preset)
    }

    pub fn plugins(&self) -> impl Iterator<Item = &TransformStep> {
        self.steps
            .iter()
            .filter(|s| s.stage() == TransformStage::Plugin)
    }

    /// Index of the first step of `kind`.
    pub fn position(&self, kind: TransformKind) -> Option<usize> {
        self.steps.iter().position(|s| s.kind() == kind)
    }

    pub fn contains(&self, kind: TransformKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn get(&self, kind: TransformKind) -> Option<&TransformStep> {
        self.steps.iter().find(|s| s.kind() == kind)
    }
}

impl<'a> IntoIterator for &'a TransformPipeline {
    type Item = &'a TransformStep;
    type IntoIter = std::slice::Iter<'a, TransformStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
