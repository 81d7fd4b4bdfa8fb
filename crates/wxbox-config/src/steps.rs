//! Build steps and the registry that orders them.
//!
//! The plugin chain handed to the bundler is assembled from a fixed,
//! ordered list of registrations. Each registration pairs a step kind with
//! a predicate over the build [`Capabilities`] and a factory producing the
//! configured step. Assembly walks the list once, in order, so the chain
//! for a given vendor family and mode is always the same.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wxbox_browsers::{VendorFamily, VendorId};
use wxbox_preset::{BuildContext, BuildMode};

use crate::copy::{CopyPattern, CopyPlan, copy_patterns};
use crate::entries::EntryDiscovery;
use crate::metadata::ExtensionMetadata;
use crate::options::ResolvedPaths;
use crate::patch::SourcePatch;

/// Version of this tool, exposed to extension code.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment constant holding the vendor id.
pub const VENDOR_ENV: &str = "VENDOR";

/// Environment constant holding [`TOOL_VERSION`].
pub const VERSION_ENV: &str = "WXBOX_VERSION";

/// Files in the output directory that survive cleaning.
pub const CLEAN_KEEP: &str = r"manifest\.json";

pub const SHIM_BINDING: &str = "browser";
pub const SHIM_MODULE: &str = "webextension-polyfill";

pub const GLOBAL_BINDING: &str = "global";
/// Module standing in for the `global` binding (re-exports `window`).
pub const GLOBAL_MODULE: &str = "wxbox/runtime/global.js";

pub const PROGRESS_NAME: &str = "wxbox";

/// Discriminant of [`BuildStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Clean,
    CaseSensitivePaths,
    WatchEntries,
    ProvideShim,
    Environment,
    Copy,
    Manifest,
    ProvideGlobal,
    Progress,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::CaseSensitivePaths => "case-sensitive-paths",
            Self::WatchEntries => "watch-entries",
            Self::ProvideShim => "provide-shim",
            Self::Environment => "environment",
            Self::Copy => "copy",
            Self::Manifest => "manifest",
            Self::ProvideGlobal => "provide-global",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured step of the plugin chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum BuildStep {
    /// Empty the output directory, keeping files matching `keep`
    Clean { path: PathBuf, keep: String },

    /// Fail on imports whose casing differs from the file on disk
    CaseSensitivePaths,

    /// Rescan entry patterns when files appear
    WatchEntries { patterns: Vec<String> },

    /// Provide `binding` from `module` and patch the module's detection check
    ProvideShim {
        binding: String,
        module: String,
        patch: SourcePatch,
    },

    /// Inline constants into `process.env.*` references
    Environment { variables: IndexMap<String, String> },

    Copy { patterns: Vec<CopyPattern> },

    /// Generate and validate `manifest.json`
    Manifest {
        vendor: VendorId,
        defaults: ExtensionMetadata,
    },

    /// Provide `binding` from `module`
    ProvideGlobal { binding: String, module: String },

    Progress { name: String },
}

impl BuildStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Clean { .. } => StepKind::Clean,
            Self::CaseSensitivePaths => StepKind::CaseSensitivePaths,
            Self::WatchEntries { .. } => StepKind::WatchEntries,
            Self::ProvideShim { .. } => StepKind::ProvideShim,
            Self::Environment { .. } => StepKind::Environment,
            Self::Copy { .. } => StepKind::Copy,
            Self::Manifest { .. } => StepKind::Manifest,
            Self::ProvideGlobal { .. } => StepKind::ProvideGlobal,
            Self::Progress { .. } => StepKind::Progress,
        }
    }

    /// The copy plan of a [`BuildStep::Copy`] step.
    pub fn copy_plan(&self) -> Option<CopyPlan> {
        match self {
            Self::Copy { patterns } => Some(CopyPlan::new(patterns.clone())),
            _ => None,
        }
    }

    /// The source patch paired with a [`BuildStep::ProvideShim`] step.
    pub fn source_patch(&self) -> Option<&SourcePatch> {
        match self {
            Self::ProvideShim { patch, .. } => Some(patch),
            _ => None,
        }
    }
}

/// What step selection may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub family: VendorFamily,
    pub mode: BuildMode,
}

impl Capabilities {
    pub fn new(family: VendorFamily, mode: BuildMode) -> Self {
        Self { family, mode }
    }

    pub fn for_build(vendor: &VendorId, context: &BuildContext) -> Self {
        Self::new(vendor.family(), context.mode)
    }
}

/// Everything step factories read.
#[derive(Debug, Clone, Copy)]
pub struct StepInputs<'a> {
    pub vendor: &'a VendorId,
    pub paths: &'a ResolvedPaths,
    pub metadata: &'a ExtensionMetadata,
    pub entries: &'a EntryDiscovery,
    pub copy_ignore: &'a [String],
}

pub type StepPredicate = fn(&Capabilities) -> bool;
pub type StepFactory = fn(&StepInputs<'_>) -> BuildStep;

struct Registration {
    kind: StepKind,
    predicate: StepPredicate,
    factory: StepFactory,
}

/// Ordered list of step registrations.
pub struct StepRegistry {
    registrations: Vec<Registration>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Append a registration. Order of registration is chain order.
    pub fn register(&mut self, kind: StepKind, predicate: StepPredicate, factory: StepFactory) {
        self.registrations.push(Registration {
            kind,
            predicate,
            factory,
        });
    }

    /// The extension build chain.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(StepKind::Clean, always, clean);
        registry.register(StepKind::CaseSensitivePaths, always, |_| {
            BuildStep::CaseSensitivePaths
        });
        registry.register(StepKind::WatchEntries, always, watch_entries);
        registry.register(StepKind::ProvideShim, is_chromium, provide_shim);
        registry.register(StepKind::Environment, always, environment);
        registry.register(StepKind::Copy, always, copy);
        registry.register(StepKind::Manifest, always, manifest);
        registry.register(StepKind::ProvideGlobal, always, |_| {
            BuildStep::ProvideGlobal {
                binding: GLOBAL_BINDING.to_string(),
                module: GLOBAL_MODULE.to_string(),
            }
        });
        registry.register(StepKind::Progress, always, |_| BuildStep::Progress {
            name: PROGRESS_NAME.to_string(),
        });
        registry
    }

    /// Kinds selected for `caps`, in chain order.
    pub fn kinds_for(&self, caps: &Capabilities) -> Vec<StepKind> {
        self.registrations
            .iter()
            .filter(|r| (r.predicate)(caps))
            .map(|r| r.kind)
            .collect()
    }

    /// Build the chain for `caps`.
    pub fn assemble(&self, caps: &Capabilities, inputs: &StepInputs<'_>) -> Vec<BuildStep> {
        self.registrations
            .iter()
            .filter(|r| (r.predicate)(caps))
            .map(|r| (r.factory)(inputs))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|r| r.kind))
            .finish()
    }
}

fn always(_: &Capabilities) -> bool {
    true
}

fn is_chromium(caps: &Capabilities) -> bool {
    caps.family == VendorFamily::Chromium
}

fn clean(inputs: &StepInputs<'_>) -> BuildStep {
    BuildStep::Clean {
        path: inputs.paths.output.clone(),
        keep: CLEAN_KEEP.to_string(),
    }
}

fn watch_entries(inputs: &StepInputs<'_>) -> BuildStep {
    BuildStep::WatchEntries {
        patterns: inputs.entries.absolute_patterns(),
    }
}

fn provide_shim(_: &StepInputs<'_>) -> BuildStep {
    BuildStep::ProvideShim {
        binding: SHIM_BINDING.to_string(),
        module: SHIM_MODULE.to_string(),
        patch: SourcePatch::polyfill_detection(),
    }
}

fn environment(inputs: &StepInputs<'_>) -> BuildStep {
    let mut variables = IndexMap::new();
    variables.insert(VENDOR_ENV.to_string(), inputs.vendor.to_string());
    variables.insert(VERSION_ENV.to_string(), TOOL_VERSION.to_string());
    BuildStep::Environment { variables }
}

fn copy(inputs: &StepInputs<'_>) -> BuildStep {
    BuildStep::Copy {
        patterns: copy_patterns(
            &inputs.paths.source,
            &inputs.paths.output,
            inputs.copy_ignore,
        ),
    }
}

fn manifest(inputs: &StepInputs<'_>) -> BuildStep {
    BuildStep::Manifest {
        vendor: inputs.vendor.clone(),
        defaults: inputs.metadata.clone(),
    }
}
