//! # wxbox-config
//!
//! Bundler configuration synthesis for browser extensions.
//!
//! A [`ConfigSynthesizer`] turns [`BuildOptions`] into a [`BuildConfiguration`]:
//! the entry map, the module rules carrying the transform pipeline for the
//! resolved browser target, and the ordered plugin chain (cleaning, copying,
//! manifest generation, shims and environment constants).
//!
//! ```no_run
//! use wxbox_browsers::StaticDataset;
//! use wxbox_config::{BuildOptions, ConfigSynthesizer};
//!
//! let dataset = StaticDataset::new().with_versions("firefox", ["115", "128"]);
//! let options = BuildOptions::new("app").vendor("firefox").vendor_version("auto");
//!
//! let config = ConfigSynthesizer::new(dataset).synthesize(&options)?;
//! println!("{}", serde_json::to_string_pretty(&config).unwrap());
//! # Ok::<(), wxbox_config::ConfigError>(())
//! ```
//!
//! Synthesis never mutates process state; the build mode travels in a
//! [`BuildContext`](wxbox_preset::BuildContext).

pub mod copy;
pub mod entries;
pub mod error;
pub mod metadata;
pub mod options;
pub mod patch;
pub mod rules;
pub mod steps;
pub mod synth;

mod walk;

pub use copy::{CopyOperation, CopyPattern, CopyPlan, LOCALE_PATTERN};
pub use entries::{EntryDiscovery, EntryMap};
pub use error::{ConfigError, Result};
pub use metadata::{ExtensionMetadata, ManifestMetadataLoader, MetadataLoader, ensure_source_dir};
pub use options::{BuildOptions, ResolvedPaths, VENDOR_PLACEHOLDER};
pub use patch::SourcePatch;
pub use rules::{Enforce, ModuleRule, RuleAction, RuleCondition};
pub use steps::{BuildStep, Capabilities, StepInputs, StepKind, StepRegistry, TOOL_VERSION};
pub use synth::{BuildConfiguration, ConfigSynthesizer, OutputConfig, Optimization};

#[cfg(feature = "browserslist")]
pub use synth::synthesize;
