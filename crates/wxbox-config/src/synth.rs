//! Configuration synthesis.
//!
//! [`ConfigSynthesizer::synthesize_with`] runs the stages in a fixed order:
//!
//! 1. mode selection (from the [`BuildContext`])
//! 2. path resolution (`[vendor]` substitution, absolute paths)
//! 3. metadata acquisition, which fails fast on a missing source directory
//! 4. entry discovery
//! 5. target resolution and module rules
//! 6. plugin chain assembly
//!
//! Nothing is returned unless every stage succeeds.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};
use wxbox_browsers::{CompatDataset, ResolvedTarget, VersionResolver};
use wxbox_preset::{BuildContext, BuildMode, PresetComposer, TransformPipeline};

use crate::copy::CopyPlan;
use crate::entries::{EntryDiscovery, EntryMap};
use crate::error::Result;
use crate::metadata::{ManifestMetadataLoader, MetadataLoader};
use crate::options::{BuildOptions, ResolvedPaths};
use crate::rules::ModuleRule;
use crate::steps::{BuildStep, Capabilities, StepInputs, StepKind, StepRegistry};

/// Extensions the bundler tries, in order, for extension-less imports.
pub const RESOLVE_EXTENSIONS: [&str; 4] = [".js", ".json", ".mjs", ".jsx"];

pub const OUTPUT_FILENAME: &str = "[name].js";
pub const CHUNK_FILENAME: &str = "[id].chunk.js";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub filename: String,
    pub chunk_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Optimization {
    pub minimize: bool,
}

/// Everything the downstream bundler needs for one extension build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub mode: BuildMode,
    /// Absolute source directory
    pub context: PathBuf,
    pub target: ResolvedTarget,
    pub entry: EntryMap,
    pub output: OutputConfig,
    pub package_path: PathBuf,
    pub devtool: Option<String>,
    pub optimization: Optimization,
    pub resolve_extensions: Vec<String>,
    pub module_rules: Vec<ModuleRule>,
    pub plugins: Vec<BuildStep>,
    /// Node globals (`global`, `process`, ...) are not polyfilled
    pub node_polyfills: bool,
    #[serde(skip)]
    entry_discovery: EntryDiscovery,
}

impl BuildConfiguration {
    /// The discovery the entry map came from.
    pub fn entry_discovery(&self) -> &EntryDiscovery {
        &self.entry_discovery
    }

    /// Rescan the source tree and replace the entry map.
    pub fn recompute_entries(&mut self) -> Result<&EntryMap> {
        self.entry = self.entry_discovery.discover()?;
        Ok(&self.entry)
    }

    /// Pipeline of the transform rule.
    pub fn transform_pipeline(&self) -> Option<&TransformPipeline> {
        self.module_rules.iter().find_map(ModuleRule::pipeline)
    }

    pub fn plugin_kinds(&self) -> Vec<StepKind> {
        self.plugins.iter().map(BuildStep::kind).collect()
    }

    pub fn plugin(&self, kind: StepKind) -> Option<&BuildStep> {
        self.plugins.iter().find(|step| step.kind() == kind)
    }

    /// Copy plan of the copy step.
    pub fn copy_plan(&self) -> Option<CopyPlan> {
        self.plugins.iter().find_map(BuildStep::copy_plan)
    }
}

/// Assembles [`BuildConfiguration`]s.
///
/// Holds the pieces that outlive a single build: the version resolver over a
/// compatibility dataset, the metadata loader, and the step registry. Each
/// call to [`synthesize`](Self::synthesize) runs the stages in a fixed order:
/// source check and metadata, entry discovery, target resolution and
/// pipeline composition, module rules, then the plugin chain.
pub struct ConfigSynthesizer<D, M = ManifestMetadataLoader> {
    resolver: VersionResolver<D>,
    metadata: M,
    registry: StepRegistry,
}

impl<D: CompatDataset> ConfigSynthesizer<D> {
    /// Synthesizer reading `manifest.json` metadata with the standard step chain.
    pub fn new(dataset: D) -> Self {
        Self {
            resolver: VersionResolver::new(dataset),
            metadata: ManifestMetadataLoader,
            registry: StepRegistry::standard(),
        }
    }
}

impl<D: CompatDataset, M: MetadataLoader> ConfigSynthesizer<D, M> {
    /// Swap the metadata source, e.g. for embedders that keep metadata outside
    /// the source tree.
    pub fn with_metadata_loader<N: MetadataLoader>(self, metadata: N) -> ConfigSynthesizer<D, N> {
        ConfigSynthesizer {
            resolver: self.resolver,
            metadata,
            registry: self.registry,
        }
    }

    pub fn with_registry(mut self, registry: StepRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn resolver(&self) -> &VersionResolver<D> {
        &self.resolver
    }

    /// Synthesize with the mode taken from `options.dev`.
    ///
    /// The environment is never consulted; use
    /// [`synthesize_with`](Self::synthesize_with) with
    /// [`BuildContext::detect`] to honor `BABEL_ENV`/`NODE_ENV`.
    ///
    /// # Arguments
    ///
    /// * `options` - Source/output layout, target selection and copy ignores
    ///
    /// # Errors
    ///
    /// Same as [`synthesize_with`](Self::synthesize_with).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wxbox_browsers::StaticDataset;
    /// use wxbox_config::{BuildOptions, ConfigSynthesizer, StepKind};
    ///
    /// let synthesizer = ConfigSynthesizer::new(StaticDataset::new());
    /// let options = BuildOptions::new("app").vendor("chrome").vendor_version(88u32);
    ///
    /// let config = synthesizer.synthesize(&options)?;
    /// assert_eq!(config.target.to_string(), "chrome88");
    /// assert!(config.plugin(StepKind::ProvideShim).is_some());
    /// # Ok::<(), wxbox_config::ConfigError>(())
    /// ```
    pub fn synthesize(&self, options: &BuildOptions) -> Result<BuildConfiguration> {
        self.synthesize_with(BuildContext::from_dev_flag(options.dev), options)
    }

    /// Synthesize under an explicit build context.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SourceDirMissing`](crate::ConfigError::SourceDirMissing) and the
    ///   other metadata errors, before anything else is computed
    /// - [`ConfigError::DuplicateEntry`](crate::ConfigError::DuplicateEntry)
    /// - [`ConfigError::Resolution`](crate::ConfigError::Resolution) when the
    ///   vendor version cannot be resolved
    pub fn synthesize_with(
        &self,
        context: BuildContext,
        options: &BuildOptions,
    ) -> Result<BuildConfiguration> {
        let mode = context.mode;
        debug!(%mode, vendor = %options.vendor, "synthesizing build configuration");

        let paths = ResolvedPaths::resolve(options)?;
        let metadata = self.metadata.load(&paths.source)?;

        let discovery = EntryDiscovery::new(&paths.source);
        let entry = discovery.discover()?;

        let target = self.resolver.resolve(&options.vendor, &options.vendor_version)?;
        let pipeline = PresetComposer::new(context).compose(&target);
        let mut module_rules = vec![
            ModuleRule::extract_source_maps(),
            ModuleRule::transform(pipeline, &paths.cwd),
        ];

        let caps = Capabilities::for_build(&options.vendor, &context);
        let plugins = self.registry.assemble(
            &caps,
            &StepInputs {
                vendor: &options.vendor,
                paths: &paths,
                metadata: &metadata,
                entries: &discovery,
                copy_ignore: &options.copy_ignore,
            },
        );
        module_rules.extend(
            plugins
                .iter()
                .filter_map(BuildStep::source_patch)
                .cloned()
                .map(ModuleRule::patch),
        );

        info!(
            %target,
            %mode,
            entries = entry.len(),
            plugins = plugins.len(),
            "build configuration ready"
        );

        Ok(BuildConfiguration {
            mode,
            context: paths.source,
            target,
            entry,
            output: OutputConfig {
                path: paths.output,
                filename: OUTPUT_FILENAME.to_string(),
                chunk_filename: CHUNK_FILENAME.to_string(),
            },
            package_path: paths.package,
            devtool: options.devtool.clone(),
            optimization: Optimization {
                minimize: options.minimize,
            },
            resolve_extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            module_rules,
            plugins,
            node_polyfills: false,
            entry_discovery: discovery,
        })
    }
}

/// Synthesize against the bundled browserslist data.
///
/// The project's browserslist config is looked up from the working directory
/// of `options`. An already-set `BABEL_ENV` or `NODE_ENV` takes precedence
/// over `options.dev`.
#[cfg(feature = "browserslist")]
pub fn synthesize(options: &BuildOptions) -> Result<BuildConfiguration> {
    let cwd = options.base_dir()?;
    let dataset = wxbox_browsers::BrowserslistDataset::new().with_project_dir(&cwd);
    ConfigSynthesizer::new(dataset).synthesize_with(BuildContext::detect(options.dev), options)
}
