//! # wxbox-preset
//!
//! Source transform pipelines for extension builds.
//!
//! The composer turns a resolved browser target and a build mode into the
//! ordered list of transform steps applied to every script, TypeScript and
//! JSX file.
//!
//! ```
//! use wxbox_browsers::ResolvedTarget;
//! use wxbox_preset::{BuildContext, BuildMode, TransformKind, compose_pipeline};
//!
//! let pipeline = compose_pipeline(
//!     &ResolvedTarget::new("chrome", 80),
//!     &BuildContext::new(BuildMode::Development),
//! );
//! assert!(!pipeline.contains(TransformKind::RemovePropTypes));
//! ```

pub mod composer;
pub mod mode;
pub mod pipeline;

pub use composer::{PresetComposer, compose_pipeline};
pub use mode::{BuildContext, BuildMode, MODE_ENV_VAR, TRANSFORM_ENV_VAR};
pub use pipeline::{
    COREJS_VERSION, PolyfillStrategy, TransformKind, TransformPipeline, TransformStage,
    TransformStep,
};
