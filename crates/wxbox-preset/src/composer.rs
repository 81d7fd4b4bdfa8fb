//! Pipeline composition.

use indexmap::IndexMap;
use tracing::debug;
use wxbox_browsers::ResolvedTarget;

use crate::mode::BuildContext;
use crate::pipeline::{COREJS_VERSION, PolyfillStrategy, TransformPipeline, TransformStep};

/// Builds the source transform pipeline for a target and mode.
///
/// Composition is pure data assembly and cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetComposer {
    context: BuildContext,
}

impl PresetComposer {
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn compose(&self, target: &ResolvedTarget) -> TransformPipeline {
        let production = self.context.is_production();

        let mut targets = IndexMap::with_capacity(1);
        targets.insert(target.vendor.to_string(), target.version);

        let mut steps = vec![
            TransformStep::StripTypes,
            TransformStep::TargetEnv {
                targets,
                use_built_ins: PolyfillStrategy::Entry,
                corejs: COREJS_VERSION.to_string(),
                modules: false,
            },
            TransformStep::Jsx {
                development: !production,
            },
            // Object rest/spread lowering breaks without this running first.
            TransformStep::LowerDestructuring,
            TransformStep::LowerClassFields,
            TransformStep::LowerObjectRestSpread {
                use_built_ins: true,
            },
            TransformStep::LowerJsxCalls {
                use_built_ins: true,
            },
            TransformStep::AsyncRuntime {
                helpers: false,
                regenerator: true,
            },
        ];

        if production {
            steps.push(TransformStep::RemovePropTypes {
                remove_import: true,
            });
        }

        debug!(
            target = %target,
            mode = %self.context.mode,
            steps = steps.len(),
            "composed transform pipeline"
        );
        TransformPipeline::from_steps(steps)
    }
}

/// Compose a pipeline without keeping a composer around.
pub fn compose_pipeline(target: &ResolvedTarget, context: &BuildContext) -> TransformPipeline {
    PresetComposer::new(*context).compose(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::BuildMode;
    use crate::pipeline::TransformKind;

    #[test]
    fn production_has_eight_plus_one_steps() {
        let pipeline = compose_pipeline(
            &ResolvedTarget::new("chrome", 80),
            &BuildContext::new(BuildMode::Production),
        );
        assert_eq!(pipeline.len(), 9);
        assert_eq!(pipeline.presets().count(), 3);
        assert!(pipeline.contains(TransformKind::RemovePropTypes));
    }

    #[test]
    fn development_omits_prop_type_removal() {
        let pipeline = compose_pipeline(
            &ResolvedTarget::new("firefox", 91),
            &BuildContext::new(BuildMode::Development),
        );
        assert_eq!(pipeline.len(), 8);
        assert!(!pipeline.contains(TransformKind::RemovePropTypes));
    }

    #[test]
    fn target_env_is_restricted_to_the_vendor() {
        let pipeline = compose_pipeline(
            &ResolvedTarget::new("opera", 70),
            &BuildContext::default(),
        );
        let Some(TransformStep::TargetEnv { targets, modules, .. }) =
            pipeline.get(TransformKind::TargetEnv)
        else {
            panic!("missing target-env step");
        };
        assert_eq!(targets.len(), 1);
        assert_eq!(targets.get("opera"), Some(&70));
        assert!(!modules);
    }
}
