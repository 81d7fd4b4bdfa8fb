//! Ordering and mode-dependent inclusion of transform steps.

use pretty_assertions::assert_eq;
use wxbox_browsers::ResolvedTarget;
use wxbox_preset::{
    BuildContext, BuildMode, PolyfillStrategy, TransformKind, TransformStep, compose_pipeline,
};

fn all_pipelines() -> Vec<(BuildMode, wxbox_preset::TransformPipeline)> {
    let targets = [
        ResolvedTarget::new("chrome", 67),
        ResolvedTarget::new("firefox", 115),
        ResolvedTarget::new("edge", 100),
        ResolvedTarget::new("safari", 15),
    ];
    let mut out = Vec::new();
    for mode in [BuildMode::Development, BuildMode::Production] {
        for target in &targets {
            out.push((mode, compose_pipeline(target, &BuildContext::new(mode))));
        }
    }
    out
}

#[test]
fn destructuring_always_precedes_spread_and_class_fields() {
    for (mode, pipeline) in all_pipelines() {
        let destructuring = pipeline.position(TransformKind::LowerDestructuring).unwrap();
        let class_fields = pipeline.position(TransformKind::LowerClassFields).unwrap();
        let spread = pipeline.position(TransformKind::LowerObjectRestSpread).unwrap();
        assert!(destructuring < class_fields, "{mode}");
        assert!(destructuring < spread, "{mode}");
    }
}

#[test]
fn fixed_step_order() {
    let pipeline = compose_pipeline(
        &ResolvedTarget::new("chrome", 80),
        &BuildContext::new(BuildMode::Production),
    );
    let kinds: Vec<TransformKind> = pipeline.steps().iter().map(TransformStep::kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransformKind::StripTypes,
            TransformKind::TargetEnv,
            TransformKind::Jsx,
            TransformKind::LowerDestructuring,
            TransformKind::LowerClassFields,
            TransformKind::LowerObjectRestSpread,
            TransformKind::LowerJsxCalls,
            TransformKind::AsyncRuntime,
            TransformKind::RemovePropTypes,
        ]
    );
}

#[test]
fn debug_metadata_only_in_development() {
    for (mode, pipeline) in all_pipelines() {
        let jsx = pipeline.get(TransformKind::Jsx).unwrap();
        assert_eq!(
            jsx,
            &TransformStep::Jsx {
                development: mode == BuildMode::Development
            }
        );
        assert_eq!(
            pipeline.contains(TransformKind::RemovePropTypes),
            mode == BuildMode::Production
        );
    }
}

#[test]
fn native_merge_and_shared_runtime() {
    let pipeline = compose_pipeline(&ResolvedTarget::new("chrome", 80), &BuildContext::default());
    assert_eq!(
        pipeline.get(TransformKind::LowerObjectRestSpread),
        Some(&TransformStep::LowerObjectRestSpread { use_built_ins: true })
    );
    assert_eq!(
        pipeline.get(TransformKind::LowerJsxCalls),
        Some(&TransformStep::LowerJsxCalls { use_built_ins: true })
    );
    assert_eq!(
        pipeline.get(TransformKind::AsyncRuntime),
        Some(&TransformStep::AsyncRuntime {
            helpers: false,
            regenerator: true
        })
    );
    match pipeline.get(TransformKind::TargetEnv) {
        Some(TransformStep::TargetEnv { use_built_ins, .. }) => {
            assert_eq!(*use_built_ins, PolyfillStrategy::Entry);
        }
        other => panic!("unexpected step: {other:?}"),
    }
}

#[test]
fn serializes_with_step_tags() {
    let pipeline = compose_pipeline(
        &ResolvedTarget::new("firefox", 91),
        &BuildContext::new(BuildMode::Development),
    );
    let value = serde_json::to_value(&pipeline).unwrap();
    assert_eq!(value[0]["step"], "strip-types");
    assert_eq!(value[1]["step"], "target-env");
    assert_eq!(value[1]["targets"]["firefox"], 91);
    assert_eq!(value[1]["use_built_ins"], "entry");
    assert_eq!(value[2]["development"], true);
}
