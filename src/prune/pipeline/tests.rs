//! Tests for the pruning pipeline module

use super::*;
use crate::graph::{Attribute, Model, Node, OpKind};
use crate::prune::config::{PruneChannelsConfig, PruneSpec};
use crate::prune::diagnostics::Diagnostic;
use crate::prune::mask::Mask;
use crate::prune::{ErrorKind, PruneError};
use ndarray::{ArrayD, IxDyn};

fn conv_relu_model() -> Model {
    Model::new()
        .with_tensor("x", vec![1, 4, 8, 8])
        .with_initializer("w", ArrayD::zeros(IxDyn(&[8, 4, 3, 3])))
        .with_tensor("y", vec![1, 8, 6, 6])
        .with_tensor("z", vec![1, 8, 6, 6])
        .with_node(
            Node::new("conv0", OpKind::Conv, ["x", "w"], ["y"])
                .with_attr("group", Attribute::Int(1)),
        )
        .with_node(Node::new("relu0", OpKind::Relu, ["y"], ["z"]))
}

fn pruner(spec: PruneSpec) -> PruneChannels {
    PruneChannels::new(PruneChannelsConfig::new().with_spec(spec))
}

// =============================================================================
// PruningStage Tests
// =============================================================================

#[test]
fn test_stage_is_active() {
    // TEST_ID: PL-001
    assert!(!PruningStage::Idle.is_active(), "PL-001 FALSIFIED: Idle should not be active");
    assert!(
        !PruningStage::Validating.is_active(),
        "PL-001 FALSIFIED: Validating never mutates"
    );
    assert!(PruningStage::Seeding.is_active(), "PL-001 FALSIFIED: Seeding should be active");
    assert!(PruningStage::Removing.is_active(), "PL-001 FALSIFIED: Removing should be active");
    assert!(!PruningStage::Complete.is_active(), "PL-001 FALSIFIED: Complete should not be active");
}

#[test]
fn test_stage_display_names() {
    // TEST_ID: PL-002
    assert_eq!(PruningStage::Idle.display_name(), "Idle");
    assert_eq!(PruningStage::Propagating.display_name(), "Propagating");
    assert_eq!(PruningStage::Removing.display_name(), "Removing");
}

#[test]
fn test_stage_default() {
    // TEST_ID: PL-003
    assert_eq!(
        PruningStage::default(),
        PruningStage::Idle,
        "PL-003 FALSIFIED: Default stage should be Idle"
    );
}

#[test]
fn test_stage_tags() {
    assert_eq!(crate::prune::ApplyMasks::new(PruneSpec::new()).stage(), PruningStage::Seeding);
    assert_eq!(crate::prune::PropagateMasks::new().stage(), PruningStage::Propagating);
    assert_eq!(crate::prune::RemoveMaskedChannels::new().stage(), PruningStage::Removing);
}

// =============================================================================
// PruneReport Tests
// =============================================================================

#[test]
fn test_report_changed_is_or_of_stages() {
    // TEST_ID: PL-010
    let mut report = PruneReport::new();
    assert!(!report.changed());
    report.record_stage(PruningStage::Seeding, false);
    report.record_stage(PruningStage::Propagating, false);
    assert!(!report.changed());
    report.record_stage(PruningStage::Removing, true);
    assert!(report.changed(), "PL-010 FALSIFIED: any stage change marks the cycle changed");
    assert_eq!(report.stage_changed(PruningStage::Removing), Some(true));
    assert_eq!(report.stage_changed(PruningStage::Complete), None);
}

#[test]
fn test_report_diagnostics() {
    let mut report = PruneReport::new();
    assert!(!report.has_diagnostics());
    report.add_diagnostics([Diagnostic::unsupported_operator("n0", "Softmax")]);
    assert!(report.has_diagnostics());
}

#[test]
fn test_report_serializes() {
    let mut report = PruneReport::new();
    report.seeded_masks = 1;
    report.record_stage(PruningStage::Propagating, true);
    let json = serde_json::to_string(&report).unwrap();
    let back: PruneReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

// =============================================================================
// Precondition Tests
// =============================================================================

#[test]
fn test_fused_bias_rejected() {
    // TEST_ID: PL-020
    let model = Model::new()
        .with_initializer("w", ArrayD::zeros(IxDyn(&[2, 2, 1, 1])))
        .with_initializer("b", ArrayD::zeros(IxDyn(&[2])))
        .with_node(
            Node::new("conv_b", OpKind::Conv, ["x", "w", "b"], ["y"])
                .with_attr("group", Attribute::Int(1)),
        );
    let err = check_preconditions(&model).unwrap_err();
    match err {
        PruneError::FusedConvBias { nodes } => assert_eq!(nodes, vec!["conv_b".to_string()]),
        other => panic!("PL-020 FALSIFIED: expected FusedConvBias, got {other:?}"),
    }
}

#[test]
fn test_dynamic_weights_name_every_node() {
    // TEST_ID: PL-021
    let model = Model::new()
        .with_tensor("a", vec![1, 4])
        .with_tensor("b", vec![4, 4])
        .with_node(Node::new("mm0", OpKind::MatMul, ["a", "b"], ["c"]))
        .with_node(Node::new("mm1", OpKind::MatMul, ["c", "b"], ["d"]));
    let err = check_preconditions(&model).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let msg = err.to_string();
    assert!(msg.contains("mm0") && msg.contains("mm1"), "PL-021 FALSIFIED: {msg}");
}

#[test]
fn test_dot_product_missing_weight_input() {
    let model = Model::new().with_node(Node::new("mm0", OpKind::MatMul, ["a"], ["c"]));
    assert!(matches!(
        check_preconditions(&model),
        Err(PruneError::MalformedNode { .. })
    ));
}

#[test]
fn test_preconditions_pass() {
    assert!(check_preconditions(&conv_relu_model()).is_ok());
}

// =============================================================================
// PruneChannels Tests
// =============================================================================

#[test]
fn test_validation_failure_leaves_model_untouched() {
    // TEST_ID: PL-030
    let model = conv_relu_model();
    let snapshot = model.clone();
    let p = pruner(PruneSpec::new().with_channels("w", [1, 2]));

    let err = p.validate(&model).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "PL-030 FALSIFIED: {err}");
    assert_eq!(model, snapshot);
    assert!(model.sparsity("w").is_none());
    assert!(p.run(model).is_err());
}

#[test]
fn test_malformed_node_rejected_before_mutation() {
    // TEST_ID: PL-034
    let model = conv_relu_model()
        .with_tensor("out", vec![1, 8])
        .with_node(Node::new("mm0", OpKind::MatMul, ["z"], ["out"]));
    let snapshot = model.clone();
    let p = pruner(PruneSpec::new().with_weight_channels("w", [], [1]));

    let err = p.validate(&model).unwrap_err();
    assert!(matches!(err, PruneError::MalformedNode { ref node, .. } if node == "mm0"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(model, snapshot, "PL-034 FALSIFIED: validation must not touch the model");
    assert!(matches!(p.run(model), Err(PruneError::MalformedNode { .. })));
}

#[test]
fn test_run_records_every_stage() {
    // TEST_ID: PL-031
    let p = pruner(PruneSpec::new().with_weight_channels("w", [], [2]));
    let (model, report) = p.run(conv_relu_model()).unwrap();

    let stages: Vec<_> = report.stage_changes.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        stages,
        vec![
            PruningStage::Validating,
            PruningStage::Seeding,
            PruningStage::Propagating,
            PruningStage::Removing,
        ]
    );
    assert_eq!(report.seeded_masks, 1);
    assert_eq!(report.stage_changed(PruningStage::Seeding), Some(false));
    assert_eq!(report.stage_changed(PruningStage::Propagating), Some(true));
    assert_eq!(report.stage_changed(PruningStage::Removing), Some(true));

    assert_eq!(model.initializer("w").unwrap().shape(), &[7, 4, 3, 3]);
    assert_eq!(model.tensor_shape("y"), Some(&[1, 7, 6, 6][..]));
    assert_eq!(model.tensor_shape("z"), Some(&[1, 7, 6, 6][..]));
    assert!(!model.has_pending_masks());
}

#[test]
fn test_apply_surfaces_diagnostics() {
    // TEST_ID: PL-032
    let model = conv_relu_model()
        .with_tensor("s", vec![1, 8, 6, 6])
        .with_node(Node::new("soft0", OpKind::from("Softmax".to_string()), ["z"], ["s"]));
    let out = pruner(PruneSpec::new()).apply(model).unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].node, "soft0");
    assert!(!out.changed);
}

#[test]
fn test_strict_operators_fail() {
    let model = conv_relu_model()
        .with_node(Node::new("soft0", OpKind::from("Softmax".to_string()), ["z"], ["s"]));
    let p = PruneChannels::new(PruneChannelsConfig::new().with_strict_operators(true));
    let err = p.apply(model).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
}

#[test]
fn test_empty_spec_on_clean_model_is_noop() {
    let model = conv_relu_model();
    let (out, report) = pruner(PruneSpec::new()).run(model.clone()).unwrap();
    assert!(!report.changed());
    assert_eq!(report.propagation_sweeps, 1);
    assert_eq!(out.initializer("w"), model.initializer("w"));
    assert_eq!(out.tensor_shape("z"), model.tensor_shape("z"));
    assert!(!out.has_pending_masks());
}

#[test]
fn test_downstream_seed_settles_before_removal() {
    // TEST_ID: PL-033
    let p = pruner(PruneSpec::new().with_channels("z", [0]));
    let (model, report) = p.run(conv_relu_model()).unwrap();
    assert_eq!(
        report.propagation_sweeps, 3,
        "PL-033 FALSIFIED: the conv weight is reached on the second sweep"
    );
    assert_eq!(model.initializer("w").unwrap().shape(), &[7, 4, 3, 3]);
    assert_eq!(model.tensor_shape("y"), Some(&[1, 7, 6, 6][..]));
    assert_eq!(model.tensor_shape("z"), Some(&[1, 7, 6, 6][..]));
    assert_eq!(model.sparsity("z"), Some(&Mask::plain([])));
    assert_eq!(model.sparsity("w"), Some(&Mask::weight([], [])));
}
