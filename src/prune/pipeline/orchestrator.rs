//! Channel pruning orchestrator
//!
//! Checks preconditions, then runs seeding, propagation and removal in that
//! order. Whole cycles are never repeated here; the caller reruns the
//! orchestrator while a cycle reports a change.

use super::report::PruneReport;
use super::stage::{PruningStage, Transformation, Transformed};
use crate::graph::{Model, OpKind};
use crate::prune::config::PruneChannelsConfig;
use crate::prune::propagate::PropagateMasks;
use crate::prune::remove::RemoveMaskedChannels;
use crate::prune::seed::ApplyMasks;
use crate::prune::{PruneError, Result};
use tracing::{debug, info};

/// One Seed → Propagate → Remove cycle.
#[derive(Debug, Clone)]
pub struct PruneChannels {
    /// Configuration.
    config: PruneChannelsConfig,
    seeding: ApplyMasks,
    propagation: PropagateMasks,
    removal: RemoveMaskedChannels,
}

impl PruneChannels {
    /// Create an orchestrator with the given configuration.
    pub fn new(config: PruneChannelsConfig) -> Self {
        let seeding = ApplyMasks::new(config.spec().clone());
        let propagation = PropagateMasks::new().strict(config.strict_operators());
        Self {
            config,
            seeding,
            propagation,
            removal: RemoveMaskedChannels::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PruneChannelsConfig {
        &self.config
    }

    /// Run every pre-mutation check against `model`.
    ///
    /// Covers graph preconditions and seed decoding, so a model that passes
    /// can only fail later on configuration or range errors.
    pub fn validate(&self, model: &Model) -> Result<()> {
        check_preconditions(model)?;
        self.seeding.encode(model)?;
        Ok(())
    }

    /// Run one cycle and report what each stage did.
    ///
    /// Propagation sweeps are repeated until a sweep changes nothing, so
    /// removal always sees settled masks. Masks only grow, which bounds the
    /// number of sweeps by the total channel count.
    pub fn run(&self, model: Model) -> Result<(Model, PruneReport)> {
        let mut report = PruneReport::new();
        self.validate(&model)?;
        report.record_stage(PruningStage::Validating, false);

        let seeded = self.seeding.apply(model)?;
        report.seeded_masks = self.config.spec().len();
        report.record_stage(self.seeding.stage(), seeded.changed);
        let mut model = seeded.model;

        let mut propagated = false;
        loop {
            let out = self.propagation.apply(model)?;
            report.propagation_sweeps += 1;
            // every sweep revisits the same opaque nodes
            if report.propagation_sweeps == 1 {
                report.add_diagnostics(out.diagnostics);
            }
            model = out.model;
            propagated |= out.changed;
            if !out.changed {
                break;
            }
            debug!(sweeps = report.propagation_sweeps, "masks still growing");
        }
        report.record_stage(self.propagation.stage(), propagated);

        let removed = self.removal.apply(model)?;
        report.record_stage(self.removal.stage(), removed.changed);
        let model = removed.model;

        info!(
            changed = report.changed(),
            sweeps = report.propagation_sweeps,
            diagnostics = report.diagnostics.len(),
            "pruning cycle complete"
        );
        Ok((model, report))
    }

    /// Run one cycle; `changed` is set if any stage changed the model.
    pub fn apply(&self, model: Model) -> Result<Transformed> {
        let (model, report) = self.run(model)?;
        Ok(Transformed::new(model, report.changed()).with_diagnostics(report.diagnostics))
    }
}

/// Conv nodes must not carry a fused bias, and MatMul/Conv weights must be
/// constants. All offending nodes are named in the error.
pub(crate) fn check_preconditions(model: &Model) -> Result<()> {
    for node in model.nodes() {
        if node.op.is_dot_product() && node.inputs.len() < 2 {
            return Err(PruneError::MalformedNode {
                node: node.name.clone(),
                op: node.op.to_string(),
                reason: format!("expected data and weight inputs, found {}", node.inputs.len()),
            });
        }
    }

    let fused: Vec<String> = model
        .nodes_by_op(&OpKind::Conv)
        .filter(|n| n.inputs.len() > 2)
        .map(|n| n.name.clone())
        .collect();
    if !fused.is_empty() {
        return Err(PruneError::FusedConvBias { nodes: fused });
    }

    let dynamic: Vec<String> = model
        .nodes()
        .iter()
        .filter(|n| n.op.is_dot_product())
        .filter(|n| model.initializer(&n.inputs[1]).is_none())
        .map(|n| n.name.clone())
        .collect();
    if !dynamic.is_empty() {
        return Err(PruneError::DynamicWeights { nodes: dynamic });
    }

    Ok(())
}
