//! Pruning cycle report
//!
//! Tracks what one orchestrated Seed → Propagate → Remove cycle did.

use super::stage::PruningStage;
use crate::prune::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// Summary of one pruning cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    /// Number of masks installed by seeding.
    pub seeded_masks: usize,
    /// Propagation sweeps needed to settle the masks.
    pub propagation_sweeps: usize,
    /// Changed flag of each stage, in execution order.
    pub stage_changes: Vec<(PruningStage, bool)>,
    /// Non-fatal findings collected from all stages.
    pub diagnostics: Vec<Diagnostic>,
}

impl PruneReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a stage.
    pub fn record_stage(&mut self, stage: PruningStage, changed: bool) {
        self.stage_changes.push((stage, changed));
    }

    /// Add diagnostics from a stage.
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Changed flag of `stage`, if it ran.
    pub fn stage_changed(&self, stage: PruningStage) -> Option<bool> {
        self.stage_changes
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|&(_, changed)| changed)
    }

    /// Whether any stage asked for another cycle.
    pub fn changed(&self) -> bool {
        self.stage_changes.iter().any(|&(_, changed)| changed)
    }

    /// Check if any diagnostics were collected.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
