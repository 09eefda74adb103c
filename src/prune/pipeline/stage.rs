//! Pruning pipeline stages
//!
//! Every stage consumes the model and hands back the rewritten one together
//! with a changed flag. Stages never loop: reaching a fixpoint is up to the
//! caller, who repeats a stage (or the whole pipeline) while it reports a
//! change.

use crate::graph::Model;
use crate::prune::diagnostics::Diagnostic;
use crate::prune::Result;
use serde::{Deserialize, Serialize};

/// Current stage of the pruning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PruningStage {
    /// Not started.
    #[default]
    Idle,
    /// Checking preconditions.
    Validating,
    /// Installing caller-supplied masks.
    Seeding,
    /// Propagating masks across the graph.
    Propagating,
    /// Removing masked channels.
    Removing,
    /// Pipeline complete.
    Complete,
}

impl PruningStage {
    /// Check if the stage mutates the graph.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PruningStage::Seeding | PruningStage::Propagating | PruningStage::Removing
        )
    }

    /// Get display name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            PruningStage::Idle => "Idle",
            PruningStage::Validating => "Validating",
            PruningStage::Seeding => "Seeding",
            PruningStage::Propagating => "Propagating",
            PruningStage::Removing => "Removing",
            PruningStage::Complete => "Complete",
        }
    }
}

/// Output of one [`Transformation`] application.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The rewritten model.
    pub model: Model,
    /// Whether anything changed that may warrant another application.
    pub changed: bool,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
}

impl Transformed {
    /// Outcome without diagnostics.
    pub fn new(model: Model, changed: bool) -> Self {
        Self {
            model,
            changed,
            diagnostics: Vec::new(),
        }
    }

    /// Attach diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// A graph rewrite that owns the model for its duration.
pub trait Transformation {
    /// Stage this transformation implements.
    fn stage(&self) -> PruningStage;

    /// Apply once.
    fn apply(&self, model: Model) -> Result<Transformed>;
}
