//! Channel pruning pass configuration.

use super::PruneSpec;
use serde::{Deserialize, Serialize};

/// Configuration for a [`PruneChannels`](crate::prune::PruneChannels) run.
///
/// # Example
///
/// ```
/// use chanprune::prune::{PruneChannelsConfig, PruneSpec};
///
/// let config = PruneChannelsConfig::new()
///     .with_spec(PruneSpec::new().with_weight_channels("conv0_w", [], [1, 3]))
///     .with_strict_operators(true);
/// assert!(config.strict_operators());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneChannelsConfig {
    /// Seed masks.
    #[serde(default)]
    spec: PruneSpec,

    /// Treat operators without a transfer rule as errors instead of diagnostics.
    #[serde(default)]
    strict_operators: bool,
}

impl PruneChannelsConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seed masks.
    pub fn with_spec(mut self, spec: PruneSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Enable or disable strict operator handling.
    pub fn with_strict_operators(mut self, strict: bool) -> Self {
        self.strict_operators = strict;
        self
    }

    /// Get the seed masks.
    pub fn spec(&self) -> &PruneSpec {
        &self.spec
    }

    /// Check if unknown operators are rejected.
    pub fn strict_operators(&self) -> bool {
        self.strict_operators
    }
}
