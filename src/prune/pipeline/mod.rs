//! Channel pruning pipeline
//!
//! One cycle runs:
//! 1. Validate: check graph preconditions and decode the prune spec
//! 2. Seed: install the caller's masks
//! 3. Propagate: one sweep of per-operator transfer rules
//! 4. Remove: delete masked channels and clear the masks
//!
//! The cycle is repeated by the caller until it reports no change.

mod orchestrator;
mod report;
mod stage;
#[cfg(test)]
mod tests;

pub(crate) use orchestrator::check_preconditions;
pub use orchestrator::PruneChannels;
pub use report::PruneReport;
pub use stage::{PruningStage, Transformation, Transformed};
