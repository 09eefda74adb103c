//! Chanprune: structured channel pruning for dataflow graphs
//!
//! Removes whole input/output channels from MatMul and Conv layers and keeps
//! every neighbouring tensor consistent with the removal.
//!
//! # Modules
//!
//! - [`graph`]: in-memory model store (nodes, tensors, constants, masks)
//! - [`prune`]: mask seeding, propagation, removal and the orchestrator

pub mod graph;
pub mod prune;

pub use graph::{Model, Node, OpKind};
pub use prune::{PruneChannels, PruneChannelsConfig, PruneError, PruneSpec, Result};
