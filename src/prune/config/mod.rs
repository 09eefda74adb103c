//! Pruning configuration module
//!
//! Seed masks supplied by the caller and the options of the pruning pass.

mod prune_config;
mod prune_spec;


pub use prune_config::PruneChannelsConfig;
pub use prune_spec::PruneSpec;
