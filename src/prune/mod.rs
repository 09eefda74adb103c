//! Structured channel pruning
//!
//! Removes whole channels from a graph given caller-chosen seed masks:
//!
//! - **Seeding**: install masks from a [`PruneSpec`]
//! - **Propagation**: grow masks across nodes using per-operator transfer rules
//! - **Removal**: delete masked channels from constants and shapes
//! - **Orchestration**: [`PruneChannels`] checks preconditions and runs one cycle
//!
//! Masks only ever grow during propagation, so repeating a cycle while it
//! reports a change always terminates.
//!
//! # Example
//!
//! ```
//! use chanprune::graph::{Attribute, Model, Node, OpKind};
//! use chanprune::prune::{PruneChannels, PruneChannelsConfig, PruneSpec};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let model = Model::new()
//!     .with_tensor("x", vec![1, 4, 8, 8])
//!     .with_initializer("w", ArrayD::zeros(IxDyn(&[8, 4, 3, 3])))
//!     .with_tensor("y", vec![1, 8, 6, 6])
//!     .with_node(
//!         Node::new("conv0", OpKind::Conv, ["x", "w"], ["y"])
//!             .with_attr("group", Attribute::Int(1)),
//!     );
//!
//! let spec = PruneSpec::new().with_weight_channels("w", [], [1, 3]);
//! let pruner = PruneChannels::new(PruneChannelsConfig::new().with_spec(spec));
//! let out = pruner.apply(model).unwrap();
//!
//! assert_eq!(out.model.initializer("w").unwrap().shape(), &[6, 4, 3, 3]);
//! assert_eq!(out.model.tensor_shape("y"), Some(&[1, 6, 6, 6][..]));
//! ```

mod config;
mod diagnostics;
mod error;
pub mod layout;
mod mask;
mod pipeline;
mod propagate;
mod remove;
mod seed;
pub mod transfer;

pub use config::{PruneChannelsConfig, PruneSpec};
pub use diagnostics::Diagnostic;
pub use error::{ErrorKind, PruneError, Result};
pub use mask::{ChannelRole, ChannelSet, Mask, SeedEntry, WeightChannelSet};
pub use pipeline::{PruneChannels, PruneReport, PruningStage, Transformation, Transformed};
pub use propagate::PropagateMasks;
pub use remove::RemoveMaskedChannels;
pub use seed::ApplyMasks;
