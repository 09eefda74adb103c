//! Computation graph store
//!
//! A minimal in-memory graph: an ordered list of [`Node`]s referring to named
//! tensors, each of which may hold a constant initializer and a sparsity
//! [`Mask`](crate::prune::Mask). The pruning passes read and rewrite it.

mod model;
mod node;
mod op;


pub use model::{Model, TensorInfo};
pub use node::{Attribute, Node};
pub use op::OpKind;
