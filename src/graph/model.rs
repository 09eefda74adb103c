//! In-memory model store: ordered nodes plus named tensors.

use super::node::Node;
use super::op::OpKind;
use crate::prune::Mask;
use ndarray::ArrayD;
use std::collections::BTreeMap;

/// Per-tensor state: shape, optional constant data and optional sparsity mask.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorInfo {
    /// Ordered dimension sizes
    pub shape: Vec<usize>,
    /// Constant initializer (weights, biases, scales)
    pub initializer: Option<ArrayD<f32>>,
    /// Pending channel removals
    pub sparsity: Option<Mask>,
}

/// Computation graph with named tensors.
///
/// Nodes are kept in insertion order, which callers must keep topological.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    nodes: Vec<Node>,
    tensors: BTreeMap<String, TensorInfo>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; nodes must be added in topological order.
    pub fn add_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Builder form of [`Model::add_node`].
    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    /// Register a dynamic tensor with a known shape.
    pub fn add_tensor(&mut self, name: impl Into<String>, shape: Vec<usize>) {
        self.tensors.entry(name.into()).or_default().shape = shape;
    }

    /// Builder form of [`Model::add_tensor`].
    pub fn with_tensor(mut self, name: impl Into<String>, shape: Vec<usize>) -> Self {
        self.add_tensor(name, shape);
        self
    }

    /// Register a constant tensor; its shape is taken from the array.
    pub fn add_initializer(&mut self, name: impl Into<String>, data: ArrayD<f32>) {
        self.set_initializer(&name.into(), data);
    }

    /// Builder form of [`Model::add_initializer`].
    pub fn with_initializer(mut self, name: impl Into<String>, data: ArrayD<f32>) -> Self {
        self.add_initializer(name, data);
        self
    }

    /// Nodes in stored order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by index
    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Get a mutable reference to a node by index
    pub fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.nodes.get_mut(idx)
    }

    /// Nodes with the given op type, in stored order
    pub fn nodes_by_op<'a>(&'a self, op: &'a OpKind) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| &n.op == op)
    }

    /// Nodes that read `tensor`, in stored order.
    pub fn consumers<'a>(&'a self, tensor: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.inputs.iter().any(|i| i == tensor))
    }

    /// Full tensor record.
    pub fn tensor(&self, name: &str) -> Option<&TensorInfo> {
        self.tensors.get(name)
    }

    /// Constant data for `name`, if it is an initializer.
    pub fn initializer(&self, name: &str) -> Option<&ArrayD<f32>> {
        self.tensors.get(name).and_then(|t| t.initializer.as_ref())
    }

    /// Replace the constant data for `name`, keeping the recorded shape in sync.
    pub fn set_initializer(&mut self, name: &str, data: ArrayD<f32>) {
        let entry = self.tensors.entry(name.to_string()).or_default();
        entry.shape = data.shape().to_vec();
        entry.initializer = Some(data);
    }

    /// Recorded shape of `name`.
    pub fn tensor_shape(&self, name: &str) -> Option<&[usize]> {
        self.tensors.get(name).map(|t| t.shape.as_slice())
    }

    /// Overwrite the recorded shape of `name`.
    pub fn set_tensor_shape(&mut self, name: &str, shape: Vec<usize>) {
        self.tensors.entry(name.to_string()).or_default().shape = shape;
    }

    /// Sparsity mask on `name`.
    pub fn sparsity(&self, name: &str) -> Option<&Mask> {
        self.tensors.get(name).and_then(|t| t.sparsity.as_ref())
    }

    /// Overwrite the sparsity mask on `name`.
    pub fn set_sparsity(&mut self, name: &str, mask: Option<Mask>) {
        self.tensors.entry(name.to_string()).or_default().sparsity = mask;
    }

    /// Whether any tensor carries a non-empty mask.
    pub fn has_pending_masks(&self) -> bool {
        self.tensors
            .values()
            .any(|t| t.sparsity.as_ref().is_some_and(|m| !m.is_empty()))
    }
}
