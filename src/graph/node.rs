//! Graph nodes and their attributes.

use super::op::OpKind;
use crate::prune::{PruneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operator attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Int(i64),
    Float(f32),
    Str(String),
}

/// A node in the computation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node name, used in diagnostics and errors
    pub name: String,
    /// Operation type
    pub op: OpKind,
    /// Ordered input tensor names
    pub inputs: Vec<String>,
    /// Ordered output tensor names
    pub outputs: Vec<String>,
    /// Operator attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl Node {
    /// Create a node without attributes.
    pub fn new<I, O>(name: impl Into<String>, op: OpKind, inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.into(),
            op,
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Resolve an integer attribute, failing if it is absent or not an integer.
    pub fn attr_int(&self, name: &str) -> Result<i64> {
        match self.attributes.get(name) {
            Some(Attribute::Int(v)) => Ok(*v),
            Some(_) => Err(PruneError::MalformedNode {
                node: self.name.clone(),
                op: self.op.to_string(),
                reason: format!("attribute '{name}' is not an integer"),
            }),
            None => Err(PruneError::MissingAttribute {
                node: self.name.clone(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Overwrite an integer attribute.
    pub fn set_attr_int(&mut self, name: impl Into<String>, value: i64) {
        self.attributes.insert(name.into(), Attribute::Int(value));
    }

    /// Input tensor at `idx`, or a `MalformedNode` error.
    pub fn input(&self, idx: usize) -> Result<&str> {
        self.inputs
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| PruneError::MalformedNode {
                node: self.name.clone(),
                op: self.op.to_string(),
                reason: format!("expected at least {} inputs, found {}", idx + 1, self.inputs.len()),
            })
    }

    /// Output tensor at `idx`, or a `MalformedNode` error.
    pub fn output(&self, idx: usize) -> Result<&str> {
        self.outputs
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| PruneError::MalformedNode {
                node: self.name.clone(),
                op: self.op.to_string(),
                reason: format!(
                    "expected at least {} outputs, found {}",
                    idx + 1,
                    self.outputs.len()
                ),
            })
    }

    /// Iterate over all input and output tensor names, inputs first.
    pub fn tensors(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().chain(self.outputs.iter()).map(String::as_str)
    }
}
