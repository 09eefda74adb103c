//! Non-fatal findings reported by the pruning passes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node that masks could not propagate through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Offending node name
    pub node: String,
    /// Its op type
    pub op_type: String,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Masks are not propagated through `op_type`.
    pub fn unsupported_operator(node: impl Into<String>, op_type: impl Into<String>) -> Self {
        let op_type = op_type.into();
        Self {
            node: node.into(),
            message: format!("Can't propagate sparsity mask through op_type {op_type}"),
            op_type,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (node '{}')", self.message, self.node)
    }
}
