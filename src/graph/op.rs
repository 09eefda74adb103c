//! Operator kinds known to the pruning passes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of operation in the computation graph.
///
/// Op types outside the known set are kept verbatim in [`OpKind::Other`] so
/// the graph can still be traversed; masks never propagate through them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum OpKind {
    Mul,
    Div,
    MultiThreshold,
    Quant,
    Relu,
    Add,
    Sub,
    BatchNormalization,
    MatMul,
    Conv,
    Other(String),
}

impl OpKind {
    /// ONNX op-type string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            OpKind::Mul => "Mul",
            OpKind::Div => "Div",
            OpKind::MultiThreshold => "MultiThreshold",
            OpKind::Quant => "Quant",
            OpKind::Relu => "Relu",
            OpKind::Add => "Add",
            OpKind::Sub => "Sub",
            OpKind::BatchNormalization => "BatchNormalization",
            OpKind::MatMul => "MatMul",
            OpKind::Conv => "Conv",
            OpKind::Other(name) => name,
        }
    }

    /// Matrix-multiply or convolution: ops whose second input is a weight
    /// with separate input- and output-channel spaces.
    pub fn is_dot_product(&self) -> bool {
        matches!(self, OpKind::MatMul | OpKind::Conv)
    }
}

impl FromStr for OpKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Mul" => OpKind::Mul,
            "Div" => OpKind::Div,
            "MultiThreshold" => OpKind::MultiThreshold,
            "Quant" => OpKind::Quant,
            "Relu" => OpKind::Relu,
            "Add" => OpKind::Add,
            "Sub" => OpKind::Sub,
            "BatchNormalization" => OpKind::BatchNormalization,
            "MatMul" => OpKind::MatMul,
            "Conv" => OpKind::Conv,
            other => OpKind::Other(other.to_string()),
        })
    }
}

impl From<String> for OpKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<OpKind> for String {
    fn from(op: OpKind) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
