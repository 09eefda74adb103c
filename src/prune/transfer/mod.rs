//! Per-operator mask transfer rules
//!
//! Each rule is a pure function from a node's current masks to updated ones.
//! Rules only ever take unions, so applying one never shrinks a mask.

#[cfg(test)]
mod proptests;

use super::mask::{ChannelSet, WeightChannelSet};
use crate::graph::OpKind;

/// How masks flow through an operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferClass {
    /// A masked channel on any operand masks every operand.
    ///
    /// Only the bias-free (zero-point-free) variants of `Quant` and
    /// `MultiThreshold` behave this way; the rule does not check for that.
    Bidirectional,
    /// Output demand masks the inputs, never the other way around.
    BackwardOnly,
    /// MatMul/Conv: input and output channel spaces are decoupled by the weight.
    DotProduct,
    /// No rule; masks are left untouched.
    Opaque,
}

impl TransferClass {
    /// Transfer class of an operator kind.
    pub fn of(op: &OpKind) -> Self {
        match op {
            OpKind::Mul | OpKind::Div | OpKind::MultiThreshold | OpKind::Quant | OpKind::Relu => {
                TransferClass::Bidirectional
            }
            OpKind::Add | OpKind::Sub | OpKind::BatchNormalization => TransferClass::BackwardOnly,
            OpKind::MatMul | OpKind::Conv => TransferClass::DotProduct,
            OpKind::Other(_) => TransferClass::Opaque,
        }
    }
}

/// Plain masks of every input and output of an elementwise node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementwiseMasks {
    pub inputs: Vec<ChannelSet>,
    pub outputs: Vec<ChannelSet>,
}

impl ElementwiseMasks {
    fn union_all(&self) -> ChannelSet {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .flat_map(|set| set.iter().copied())
            .collect()
    }
}

/// Masks of a dot-product node's data input, weight and output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotProductMasks {
    /// Input 0, in the node's input-channel space.
    pub data: ChannelSet,
    /// Input 1.
    pub weight: WeightChannelSet,
    /// Output 0, in the node's output-channel space.
    pub output: ChannelSet,
}

/// Every operand receives the union of all operand masks.
pub fn bidirectional(masks: &ElementwiseMasks) -> ElementwiseMasks {
    let union = masks.union_all();
    ElementwiseMasks {
        inputs: vec![union.clone(); masks.inputs.len()],
        outputs: vec![union; masks.outputs.len()],
    }
}

/// Inputs receive the union of all operand masks; outputs are unchanged.
pub fn backward_only(masks: &ElementwiseMasks) -> ElementwiseMasks {
    let union = masks.union_all();
    ElementwiseMasks {
        inputs: vec![union; masks.inputs.len()],
        outputs: masks.outputs.clone(),
    }
}

/// Merge the weight's channel sides with the data and output masks.
///
/// Dense nodes keep the input and output spaces apart. A depthwise conv maps
/// channel `c` in to channel `c` out, so everything collapses into one set,
/// recorded on the weight's output side only.
pub fn dot_product(masks: &DotProductMasks, depthwise: bool) -> DotProductMasks {
    let merged_in: ChannelSet = masks.weight.input.union(&masks.data).copied().collect();
    let merged_out: ChannelSet = masks.weight.output.union(&masks.output).copied().collect();

    if depthwise {
        let merged: ChannelSet = merged_in.union(&merged_out).copied().collect();
        DotProductMasks {
            data: merged.clone(),
            weight: WeightChannelSet::output_only(merged.clone()),
            output: merged,
        }
    } else {
        DotProductMasks {
            data: merged_in.clone(),
            weight: WeightChannelSet {
                input: merged_in,
                output: merged_out.clone(),
            },
            output: merged_out,
        }
    }
}
