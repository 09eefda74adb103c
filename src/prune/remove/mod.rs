//! Channel removal: realize stable masks by rewriting tensors.
//!
//! Every tensor with a non-empty mask is shrunk and its mask cleared:
//!
//! - dynamic tensors only have their recorded shape shrunk along the
//!   activation channel axis;
//! - MatMul weights lose rows (input side) and columns (output side);
//! - Conv weights lose input and output slices, or only output slices for a
//!   depthwise conv, whose `group` attribute follows the new channel count;
//! - other constants lose slices along their channel axis.

mod delete;


use self::delete::{remove_channels, remove_shape_channels, Site};
use super::layout::{
    constant_channel_axis, ACTIVATION_CHANNEL_AXIS, CONV_WEIGHT_INPUT_AXIS,
    CONV_WEIGHT_OUTPUT_AXIS, MATMUL_WEIGHT_INPUT_AXIS, MATMUL_WEIGHT_OUTPUT_AXIS,
};
use super::mask::{plain_set, weight_set, Mask};
use super::pipeline::{PruningStage, Transformation, Transformed};
use super::{PruneError, Result};
use crate::graph::{Model, Node, OpKind};
use ndarray::{ArrayD, Axis};
use tracing::{debug, info};

/// Remove masked channels from every tensor referenced by a node.
///
/// Reports a change whenever any tensor was rewritten: shrinking one tensor
/// can leave its neighbours needing another round.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveMaskedChannels;

impl RemoveMaskedChannels {
    /// Create the removal stage.
    pub fn new() -> Self {
        Self
    }
}

impl Transformation for RemoveMaskedChannels {
    fn stage(&self) -> PruningStage {
        PruningStage::Removing
    }

    fn apply(&self, mut model: Model) -> Result<Transformed> {
        let mut rewritten = 0usize;

        for idx in 0..model.nodes().len() {
            let Some(node) = model.node(idx).cloned() else {
                continue;
            };
            let operands = node.inputs.iter().enumerate().map(|(pos, t)| (Some(pos), t));
            let results = node.outputs.iter().map(|t| (None, t));

            for (input_pos, tensor) in operands.chain(results) {
                let Some(mask) = model.sparsity(tensor).filter(|m| !m.is_empty()).cloned() else {
                    continue;
                };
                let old_shape = model.tensor_shape(tensor).map(<[usize]>::to_vec);
                remove_tensor_channels(&mut model, idx, &node, input_pos, tensor, &mask)?;
                model.set_sparsity(tensor, Some(mask.cleared()));
                debug!(
                    tensor = %tensor,
                    node = %node.name,
                    old_shape = ?old_shape,
                    new_shape = ?model.tensor_shape(tensor),
                    "removed masked channels"
                );
                rewritten += 1;
            }
        }

        info!(rewritten, "masked channel removal done");
        Ok(Transformed::new(model, rewritten > 0))
    }
}

fn remove_tensor_channels(
    model: &mut Model,
    node_idx: usize,
    node: &Node,
    input_pos: Option<usize>,
    tensor: &str,
    mask: &Mask,
) -> Result<()> {
    let site = Site {
        tensor,
        node: &node.name,
    };
    let Some(data) = model.initializer(tensor) else {
        let channels = plain_set(Some(mask), tensor, &node.name)?;
        // a mask with no recorded shape means the tensor was never registered
        let shape = model
            .tensor_shape(tensor)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PruneError::MalformedNode {
                node: node.name.clone(),
                op: node.op.to_string(),
                reason: format!("tensor '{tensor}' has no recorded shape"),
            })?;
        let new_shape = remove_shape_channels(shape, &channels, ACTIVATION_CHANNEL_AXIS, site)?;
        model.set_tensor_shape(tensor, new_shape);
        return Ok(());
    };

    let is_weight = input_pos == Some(1) && node.op.is_dot_product();
    let mut new_group = None;
    let new_data = match (&node.op, is_weight) {
        (OpKind::MatMul, true) => {
            let w = weight_set(Some(mask), tensor, &node.name)?;
            let t = remove_channels(data, &w.input, MATMUL_WEIGHT_INPUT_AXIS, site)?;
            remove_channels(&t, &w.output, MATMUL_WEIGHT_OUTPUT_AXIS, site)?
        }
        (OpKind::Conv, true) => {
            let w = weight_set(Some(mask), tensor, &node.name)?;
            let group = node.attr_int("group")?;
            if conv_is_depthwise(node, group, data)? {
                let t = remove_channels(data, &w.output, CONV_WEIGHT_OUTPUT_AXIS, site)?;
                new_group = Some(t.len_of(Axis(CONV_WEIGHT_OUTPUT_AXIS)) as i64);
                t
            } else {
                let t = remove_channels(data, &w.input, CONV_WEIGHT_INPUT_AXIS, site)?;
                remove_channels(&t, &w.output, CONV_WEIGHT_OUTPUT_AXIS, site)?
            }
        }
        _ => {
            let channels = plain_set(Some(mask), tensor, &node.name)?;
            remove_channels(data, &channels, constant_channel_axis(data.ndim()), site)?
        }
    };
    model.set_initializer(tensor, new_data);
    if let (Some(group), Some(n)) = (new_group, model.node_mut(node_idx)) {
        n.set_attr_int("group", group);
    }
    Ok(())
}

/// Only dense (`group == 1`) and fully depthwise convs are supported.
///
/// A fully depthwise weight has one input channel per group, so the check is
/// made on the weight itself rather than on the (possibly already shrunk)
/// data input.
fn conv_is_depthwise(node: &Node, group: i64, weight: &ArrayD<f32>) -> Result<bool> {
    let input_width = weight.shape().get(CONV_WEIGHT_INPUT_AXIS).copied().ok_or_else(|| {
        PruneError::MalformedNode {
            node: node.name.clone(),
            op: node.op.to_string(),
            reason: format!("conv weight has rank {}", weight.ndim()),
        }
    })?;
    if group != 1 && input_width != 1 {
        return Err(PruneError::UnsupportedGrouping {
            node: node.name.clone(),
            group,
            input_width,
        });
    }
    Ok(group > 1)
}
