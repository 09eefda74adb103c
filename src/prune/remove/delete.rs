//! Channel deletion on arrays and shapes.

use crate::prune::mask::ChannelSet;
use crate::prune::{PruneError, Result};
use ndarray::{ArrayD, Axis};

/// Rank-0 or single-element tensors are never pruned.
fn is_scalar_like(shape: &[usize]) -> bool {
    shape.is_empty() || shape.iter().product::<usize>() == 1
}

/// Tensor being rewritten and the node whose edge it was reached through.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'a> {
    pub tensor: &'a str,
    pub node: &'a str,
}

/// Validate `axis` and every index in `channels` against `shape`.
fn check_range(
    shape: &[usize],
    channels: &ChannelSet,
    axis: usize,
    site: Site<'_>,
) -> Result<()> {
    let Some(&extent) = shape.get(axis) else {
        return Err(PruneError::AxisOutOfRange {
            tensor: site.tensor.to_string(),
            node: site.node.to_string(),
            axis,
            rank: shape.len(),
        });
    };
    match channels.iter().find(|&&idx| idx >= extent) {
        Some(&index) => Err(PruneError::ChannelOutOfRange {
            tensor: site.tensor.to_string(),
            node: site.node.to_string(),
            index,
            axis,
            extent,
        }),
        None => Ok(()),
    }
}

/// Delete the slices at `channels` along `axis`.
pub(crate) fn remove_channels(
    data: &ArrayD<f32>,
    channels: &ChannelSet,
    axis: usize,
    site: Site<'_>,
) -> Result<ArrayD<f32>> {
    if is_scalar_like(data.shape()) {
        return Ok(data.clone());
    }
    check_range(data.shape(), channels, axis, site)?;
    let keep: Vec<usize> = (0..data.len_of(Axis(axis)))
        .filter(|i| !channels.contains(i))
        .collect();
    Ok(data.select(Axis(axis), &keep))
}

/// Shrink `shape` by the number of channels removed along `axis`.
pub(crate) fn remove_shape_channels(
    shape: &[usize],
    channels: &ChannelSet,
    axis: usize,
    site: Site<'_>,
) -> Result<Vec<usize>> {
    if is_scalar_like(shape) {
        return Ok(shape.to_vec());
    }
    check_range(shape, channels, axis, site)?;
    let mut new_shape = shape.to_vec();
    new_shape[axis] -= channels.len();
    Ok(new_shape)
}
