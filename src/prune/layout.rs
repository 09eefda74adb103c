//! Channel axis conventions.
//!
//! Axes are fixed and assume NCHW activations. They are not derived from any
//! layout metadata on the graph.

/// Channel axis of dynamic (activation) tensors.
pub const ACTIVATION_CHANNEL_AXIS: usize = 1;

/// MatMul weights are `[in, out]`.
pub const MATMUL_WEIGHT_INPUT_AXIS: usize = 0;
/// MatMul weights are `[in, out]`.
pub const MATMUL_WEIGHT_OUTPUT_AXIS: usize = 1;

/// Conv weights are `[out, in / group, kH, kW]`.
pub const CONV_WEIGHT_INPUT_AXIS: usize = 1;
/// Conv weights are `[out, in / group, kH, kW]`.
pub const CONV_WEIGHT_OUTPUT_AXIS: usize = 0;

/// Channel axis for plain constants (biases, scales, thresholds).
pub fn constant_channel_axis(rank: usize) -> usize {
    if rank >= 2 {
        1
    } else {
        0
    }
}
