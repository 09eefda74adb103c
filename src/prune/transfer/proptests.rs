//! Property-based tests for the transfer rules.

use super::*;
use proptest::prelude::*;

fn channel_set() -> impl Strategy<Value = ChannelSet> {
    proptest::collection::btree_set(0usize..32, 0..8)
}

fn elementwise() -> impl Strategy<Value = ElementwiseMasks> {
    (
        proptest::collection::vec(channel_set(), 1..4),
        proptest::collection::vec(channel_set(), 1..3),
    )
        .prop_map(|(inputs, outputs)| ElementwiseMasks { inputs, outputs })
}

fn dot_product_masks() -> impl Strategy<Value = DotProductMasks> {
    (channel_set(), channel_set(), channel_set(), channel_set()).prop_map(
        |(data, w_in, w_out, output)| DotProductMasks {
            data,
            weight: WeightChannelSet {
                input: w_in,
                output: w_out,
            },
            output,
        },
    )
}

proptest! {
    /// All operands of a bidirectional node end up with the same mask
    #[test]
    fn bidirectional_masks_pairwise_equal(masks in elementwise()) {
        let out = bidirectional(&masks);
        let first = out.inputs[0].clone();
        for m in out.inputs.iter().chain(out.outputs.iter()) {
            prop_assert_eq!(m, &first);
        }
    }

    /// Rules never drop a channel
    #[test]
    fn elementwise_rules_monotone(masks in elementwise()) {
        for out in [bidirectional(&masks), backward_only(&masks)] {
            for (before, after) in masks.inputs.iter().zip(out.inputs.iter()) {
                prop_assert!(after.is_superset(before));
            }
            for (before, after) in masks.outputs.iter().zip(out.outputs.iter()) {
                prop_assert!(after.is_superset(before));
            }
        }
    }

    /// Backward-only nodes never change their outputs
    #[test]
    fn backward_only_outputs_fixed(masks in elementwise()) {
        let out = backward_only(&masks);
        prop_assert_eq!(out.outputs, masks.outputs);
    }

    /// Dense dot products never move channels between input and output spaces
    #[test]
    fn dense_dot_product_decoupled(masks in dot_product_masks()) {
        let out = dot_product(&masks, false);
        let expected_in: ChannelSet = masks.data.union(&masks.weight.input).copied().collect();
        let expected_out: ChannelSet = masks.output.union(&masks.weight.output).copied().collect();
        prop_assert_eq!(&out.data, &expected_in);
        prop_assert_eq!(&out.output, &expected_out);
        prop_assert_eq!(&out.weight.input, &expected_in);
        prop_assert_eq!(&out.weight.output, &expected_out);
    }

    /// Depthwise dot products tie input, output and weight output together
    #[test]
    fn depthwise_dot_product_coupled(masks in dot_product_masks()) {
        let out = dot_product(&masks, true);
        prop_assert_eq!(&out.data, &out.output);
        prop_assert_eq!(&out.weight.output, &out.output);
        prop_assert!(out.weight.input.is_empty());
        prop_assert!(out.output.is_superset(&masks.data));
        prop_assert!(out.output.is_superset(&masks.weight.input));
    }

    /// Applying a rule twice gives the same result as applying it once
    #[test]
    fn dot_product_idempotent(masks in dot_product_masks(), depthwise in any::<bool>()) {
        let once = dot_product(&masks, depthwise);
        let twice = dot_product(&once, depthwise);
        prop_assert_eq!(once, twice);
    }
}
