//! Sparsity masks
//!
//! A mask records the channel indices of a tensor that are pending removal.
//! Most tensors use a single index set along the channel axis. The weight
//! operand of a MatMul or Conv has two unrelated channel spaces (the node's
//! input channels and its output channels), so it carries a
//! [`WeightChannelSet`] instead and the two sides are never mixed.

mod entry;


pub use entry::{ChannelRole, SeedEntry};
pub(crate) use entry::EntryRepr;

use super::error::{PruneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered set of channel indices.
pub type ChannelSet = BTreeSet<usize>;

/// Channel sets for the weight operand of a dot-product node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightChannelSet {
    /// Channels in the consuming node's input-channel space.
    pub input: ChannelSet,
    /// Channels in the consuming node's output-channel space.
    pub output: ChannelSet,
}

impl WeightChannelSet {
    /// Create from input- and output-side channel indices.
    pub fn new(
        input: impl IntoIterator<Item = usize>,
        output: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            input: input.into_iter().collect(),
            output: output.into_iter().collect(),
        }
    }

    /// Output-side only, as used for depthwise weights.
    pub fn output_only(output: ChannelSet) -> Self {
        Self {
            input: ChannelSet::new(),
            output,
        }
    }

    /// Both sides empty.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }

    /// Total number of entries across both sides.
    pub fn len(&self) -> usize {
        self.input.len() + self.output.len()
    }

    /// Side-wise union.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            input: self.input.union(&other.input).copied().collect(),
            output: self.output.union(&other.output).copied().collect(),
        }
    }

    /// Whether both sides of `self` contain the respective sides of `other`.
    pub fn is_superset(&self, other: &Self) -> bool {
        self.input.is_superset(&other.input) && self.output.is_superset(&other.output)
    }
}

/// Pending channel removals for one tensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mask {
    /// Channel indices along the tensor's channel axis.
    Plain(ChannelSet),
    /// Input/output channel indices of a MatMul or Conv weight.
    Weight(WeightChannelSet),
}

impl Mask {
    /// Plain mask from channel indices.
    pub fn plain(channels: impl IntoIterator<Item = usize>) -> Self {
        Mask::Plain(channels.into_iter().collect())
    }

    /// Weight mask from input- and output-side channel indices.
    pub fn weight(
        input: impl IntoIterator<Item = usize>,
        output: impl IntoIterator<Item = usize>,
    ) -> Self {
        Mask::Weight(WeightChannelSet::new(input, output))
    }

    /// No channels pending.
    pub fn is_empty(&self) -> bool {
        match self {
            Mask::Plain(set) => set.is_empty(),
            Mask::Weight(w) => w.is_empty(),
        }
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        match self {
            Mask::Plain(set) => set.len(),
            Mask::Weight(w) => w.len(),
        }
    }

    /// Empty mask of the same variant.
    pub fn cleared(&self) -> Self {
        match self {
            Mask::Plain(_) => Mask::Plain(ChannelSet::new()),
            Mask::Weight(_) => Mask::Weight(WeightChannelSet::default()),
        }
    }

    /// Short variant name for messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Mask::Plain(_) => "plain",
            Mask::Weight(_) => "weight",
        }
    }

    /// Whether `self` contains every entry of `other` (same variant required).
    pub fn is_superset(&self, other: &Mask) -> bool {
        match (self, other) {
            (Mask::Plain(a), Mask::Plain(b)) => a.is_superset(b),
            (Mask::Weight(a), Mask::Weight(b)) => a.is_superset(b),
            _ => other.is_empty(),
        }
    }
}

/// Read a mask in the plain role; absent means empty.
pub(crate) fn plain_set(mask: Option<&Mask>, tensor: &str, node: &str) -> Result<ChannelSet> {
    match mask {
        None => Ok(ChannelSet::new()),
        Some(Mask::Plain(set)) => Ok(set.clone()),
        // an empty weight mask carries no removals and is harmless here
        Some(Mask::Weight(w)) if w.is_empty() => Ok(ChannelSet::new()),
        Some(m) => Err(PruneError::MaskRoleMismatch {
            tensor: tensor.to_string(),
            node: node.to_string(),
            expected: "plain",
            found: m.variant_name(),
        }),
    }
}

/// Read a mask in the dot-product weight role; absent means empty.
pub(crate) fn weight_set(
    mask: Option<&Mask>,
    tensor: &str,
    node: &str,
) -> Result<WeightChannelSet> {
    match mask {
        None => Ok(WeightChannelSet::default()),
        Some(Mask::Weight(w)) => Ok(w.clone()),
        Some(Mask::Plain(set)) if set.is_empty() => Ok(WeightChannelSet::default()),
        Some(m) => Err(PruneError::MaskRoleMismatch {
            tensor: tensor.to_string(),
            node: node.to_string(),
            expected: "weight",
            found: m.variant_name(),
        }),
    }
}
