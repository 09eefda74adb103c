//! Mask seeding: install caller-supplied masks.

use super::config::PruneSpec;
use super::mask::{ChannelRole, ChannelSet, Mask, SeedEntry, WeightChannelSet};
use super::pipeline::{PruningStage, Transformation, Transformed};
use super::{PruneError, Result};
use crate::graph::{Model, Node};
use tracing::debug;

/// Install the masks of a [`PruneSpec`], overwriting any existing mask.
///
/// The whole spec is checked before the first mask is written. Seeding is a
/// one-shot write and never asks to be run again.
#[derive(Debug, Clone)]
pub struct ApplyMasks {
    spec: PruneSpec,
}

impl ApplyMasks {
    /// Create a seeding stage for `spec`.
    pub fn new(spec: PruneSpec) -> Self {
        Self { spec }
    }

    /// Decode every spec entry against `model` without writing anything.
    pub fn encode<'s>(&'s self, model: &Model) -> Result<Vec<(&'s str, Mask)>> {
        self.spec
            .iter()
            .map(|(tensor, entries)| Ok((tensor, encode_seed(model, tensor, entries)?)))
            .collect()
    }

    /// Get the spec being applied.
    pub fn spec(&self) -> &PruneSpec {
        &self.spec
    }
}

impl Transformation for ApplyMasks {
    fn stage(&self) -> PruningStage {
        PruningStage::Seeding
    }

    fn apply(&self, mut model: Model) -> Result<Transformed> {
        for (tensor, mask) in self.encode(&model)? {
            debug!(tensor, mask = ?mask, "seeding mask");
            model.set_sparsity(tensor, Some(mask));
        }

        Ok(Transformed::new(model, false))
    }
}

/// The dot-product node that uses constant `tensor` as its weight, if any.
pub(crate) fn weight_consumer<'a>(model: &'a Model, tensor: &'a str) -> Option<&'a Node> {
    model.initializer(tensor)?;
    model
        .consumers(tensor)
        .find(|n| n.op.is_dot_product() && n.inputs.get(1).is_some_and(|w| w == tensor))
}

/// Name the first reader of `tensor` for error messages.
fn describe_consumer(model: &Model, tensor: &str) -> String {
    model
        .consumers(tensor)
        .next()
        .map_or_else(|| "no node".to_string(), |n| format!("node '{}'", n.name))
}

/// Decode seed entries into the mask variant the tensor's role requires.
fn encode_seed(model: &Model, tensor: &str, entries: &[SeedEntry]) -> Result<Mask> {
    match weight_consumer(model, tensor) {
        Some(node) => {
            let mut weight = WeightChannelSet::default();
            for entry in entries {
                match *entry {
                    SeedEntry::Role(ChannelRole::Input, idx) => {
                        weight.input.insert(idx);
                    }
                    SeedEntry::Role(ChannelRole::Output, idx) => {
                        weight.output.insert(idx);
                    }
                    SeedEntry::Channel(_) => {
                        return Err(PruneError::WeightMaskNotRoleTagged {
                            tensor: tensor.to_string(),
                            node: node.name.clone(),
                            op: node.op.to_string(),
                        })
                    }
                }
            }
            Ok(Mask::Weight(weight))
        }
        None => entries
            .iter()
            .map(|entry| match *entry {
                SeedEntry::Channel(idx) => Ok(idx),
                SeedEntry::Role(..) => Err(PruneError::RoleTaggedPlainMask {
                    tensor: tensor.to_string(),
                    consumer: describe_consumer(model, tensor),
                }),
            })
            .collect::<Result<ChannelSet>>()
            .map(Mask::Plain),
    }
}
