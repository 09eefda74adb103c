//! Caller-supplied seed masks.

use crate::prune::mask::{EntryRepr, SeedEntry};
use crate::prune::{PruneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tensor name to the channels that should be removed from it.
///
/// Entries for the weight of a MatMul/Conv node must be role-prefixed
/// (`"iN"` / `"oN"`); entries for any other tensor are bare indices.
///
/// # Example
///
/// ```
/// use chanprune::prune::PruneSpec;
///
/// let spec = PruneSpec::from_json(r#"{ "conv0_w": ["o1", "o3"], "bias0": [1, 3] }"#).unwrap();
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PruneSpec {
    entries: BTreeMap<String, Vec<SeedEntry>>,
}

impl PruneSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a spec from a JSON object.
    ///
    /// Malformed JSON is a [`PruneError::SpecParse`]; well-formed JSON with
    /// bad entry text is a [`PruneError::InvalidSeedEntry`] naming the tensor.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<EntryRepr>> =
            serde_json::from_str(json).map_err(|e| PruneError::SpecParse {
                message: e.to_string(),
            })?;
        let entries = raw
            .into_iter()
            .map(|(tensor, reprs)| {
                let decoded = reprs
                    .into_iter()
                    .map(SeedEntry::try_from)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| PruneError::InvalidSeedEntry {
                        tensor: tensor.clone(),
                        entry: e.0,
                    })?;
                Ok((tensor, decoded))
            })
            .collect::<Result<_>>()?;
        Ok(Self { entries })
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PruneError::SpecParse {
            message: e.to_string(),
        })
    }

    /// Add bare channel indices for a non-weight tensor.
    pub fn with_channels(
        mut self,
        tensor: impl Into<String>,
        channels: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.entries
            .entry(tensor.into())
            .or_default()
            .extend(channels.into_iter().map(SeedEntry::Channel));
        self
    }

    /// Add input- and output-side channels for a MatMul/Conv weight.
    pub fn with_weight_channels(
        mut self,
        tensor: impl Into<String>,
        inputs: impl IntoIterator<Item = usize>,
        outputs: impl IntoIterator<Item = usize>,
    ) -> Self {
        let list = self.entries.entry(tensor.into()).or_default();
        list.extend(inputs.into_iter().map(SeedEntry::input));
        list.extend(outputs.into_iter().map(SeedEntry::output));
        self
    }

    /// Add raw entries for a tensor.
    pub fn with_entries(
        mut self,
        tensor: impl Into<String>,
        entries: impl IntoIterator<Item = SeedEntry>,
    ) -> Self {
        self.entries.entry(tensor.into()).or_default().extend(entries);
        self
    }

    /// Iterate over `(tensor, entries)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SeedEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of tensors in the spec.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the spec names no tensors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
