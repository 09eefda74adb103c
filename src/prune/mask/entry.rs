//! Seed entries: the caller-facing encoding of a channel index.
//!
//! Plain tensors take bare indices (`3`). Weights of MatMul/Conv nodes take
//! role-prefixed indices: `i3` for input channel 3, `o3` for output channel 3.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which channel space of a weight an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelRole {
    Input,
    Output,
}

/// One channel index in a prune spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "EntryRepr", into = "EntryRepr")]
pub enum SeedEntry {
    /// Bare channel index for a non-weight tensor.
    Channel(usize),
    /// Role-prefixed channel index for a dot-product weight.
    Role(ChannelRole, usize),
}

impl SeedEntry {
    /// Input-side weight channel.
    pub fn input(idx: usize) -> Self {
        SeedEntry::Role(ChannelRole::Input, idx)
    }

    /// Output-side weight channel.
    pub fn output(idx: usize) -> Self {
        SeedEntry::Role(ChannelRole::Output, idx)
    }
}

/// Error parsing a [`SeedEntry`] from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeedEntryError(pub String);

impl fmt::Display for ParseSeedEntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid channel entry '{}': expected N, iN or oN", self.0)
    }
}

impl std::error::Error for ParseSeedEntryError {}

impl FromStr for SeedEntry {
    type Err = ParseSeedEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedEntryError(s.to_string());
        let (role, digits) = match s.as_bytes().first() {
            Some(b'i') => (Some(ChannelRole::Input), &s[1..]),
            Some(b'o') => (Some(ChannelRole::Output), &s[1..]),
            _ => (None, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let idx: usize = digits.parse().map_err(|_| err())?;
        Ok(match role {
            Some(role) => SeedEntry::Role(role, idx),
            None => SeedEntry::Channel(idx),
        })
    }
}

impl fmt::Display for SeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedEntry::Channel(idx) => write!(f, "{idx}"),
            SeedEntry::Role(ChannelRole::Input, idx) => write!(f, "i{idx}"),
            SeedEntry::Role(ChannelRole::Output, idx) => write!(f, "o{idx}"),
        }
    }
}

impl From<usize> for SeedEntry {
    fn from(idx: usize) -> Self {
        SeedEntry::Channel(idx)
    }
}

/// Wire form of a [`SeedEntry`]: a bare index or entry text.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum EntryRepr {
    Index(usize),
    Text(String),
}

impl TryFrom<EntryRepr> for SeedEntry {
    type Error = ParseSeedEntryError;

    fn try_from(repr: EntryRepr) -> Result<Self, Self::Error> {
        match repr {
            EntryRepr::Index(idx) => Ok(SeedEntry::Channel(idx)),
            EntryRepr::Text(text) => text.parse(),
        }
    }
}

impl From<SeedEntry> for EntryRepr {
    fn from(entry: SeedEntry) -> Self {
        match entry {
            SeedEntry::Channel(idx) => EntryRepr::Index(idx),
            role => EntryRepr::Text(role.to_string()),
        }
    }
}
