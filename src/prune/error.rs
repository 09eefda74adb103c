//! Channel pruning errors
//!
//! Every variant names the offending node(s) or tensor so a failed pass can
//! be traced back to the graph element that caused it.

use thiserror::Error;

/// Result type for channel pruning operations
pub type Result<T> = std::result::Result<T, PruneError>;

/// Broad class of a [`PruneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input detected before the graph is mutated.
    Validation,
    /// Unsupported or incomplete node configuration.
    Configuration,
    /// A deletion index or axis outside the tensor extent.
    Range,
    /// Opaque operator rejected in strict mode.
    UnsupportedOperator,
}

/// Channel pruning errors
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("Invalid seed entry '{entry}' for tensor '{tensor}': expected N, iN or oN")]
    InvalidSeedEntry { tensor: String, entry: String },

    #[error("Invalid prune spec: {message}")]
    SpecParse { message: String },

    #[error(
        "Weight mask for '{tensor}' (weight of {op} node '{node}') must use iN/oN channel entries"
    )]
    WeightMaskNotRoleTagged {
        tensor: String,
        node: String,
        op: String,
    },

    #[error(
        "Mask for '{tensor}' (read by {consumer}) uses iN/oN entries but the tensor is not a MatMul/Conv weight"
    )]
    RoleTaggedPlainMask { tensor: String, consumer: String },

    #[error("Tensor '{tensor}' carries a {found} mask where node '{node}' expects a {expected} mask")]
    MaskRoleMismatch {
        tensor: String,
        node: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Please extract bias from Conv nodes: {nodes:?}")]
    FusedConvBias { nodes: Vec<String> },

    #[error("Please ensure MatMul and Conv nodes have static weights: {nodes:?}")]
    DynamicWeights { nodes: Vec<String> },

    #[error("Node '{node}' ({op}) is malformed: {reason}")]
    MalformedNode {
        node: String,
        op: String,
        reason: String,
    },

    #[error("Node '{node}' is missing required attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    #[error(
        "Unknown grouped conv setting on node '{node}': group={group}, weight input width={input_width}"
    )]
    UnsupportedGrouping {
        node: String,
        group: i64,
        input_width: usize,
    },

    #[error(
        "Channel {index} out of range for tensor '{tensor}' of node '{node}' (axis {axis} has extent {extent})"
    )]
    ChannelOutOfRange {
        tensor: String,
        node: String,
        index: usize,
        axis: usize,
        extent: usize,
    },

    #[error("Axis {axis} out of range for tensor '{tensor}' of node '{node}' (rank {rank})")]
    AxisOutOfRange {
        tensor: String,
        node: String,
        axis: usize,
        rank: usize,
    },

    #[error("Can't propagate sparsity mask through op_type {op} (node '{node}')")]
    UnsupportedOperator { node: String, op: String },
}

impl PruneError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSeedEntry { .. }
            | Self::SpecParse { .. }
            | Self::WeightMaskNotRoleTagged { .. }
            | Self::RoleTaggedPlainMask { .. }
            | Self::MaskRoleMismatch { .. }
            | Self::FusedConvBias { .. }
            | Self::DynamicWeights { .. }
            | Self::MalformedNode { .. } => ErrorKind::Validation,
            Self::MissingAttribute { .. } | Self::UnsupportedGrouping { .. } => {
                ErrorKind::Configuration
            }
            Self::ChannelOutOfRange { .. } | Self::AxisOutOfRange { .. } => ErrorKind::Range,
            Self::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
        }
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSeedEntry { .. } => "P001",
            Self::SpecParse { .. } => "P005",
            Self::WeightMaskNotRoleTagged { .. } => "P002",
            Self::RoleTaggedPlainMask { .. } => "P003",
            Self::MaskRoleMismatch { .. } => "P004",
            Self::FusedConvBias { .. } => "P010",
            Self::DynamicWeights { .. } => "P011",
            Self::MalformedNode { .. } => "P012",
            Self::MissingAttribute { .. } => "P020",
            Self::UnsupportedGrouping { .. } => "P021",
            Self::ChannelOutOfRange { .. } => "P030",
            Self::AxisOutOfRange { .. } => "P031",
            Self::UnsupportedOperator { .. } => "P040",
        }
    }
}
