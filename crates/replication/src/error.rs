//! Error types for replica computation.

use crate::strategy::StrategyKind;
use thiserror::Error;

/// Result type alias for replication operations.
pub type Result<T> = std::result::Result<T, ReplicationError>;

/// Errors surfaced to callers of replica computation.
///
/// All of these are configuration or input contract violations; the
/// computation itself has no runtime failure modes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplicationError {
    /// A strategy's required parameter was not supplied.
    #[error("{strategy} requires replication parameter '{name}'")]
    MissingParameter { strategy: StrategyKind, name: String },

    /// A parameter was supplied but is not a valid replication factor.
    #[error("invalid value {value:?} for replication parameter '{name}'")]
    InvalidParameter { name: String, value: String },

    /// The keyspace names a strategy class this crate cannot compute.
    #[error("unsupported replication strategy: {0}")]
    UnsupportedStrategy(String),

    /// The ownership map has no entry for a ring token.
    #[error("ring token {0} has no primary replica")]
    MissingPrimaryReplica(String),

    /// The replication config could not be read.
    #[error("invalid replication config: {0}")]
    Config(String),
}
