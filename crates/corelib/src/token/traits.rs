//! Core token trait definitions.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;

/// Errors that can occur when parsing tokens reported by the cluster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The textual form could not be turned into a token of this kind.
    #[error("invalid {kind} token {input:?}: {reason}")]
    Invalid {
        kind: &'static str,
        input: String,
        reason: String,
    },
}

impl TokenError {
    pub(crate) fn invalid(kind: &'static str, input: &str, reason: impl Display) -> Self {
        TokenError::Invalid {
            kind,
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Minimal token trait for the ring.
///
/// Tokens are immutable, totally ordered positions. Implementations must be
/// thread-safe and cheap to compare/hash. The ring treats the ascending order
/// of tokens as circular: the successor of the greatest token is the smallest.
pub trait Token: Clone + Ord + Hash + Send + Sync + Debug + Display + 'static {
    /// Fully-qualified class name of the partitioner producing this token kind.
    const PARTITIONER: &'static str;

    /// Parses the textual form reported by topology discovery.
    fn parse(s: &str) -> Result<Self, TokenError>;
}
