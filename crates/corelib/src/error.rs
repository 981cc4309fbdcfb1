//! Error types for the core library.

use crate::token::TokenError;
use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A token reported for a host could not be parsed.
    #[error("invalid token for host {host}: {source}")]
    InvalidToken {
        host: crate::node::HostId,
        #[source]
        source: TokenError,
    },
}
