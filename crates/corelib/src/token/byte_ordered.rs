//! Byte-ordered token implementation.

use crate::token::traits::{Token, TokenError};
use std::fmt;

/// Byte-ordered token using its raw key bytes; compares lexicographically.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ByteOrderedToken(pub Vec<u8>);

impl Token for ByteOrderedToken {
    const PARTITIONER: &'static str = "org.apache.cassandra.dht.ByteOrderedPartitioner";

    /// Parses the hex form (with or without a `0x` prefix).
    fn parse(s: &str) -> Result<Self, TokenError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        hex::decode(digits)
            .map(ByteOrderedToken)
            .map_err(|e| TokenError::invalid("byte-ordered", s, e))
    }
}

impl ByteOrderedToken {
    /// Creates a token directly from bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ByteOrderedToken(bytes.into())
    }
}

impl fmt::Display for ByteOrderedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}
