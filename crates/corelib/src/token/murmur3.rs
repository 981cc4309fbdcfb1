//! Murmur3 token implementation (Cassandra default partitioner).

use crate::token::traits::{Token, TokenError};
use std::fmt;

/// Murmur3 token: a signed 64-bit position.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Murmur3Token(pub i64);

impl Token for Murmur3Token {
    const PARTITIONER: &'static str = "org.apache.cassandra.dht.Murmur3Partitioner";

    fn parse(s: &str) -> Result<Self, TokenError> {
        s.trim()
            .parse::<i64>()
            .map(Murmur3Token)
            .map_err(|e| TokenError::invalid("murmur3", s, e))
    }
}

impl fmt::Display for Murmur3Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
