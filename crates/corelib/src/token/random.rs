//! Random partitioner token implementation.

use crate::token::traits::{Token, TokenError};
use std::fmt;

/// Largest value the random partitioner can produce (2^127).
const MAX_RANDOM_TOKEN: u128 = 1 << 127;

/// Random token: an MD5-derived position in `0..=2^127`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RandomToken(pub u128);

impl Token for RandomToken {
    const PARTITIONER: &'static str = "org.apache.cassandra.dht.RandomPartitioner";

    fn parse(s: &str) -> Result<Self, TokenError> {
        let value = s
            .trim()
            .parse::<u128>()
            .map_err(|e| TokenError::invalid("random", s, e))?;
        if value > MAX_RANDOM_TOKEN {
            return Err(TokenError::invalid("random", s, "exceeds 2^127"));
        }
        Ok(RandomToken(value))
    }
}

impl fmt::Display for RandomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
