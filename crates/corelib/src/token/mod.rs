//! Token abstraction module.
//!
//! Tokens represent positions on the ring and must be comparable,
//! hashable, and thread-safe. One token kind exists per partitioner a
//! cluster can be configured with.

pub mod byte_ordered;
pub mod murmur3;
pub mod random;
pub mod traits;

pub use byte_ordered::ByteOrderedToken;
pub use murmur3::Murmur3Token;
pub use random::RandomToken;
pub use traits::{Token, TokenError};
