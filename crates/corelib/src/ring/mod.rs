//! Token ring: the ownership input for replica computation.
//!
//! The ring is supplied by topology discovery. It holds the sorted,
//! deduplicated tokens of the cluster and the single primary owner of each.

pub mod ring;

pub use ring::{RingBuilder, TokenRing};
