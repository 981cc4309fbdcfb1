//! Core library for token-aware routing.
//!
//! This crate provides the inputs replica computation works from:
//! - Token types for each partitioner
//! - Host identity
//! - The token ring with its primary-owner map
//! - Per-datacenter topology info

pub mod error;
pub mod node;
pub mod ring;
pub mod token;
pub mod topology;

pub use error::{Error, Result};
pub use node::{Host, HostId};
pub use ring::{RingBuilder, TokenRing};
pub use token::Token;
pub use topology::DatacenterInfo;
