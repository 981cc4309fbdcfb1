//! Replication strategies for token-aware routing.
//!
//! This crate turns a token ring into per-token replica sets:
//! - How many replicas each partition has (replication parameters)
//! - Which hosts hold them (pluggable strategies)
//! - Which keyspaces share a computation (per-keyspace token map)

pub mod config;
pub mod error;
pub mod params;
pub mod replica_map;
pub mod strategy;
pub mod token_map;

pub use config::ReplicationConfig;
pub use error::{ReplicationError, Result};
pub use params::{ReplicationFactor, ReplicationParameters, REPLICATION_FACTOR};
pub use replica_map::TokenReplicaMap;
pub use strategy::{
    EverywhereStrategy, LocalStrategy, ReplicationStrategy, SimpleStrategy, StrategyKind,
};
pub use token_map::{KeyspaceReplication, KeyspaceTokenMap};
