//! Replication strategy abstractions.
//!
//! A strategy turns the ring's primary owners into per-token replica sets.
//! Callers hold strategies as `dyn ReplicationStrategy<T>` and never branch
//! on the kind:
//!
//! - **SimpleStrategy**: replicas taken clockwise around the ring
//! - **LocalStrategy**: the primary owner only
//! - **EverywhereStrategy**: every token-owning host
//!
//! Two strategies compare equal iff they are the same kind with the same
//! parameters, so a topology refresh can tell that a keyspace's strategy is
//! unchanged without comparing replica maps.

pub mod everywhere;
pub mod local;
pub mod simple;

pub use everywhere::EverywhereStrategy;
pub use local::LocalStrategy;
pub use simple::SimpleStrategy;

use crate::error::{ReplicationError, Result};
use crate::params::ReplicationParameters;
use crate::replica_map::TokenReplicaMap;
use corelib::{DatacenterInfo, Host, Token, TokenRing};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

const LOCATOR_PACKAGE: &str = "org.apache.cassandra.locator.";

/// Strategy kinds this crate can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Simple,
    Local,
    Everywhere,
}

impl StrategyKind {
    /// Short class name as it appears in keyspace metadata.
    pub fn class_name(&self) -> &'static str {
        match self {
            StrategyKind::Simple => "SimpleStrategy",
            StrategyKind::Local => "LocalStrategy",
            StrategyKind::Everywhere => "EverywhereStrategy",
        }
    }

    /// Resolves a short or fully-qualified class name.
    pub fn from_class(class: &str) -> Option<Self> {
        let short = class.strip_prefix(LOCATOR_PACKAGE).unwrap_or(class);
        [StrategyKind::Simple, StrategyKind::Local, StrategyKind::Everywhere]
            .into_iter()
            .find(|kind| kind.class_name() == short)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Trait for replication strategies.
///
/// `compute_token_to_replica_map` is a pure function of its inputs: no
/// randomness, no shared state, safe to call concurrently.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy<T: Token>: fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> StrategyKind;

    /// Compute the replica set of every ring token.
    ///
    /// # Arguments
    /// * `parameters` - Named factors; a required name missing is an error
    /// * `ring` - Ring tokens in ascending order
    /// * `primary_replicas` - Primary owner of each ring token
    /// * `hosts_with_tokens` - Hosts owning at least one token
    /// * `datacenters` - Per-datacenter host counts and racks
    fn compute_token_to_replica_map(
        &self,
        parameters: &ReplicationParameters,
        ring: &[T],
        primary_replicas: &HashMap<T, Host>,
        hosts_with_tokens: &HashSet<Host>,
        datacenters: &HashMap<String, DatacenterInfo>,
    ) -> Result<TokenReplicaMap<T>>;

    /// Compute from a ring snapshot.
    fn compute_for_ring(
        &self,
        ring: &TokenRing<T>,
        parameters: &ReplicationParameters,
    ) -> Result<TokenReplicaMap<T>> {
        self.compute_token_to_replica_map(
            parameters,
            ring.tokens(),
            ring.primary_replicas(),
            ring.hosts_with_tokens(),
            ring.datacenters(),
        )
    }

    fn as_any(&self) -> &dyn Any;

    /// Same kind and same parameters.
    fn dyn_eq(&self, other: &dyn ReplicationStrategy<T>) -> bool;

    /// Hashes kind and parameters, consistent with `dyn_eq`.
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Token> PartialEq for dyn ReplicationStrategy<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

impl<T: Token> Eq for dyn ReplicationStrategy<T> {}

impl<T: Token> Hash for dyn ReplicationStrategy<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

/// `dyn_eq` for concrete strategies: equal iff `other` is an `S` equal to `this`.
pub(crate) fn same_strategy<T: Token, S: PartialEq + 'static>(
    this: &S,
    other: &dyn ReplicationStrategy<T>,
) -> bool {
    other
        .as_any()
        .downcast_ref::<S>()
        .map_or(false, |other| this == other)
}

pub(crate) fn primary_replica<'a, T: Token>(
    primary_replicas: &'a HashMap<T, Host>,
    token: &T,
) -> Result<&'a Host> {
    primary_replicas
        .get(token)
        .ok_or_else(|| ReplicationError::MissingPrimaryReplica(token.to_string()))
}
