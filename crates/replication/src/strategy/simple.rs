//! Simple replication strategy.
//!
//! Places replicas sequentially around the ring (clockwise from each token).
//! This is the uniform strategy and works well for:
//!
//! - Single data center deployments
//! - When network topology doesn't matter
//!
//! # Algorithm
//!
//! For the token at ring position `i`:
//!
//! 1. Clamp the factor: `rf = min(replication_factor, hosts_with_tokens)`
//! 2. Visit positions `i, i+1, ..., i+rf-1`, modulo the ring length
//! 3. Collect the primary owner of each visited position into a set
//!
//! A host owning several tokens inside the window is collected once, so a
//! replica set can be smaller than `rf` even when more hosts exist further
//! around the ring. Callers rely on this exact window, so it is not widened.
//!
//! # Performance
//!
//! - **Time**: O(n * rf * log rf) where n = ring tokens
//! - **Space**: O(n * rf)
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - May place replicas on hosts in the same failure domain

use crate::error::Result;
use crate::params::{ReplicationParameters, REPLICATION_FACTOR};
use crate::replica_map::TokenReplicaMap;
use crate::strategy::{primary_replica, same_strategy, ReplicationStrategy, StrategyKind};
use corelib::{DatacenterInfo, Host, Token};
use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Simple replication strategy: replicas placed sequentially around the ring.
///
/// Identity is the replication factor the strategy was created with; the
/// factor actually used by a computation is read from the parameters under
/// [`REPLICATION_FACTOR`].
///
/// # Example
///
/// ```rust
/// use corelib::token::Murmur3Token;
/// use corelib::{Host, HostId, TokenRing};
/// use replication::{ReplicationParameters, ReplicationStrategy, SimpleStrategy};
///
/// let a = Host::new(HostId(1), "10.0.0.1:9042".parse().unwrap());
/// let b = Host::new(HostId(2), "10.0.0.2:9042".parse().unwrap());
/// let ring = TokenRing::builder()
///     .add_host(a, [Murmur3Token(0)])
///     .add_host(b, [Murmur3Token(100)])
///     .build();
///
/// let strategy = SimpleStrategy::new(2);
/// let map = strategy
///     .compute_for_ring(&ring, &ReplicationParameters::simple(2))
///     .unwrap();
/// assert_eq!(map.get(&Murmur3Token(0)).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// # Arguments
    /// * `replication_factor` - Number of replicas (typically 1-5)
    ///   - 1: No replication (single copy)
    ///   - 3: Standard (primary + 2 replicas)
    pub fn new(replication_factor: usize) -> Self {
        Self { replication_factor }
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }
}

impl<T: Token> ReplicationStrategy<T> for SimpleStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Simple
    }

    fn compute_token_to_replica_map(
        &self,
        parameters: &ReplicationParameters,
        ring: &[T],
        primary_replicas: &HashMap<T, Host>,
        hosts_with_tokens: &HashSet<Host>,
        _datacenters: &HashMap<String, DatacenterInfo>,
    ) -> Result<TokenReplicaMap<T>> {
        let factor = parameters.require(StrategyKind::Simple, REPLICATION_FACTOR)?;
        compute_token_to_replica_simple(
            factor.all_replicas(),
            hosts_with_tokens.len(),
            ring,
            primary_replicas,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ReplicationStrategy<T>) -> bool {
        same_strategy(self, other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        StrategyKind::Simple.hash(&mut state);
        self.hash(&mut state);
    }
}

/// Converts token-primary to token-replicas.
fn compute_token_to_replica_simple<T: Token>(
    replication_factor: usize,
    hosts_with_tokens: usize,
    ring: &[T],
    primary_replicas: &HashMap<T, Host>,
) -> Result<TokenReplicaMap<T>> {
    let rf = replication_factor.min(hosts_with_tokens);
    let mut token_to_replicas = Vec::with_capacity(ring.len());

    for (i, token) in ring.iter().enumerate() {
        let mut replicas = BTreeSet::new();
        for j in 0..rf {
            // circle back if necessary
            let next = &ring[(i + j) % ring.len()];
            replicas.insert(primary_replica(primary_replicas, next)?.clone());
        }
        token_to_replicas.push((token.clone(), replicas));
    }

    debug!(
        replication_factor,
        effective = rf,
        tokens = ring.len(),
        hosts = hosts_with_tokens,
        "computed SimpleStrategy replicas"
    );
    Ok(token_to_replicas.into_iter().collect())
}
