//! Per-keyspace replica maps over one ring snapshot.
//!
//! Keyspaces with equal strategies and equal parameters share one computed
//! map.

use crate::config::ReplicationConfig;
use crate::error::Result;
use crate::params::ReplicationParameters;
use crate::replica_map::TokenReplicaMap;
use crate::strategy::ReplicationStrategy;
use corelib::{Host, Token, TokenRing};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// A computation is reusable only for the same strategy and the same parameters.
type ComputationKey<T> = (Arc<dyn ReplicationStrategy<T>>, ReplicationParameters);

/// A keyspace's name with the strategy it replicates under.
#[derive(Debug, Clone)]
pub struct KeyspaceReplication<T: Token> {
    pub name: String,
    pub strategy: Arc<dyn ReplicationStrategy<T>>,
    pub parameters: ReplicationParameters,
}

impl<T: Token> KeyspaceReplication<T> {
    pub fn new(
        name: impl Into<String>,
        strategy: Arc<dyn ReplicationStrategy<T>>,
        parameters: ReplicationParameters,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            parameters,
        }
    }

    pub fn from_config(name: impl Into<String>, config: &ReplicationConfig) -> Result<Self> {
        let (strategy, parameters) = config.strategy()?;
        Ok(Self::new(name, strategy, parameters))
    }
}

/// Replica maps for every keyspace, computed from one ring snapshot.
#[derive(Debug, Clone)]
pub struct KeyspaceTokenMap<T: Token> {
    keyspaces: HashMap<String, Arc<TokenReplicaMap<T>>>,
}

impl<T: Token> KeyspaceTokenMap<T> {
    /// Compute each distinct strategy and parameter pair once and share the
    /// result between keyspaces using it.
    pub fn build(
        ring: &TokenRing<T>,
        keyspaces: impl IntoIterator<Item = KeyspaceReplication<T>>,
    ) -> Result<Self> {
        let mut computed: HashMap<ComputationKey<T>, Arc<TokenReplicaMap<T>>> = HashMap::new();
        let mut by_keyspace = HashMap::new();
        let mut reused = 0usize;

        for keyspace in keyspaces {
            let key = (Arc::clone(&keyspace.strategy), keyspace.parameters);
            let map = match computed.get(&key) {
                Some(map) => {
                    reused += 1;
                    Arc::clone(map)
                }
                None => {
                    let map = Arc::new(key.0.compute_for_ring(ring, &key.1)?);
                    computed.insert(key, Arc::clone(&map));
                    map
                }
            };
            by_keyspace.insert(keyspace.name, map);
        }

        debug!(
            keyspaces = by_keyspace.len(),
            computed = computed.len(),
            reused,
            "built keyspace token map"
        );
        Ok(Self {
            keyspaces: by_keyspace,
        })
    }

    /// Replicas of the partition `token` falls in, for `keyspace`.
    pub fn replicas(&self, keyspace: &str, token: &T) -> Option<&BTreeSet<Host>> {
        self.keyspaces.get(keyspace)?.replicas_for_token(token)
    }

    pub fn keyspace_map(&self, keyspace: &str) -> Option<&Arc<TokenReplicaMap<T>>> {
        self.keyspaces.get(keyspace)
    }

    pub fn keyspaces(&self) -> impl Iterator<Item = &str> {
        self.keyspaces.keys().map(String::as_str)
    }
}
