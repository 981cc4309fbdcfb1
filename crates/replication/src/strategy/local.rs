//! Local replication strategy.
//!
//! Used by node-local system keyspaces: every token is replicated only on
//! its primary owner.

use crate::error::Result;
use crate::params::ReplicationParameters;
use crate::replica_map::TokenReplicaMap;
use crate::strategy::{primary_replica, same_strategy, ReplicationStrategy, StrategyKind};
use corelib::{DatacenterInfo, Host, Token};
use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Each token maps to its primary owner alone. Takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LocalStrategy;

impl<T: Token> ReplicationStrategy<T> for LocalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Local
    }

    fn compute_token_to_replica_map(
        &self,
        _parameters: &ReplicationParameters,
        ring: &[T],
        primary_replicas: &HashMap<T, Host>,
        _hosts_with_tokens: &HashSet<Host>,
        _datacenters: &HashMap<String, DatacenterInfo>,
    ) -> Result<TokenReplicaMap<T>> {
        ring.iter()
            .map(|token| -> Result<(T, BTreeSet<Host>)> {
                let primary = primary_replica(primary_replicas, token)?;
                Ok((token.clone(), BTreeSet::from([primary.clone()])))
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ReplicationStrategy<T>) -> bool {
        same_strategy(self, other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        StrategyKind::Local.hash(&mut state);
    }
}
