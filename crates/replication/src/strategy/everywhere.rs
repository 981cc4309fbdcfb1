//! Everywhere replication strategy.
//!
//! Every token-owning host holds a copy of every partition.

use crate::error::Result;
use crate::params::ReplicationParameters;
use crate::replica_map::TokenReplicaMap;
use crate::strategy::{same_strategy, ReplicationStrategy, StrategyKind};
use corelib::{DatacenterInfo, Host, Token};
use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Each token maps to all hosts with tokens. Takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EverywhereStrategy;

impl<T: Token> ReplicationStrategy<T> for EverywhereStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Everywhere
    }

    fn compute_token_to_replica_map(
        &self,
        _parameters: &ReplicationParameters,
        ring: &[T],
        _primary_replicas: &HashMap<T, Host>,
        hosts_with_tokens: &HashSet<Host>,
        _datacenters: &HashMap<String, DatacenterInfo>,
    ) -> Result<TokenReplicaMap<T>> {
        let all: BTreeSet<Host> = hosts_with_tokens.iter().cloned().collect();
        Ok(ring.iter().map(|token| (token.clone(), all.clone())).collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ReplicationStrategy<T>) -> bool {
        same_strategy(self, other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        StrategyKind::Everywhere.hash(&mut state);
    }
}
