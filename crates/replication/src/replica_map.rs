//! Token → replica set snapshot.

use corelib::{Host, Token};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Immutable mapping from each ring token to the hosts replicating it.
///
/// Produced in one piece by a strategy and handed to routing as a snapshot;
/// there are no mutating methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReplicaMap<T: Token> {
    replicas: BTreeMap<T, BTreeSet<Host>>,
}

impl<T: Token> TokenReplicaMap<T> {
    pub fn empty() -> Self {
        Self {
            replicas: BTreeMap::new(),
        }
    }

    /// Replicas of a ring token. `None` if `token` is not on the ring.
    pub fn get(&self, token: &T) -> Option<&BTreeSet<Host>> {
        self.replicas.get(token)
    }

    /// Replicas for an arbitrary token: the set of the first ring token at or
    /// after it, wrapping around past the last ring token.
    pub fn replicas_for_token(&self, token: &T) -> Option<&BTreeSet<Host>> {
        self.replicas
            .range(token..)
            .next()
            .or_else(|| self.replicas.iter().next())
            .map(|(_, hosts)| hosts)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &T> {
        self.replicas.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, T, BTreeSet<Host>> {
        self.replicas.iter()
    }

    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }
}

impl<T: Token> FromIterator<(T, BTreeSet<Host>)> for TokenReplicaMap<T> {
    fn from_iter<I: IntoIterator<Item = (T, BTreeSet<Host>)>>(iter: I) -> Self {
        Self {
            replicas: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: Token> IntoIterator for &'a TokenReplicaMap<T> {
    type Item = (&'a T, &'a BTreeSet<Host>);
    type IntoIter = btree_map::Iter<'a, T, BTreeSet<Host>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
