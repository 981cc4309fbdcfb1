//! Named replication parameters.
//!
//! Each strategy kind reads its own names: the uniform strategy reads
//! `replication_factor`, topology-aware kinds read one factor per datacenter.

use crate::error::{ReplicationError, Result};
use crate::strategy::StrategyKind;
use std::collections::BTreeMap;
use std::fmt;

/// Parameter name holding the uniform strategy's factor.
pub const REPLICATION_FACTOR: &str = "replication_factor";

/// Replica count for one parameter, in Cassandra's `full[/transient]` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplicationFactor {
    all_replicas: usize,
    transient_replicas: usize,
}

impl ReplicationFactor {
    /// A factor with no transient replicas.
    pub fn new(all_replicas: usize) -> Self {
        Self {
            all_replicas,
            transient_replicas: 0,
        }
    }

    /// Parses `"3"` or `"3/1"`. Transient replicas may not outnumber all replicas.
    pub fn parse(value: &str) -> Option<Self> {
        let (all, transient) = match value.trim().split_once('/') {
            Some((all, transient)) => (all.trim().parse().ok()?, transient.trim().parse().ok()?),
            None => (value.trim().parse().ok()?, 0),
        };
        (transient <= all).then_some(Self {
            all_replicas: all,
            transient_replicas: transient,
        })
    }

    /// Total replica count, transient replicas included.
    pub fn all_replicas(&self) -> usize {
        self.all_replicas
    }

    pub fn transient_replicas(&self) -> usize {
        self.transient_replicas
    }

    pub fn full_replicas(&self) -> usize {
        self.all_replicas - self.transient_replicas
    }
}

impl fmt::Display for ReplicationFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transient_replicas == 0 {
            write!(f, "{}", self.all_replicas)
        } else {
            write!(f, "{}/{}", self.all_replicas, self.transient_replicas)
        }
    }
}

/// The named factors a strategy is computed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReplicationParameters {
    factors: BTreeMap<String, ReplicationFactor>,
}

impl ReplicationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the uniform strategy.
    pub fn simple(replication_factor: usize) -> Self {
        Self::new().with_factor(REPLICATION_FACTOR, replication_factor)
    }

    pub fn with_factor(mut self, name: impl Into<String>, replicas: usize) -> Self {
        self.insert(name, ReplicationFactor::new(replicas));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, factor: ReplicationFactor) {
        self.factors.insert(name.into(), factor);
    }

    /// Parses every option value as a factor.
    pub fn from_options<'a>(options: impl IntoIterator<Item = (&'a String, &'a String)>) -> Result<Self> {
        let mut params = Self::new();
        for (name, value) in options {
            let factor = ReplicationFactor::parse(value).ok_or_else(|| {
                ReplicationError::InvalidParameter {
                    name: name.clone(),
                    value: value.clone(),
                }
            })?;
            params.insert(name.clone(), factor);
        }
        Ok(params)
    }

    pub fn get(&self, name: &str) -> Option<ReplicationFactor> {
        self.factors.get(name).copied()
    }

    /// Looks up a parameter `strategy` cannot be computed without.
    pub fn require(&self, strategy: StrategyKind, name: &str) -> Result<ReplicationFactor> {
        self.get(name).ok_or_else(|| ReplicationError::MissingParameter {
            strategy,
            name: name.to_owned(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ReplicationFactor)> {
        self.factors.iter().map(|(name, factor)| (name.as_str(), *factor))
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
