//! Keyspace replication configuration.
//!
//! Keyspace metadata carries replication as a flat string map, e.g.
//! `{"class": "org.apache.cassandra.locator.SimpleStrategy", "replication_factor": "3"}`.
//! This module reads that map and builds the matching strategy.

use crate::error::{ReplicationError, Result};
use crate::params::{ReplicationParameters, REPLICATION_FACTOR};
use crate::strategy::{
    EverywhereStrategy, LocalStrategy, ReplicationStrategy, SimpleStrategy, StrategyKind,
};
use corelib::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A keyspace's `replication` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationConfig {
    /// Strategy class, short or fully qualified.
    pub class: String,
    /// Every other entry: named factors.
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl ReplicationConfig {
    /// `SimpleStrategy` with the given factor.
    pub fn simple(replication_factor: usize) -> Self {
        Self {
            class: StrategyKind::Simple.class_name().to_owned(),
            options: BTreeMap::from([(
                REPLICATION_FACTOR.to_owned(),
                replication_factor.to_string(),
            )]),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReplicationError::Config(e.to_string()))
    }

    /// Splits `class` out of a raw replication map.
    pub fn from_options(mut options: BTreeMap<String, String>) -> Result<Self> {
        let class = options
            .remove("class")
            .ok_or_else(|| ReplicationError::Config("missing 'class' entry".to_owned()))?;
        Ok(Self { class, options })
    }

    pub fn kind(&self) -> Result<StrategyKind> {
        StrategyKind::from_class(&self.class)
            .ok_or_else(|| ReplicationError::UnsupportedStrategy(self.class.clone()))
    }

    pub fn parameters(&self) -> Result<ReplicationParameters> {
        ReplicationParameters::from_options(&self.options)
    }

    /// Builds the strategy together with the parameters to compute it with.
    pub fn strategy<T: Token>(
        &self,
    ) -> Result<(Arc<dyn ReplicationStrategy<T>>, ReplicationParameters)> {
        let kind = self.kind()?;
        let parameters = self.parameters()?;
        let strategy: Arc<dyn ReplicationStrategy<T>> = match kind {
            StrategyKind::Simple => {
                let factor = parameters.require(kind, REPLICATION_FACTOR)?;
                Arc::new(SimpleStrategy::new(factor.all_replicas()))
            }
            StrategyKind::Local => Arc::new(LocalStrategy),
            StrategyKind::Everywhere => Arc::new(EverywhereStrategy),
        };
        Ok((strategy, parameters))
    }
}
