//! Token ring data structure and its builder.

use crate::error::{Error, Result};
use crate::node::Host;
use crate::token::Token;
use crate::topology::DatacenterInfo;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Immutable snapshot of the ring as reported by topology discovery.
///
/// # Invariants
///
/// - `tokens` is sorted ascending and has no duplicates
/// - every token has exactly one entry in `primary_replicas`
/// - `hosts_with_tokens` holds exactly the hosts appearing as a primary owner
#[derive(Debug, Clone)]
pub struct TokenRing<T: Token> {
    tokens: Vec<T>,
    primary_replicas: HashMap<T, Host>,
    hosts_with_tokens: HashSet<Host>,
    datacenters: HashMap<String, DatacenterInfo>,
}

impl<T: Token> TokenRing<T> {
    /// Start building a ring.
    pub fn builder() -> RingBuilder<T> {
        RingBuilder::new()
    }

    /// An empty ring.
    pub fn empty() -> Self {
        RingBuilder::new().build()
    }

    /// Ring tokens in ascending order.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn primary_replicas(&self) -> &HashMap<T, Host> {
        &self.primary_replicas
    }

    /// The host directly responsible for `token`, if it is a ring token.
    pub fn primary_replica(&self, token: &T) -> Option<&Host> {
        self.primary_replicas.get(token)
    }

    pub fn hosts_with_tokens(&self) -> &HashSet<Host> {
        &self.hosts_with_tokens
    }

    pub fn datacenters(&self) -> &HashMap<String, DatacenterInfo> {
        &self.datacenters
    }

    /// Number of tokens on the ring.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The ring token owning `token`: the first ring token greater than or
    /// equal to it, wrapping around to the smallest.
    pub fn owning_token(&self, token: &T) -> Option<&T> {
        let idx = self.tokens.partition_point(|t| t < token);
        self.tokens.get(idx).or_else(|| self.tokens.first())
    }
}

/// Builder assembling a ring from per-host token lists.
#[derive(Debug)]
pub struct RingBuilder<T: Token> {
    owners: BTreeMap<T, Host>,
}

impl<T: Token> Default for RingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Token> RingBuilder<T> {
    pub fn new() -> Self {
        Self {
            owners: BTreeMap::new(),
        }
    }

    /// Register `host` as the primary owner of `tokens`.
    ///
    /// A token already claimed by another host is reassigned to `host`.
    pub fn add_host(mut self, host: Host, tokens: impl IntoIterator<Item = T>) -> Self {
        for token in tokens {
            if let Some(previous) = self.owners.insert(token.clone(), host.clone()) {
                if previous != host {
                    warn!(
                        %token,
                        previous = %previous.id,
                        owner = %host.id,
                        "token claimed by more than one host, keeping the latest"
                    );
                }
            }
        }
        self
    }

    /// Register `host` with tokens in the textual form the cluster reports.
    pub fn add_host_token_strings<S: AsRef<str>>(self, host: Host, tokens: &[S]) -> Result<Self> {
        let parsed = tokens
            .iter()
            .map(|s| T::parse(s.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| Error::InvalidToken {
                host: host.id,
                source,
            })?;
        Ok(self.add_host(host, parsed))
    }

    /// Freeze the ring.
    pub fn build(self) -> TokenRing<T> {
        let mut tokens = Vec::with_capacity(self.owners.len());
        let mut primary_replicas = HashMap::with_capacity(self.owners.len());
        let mut hosts_with_tokens = HashSet::new();

        for (token, host) in self.owners {
            tokens.push(token.clone());
            hosts_with_tokens.insert(host.clone());
            primary_replicas.insert(token, host);
        }

        let mut datacenters: HashMap<String, DatacenterInfo> = HashMap::new();
        for host in &hosts_with_tokens {
            if let Some(dc) = &host.datacenter {
                datacenters
                    .entry(dc.to_string())
                    .or_default()
                    .add_host(host.rack.as_ref());
            }
        }

        debug!(
            partitioner = T::PARTITIONER,
            tokens = tokens.len(),
            hosts = hosts_with_tokens.len(),
            datacenters = datacenters.len(),
            "built token ring"
        );

        TokenRing {
            tokens,
            primary_replicas,
            hosts_with_tokens,
            datacenters,
        }
    }
}
