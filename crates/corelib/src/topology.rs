//! Per-datacenter view of the ring.
//!
//! Topology-aware strategies need to know how many token-owning hosts and
//! which racks each datacenter has. The uniform strategy ignores it, but the
//! shared strategy contract always receives it.

use std::collections::BTreeSet;
use std::sync::Arc;

/// Hosts and racks known for one datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatacenterInfo {
    host_count: usize,
    racks: BTreeSet<Arc<str>>,
}

impl DatacenterInfo {
    /// Records one token-owning host of this datacenter.
    pub fn add_host(&mut self, rack: Option<&Arc<str>>) {
        self.host_count += 1;
        if let Some(rack) = rack {
            self.racks.insert(Arc::clone(rack));
        }
    }

    pub fn host_count(&self) -> usize {
        self.host_count
    }

    pub fn racks(&self) -> impl Iterator<Item = &str> {
        self.racks.iter().map(|r| r.as_ref())
    }

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }
}
