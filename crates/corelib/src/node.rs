//! Host abstractions for the token ring.
//!
//! Hosts represent cluster nodes. They are identified by a compact `HostId`
//! that is cheap to compare and hash; address and placement labels are
//! carried along but never take part in identity.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;

/// Compact identifier for a host in the cluster.
///
/// Newtype over `u128` so the cluster's `host_id` UUID compares and hashes
/// as a single integer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HostId(pub u128);

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A cluster node as seen by the routing layer.
///
/// Keep this struct small and cheap to clone; connection pools, health and
/// other transient state live elsewhere. Two `Host` values are equal iff
/// their ids are equal.
#[derive(Clone, Debug)]
pub struct Host {
    pub id: HostId,
    /// Native-protocol address.
    pub address: SocketAddr,
    /// Data center label for topology-aware replication.
    pub datacenter: Option<Arc<str>>,
    /// Rack label for rack-aware replication.
    pub rack: Option<Arc<str>>,
}

impl Host {
    /// Construct a host without placement labels.
    pub fn new(id: HostId, address: SocketAddr) -> Self {
        Self {
            id,
            address,
            datacenter: None,
            rack: None,
        }
    }

    pub fn with_topology(
        id: HostId,
        address: SocketAddr,
        datacenter: impl Into<Arc<str>>,
        rack: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id,
            address,
            datacenter: Some(datacenter.into()),
            rack: Some(rack.into()),
        }
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Host {}

impl Hash for Host {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Host {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Host {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.id)
    }
}
