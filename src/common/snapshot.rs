//! What a single remote node reports about itself and its ring neighbours.
use crate::common::RingKey;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A neighbour entry from a node's successor or predecessor list.
pub struct Peer {
    /// Network address as advertised by the node, e.g. `tcp://1.2.3.4:30001`.
    pub address: String,
    pub id: RingKey,
}

impl Peer {
    pub fn new(address: impl Into<String>, id: RingKey) -> Peer {
        Peer {
            address: address.into(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of querying one node, discarded after the walk step that used it.
pub struct NodeSnapshot {
    pub id: RingKey,
    /// Messages this node relayed since it started.
    pub relay_message_count: u64,
    /// Seconds since this node started.
    pub uptime: u64,
    /// Ordered from the closest successor outwards.
    pub successors: Vec<Peer>,
    /// Ordered from the closest predecessor outwards.
    pub predecessors: Vec<Peer>,
}
