//! A single sampling walk along the ring.
//!
//! Starting at the node responsible for a key, the walk hops forward through
//! successor lists, skipping roughly `2 * sqrt(s)` nodes per hop where `s` is
//! the successor list length. Every hop is checked against the new node's
//! predecessor list, whose position of the previous node tells how many nodes
//! the hop skipped over.

use num_bigint::BigUint;
use tracing::{debug, warn};

use crate::common::{NodeSnapshot, Peer, RingKey, RingSpace};
use crate::rpc::{query_first, RemoteNode};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Counters collected by one completed walk.
pub struct WalkResult {
    /// Nodes confirmed or skipped over along the walk.
    pub visited: u64,
    pub relay_total: u64,
    pub uptime_total: u64,
    /// Forward distance from the start key to the last confirmed node.
    pub area: BigUint,
}

/// Mutable state of one walk, owned by the thread running it.
#[derive(Debug)]
struct WalkState {
    start: RingKey,
    candidates: Vec<String>,
    visited: u64,
    relay_total: u64,
    uptime_total: u64,
    last_confirmed: Option<RingKey>,
}

impl WalkState {
    fn new(start: RingKey, entry: String) -> Self {
        WalkState {
            start,
            candidates: vec![entry],
            visited: 0,
            relay_total: 0,
            uptime_total: 0,
            last_confirmed: None,
        }
    }

    /// Check the hop against the snapshot's predecessors and record it.
    ///
    /// Returns false if the previously confirmed node isn't among them.
    fn confirm(&mut self, space: &RingSpace, snapshot: &NodeSnapshot) -> bool {
        match &self.last_confirmed {
            None => self.visited = 1,
            Some(previous) => {
                let position = snapshot
                    .predecessors
                    .iter()
                    .position(|peer| space.reduce(&peer.id) == *previous);

                match position {
                    // `j` predecessors sit between the previous node and this one.
                    Some(j) => self.visited += j as u64 + 1,
                    None => return false,
                }
            }
        }

        self.last_confirmed = Some(space.reduce(&snapshot.id));
        self.relay_total = self
            .relay_total
            .saturating_add(snapshot.relay_message_count);
        self.uptime_total = self.uptime_total.saturating_add(snapshot.uptime);

        true
    }

    fn finish(self, space: &RingSpace) -> Result<WalkResult> {
        let last = self.last_confirmed.ok_or(Error::EmptyWalk)?;

        Ok(WalkResult {
            visited: self.visited,
            relay_total: self.relay_total,
            uptime_total: self.uptime_total,
            area: space.forward_distance(&self.start, &last),
        })
    }
}

/// Walk the ring from `start` for up to `hops + 1` node confirmations.
///
/// `entry` is any reachable node, used only to resolve `start` to the node
/// responsible for it. Network errors and inconsistent neighbour lists end
/// the walk early with whatever it has confirmed so far; it only fails if it
/// never confirmed a single node.
pub fn walk(
    node: &dyn RemoteNode,
    space: &RingSpace,
    start: &RingKey,
    entry: &str,
    hops: usize,
) -> Result<WalkResult> {
    let start = space.reduce(start);

    let successors = node.find_successors(&start, entry)?;
    let first = successors.first().ok_or(Error::NoSuccessors)?;

    let mut state = WalkState::new(start, node.rpc_address(first)?);

    for hop in 0..=hops {
        let snapshot = match query_first(node, &state.candidates) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(hop, %error, "Error getting chord ring info");
                break;
            }
        };

        if !state.confirm(space, &snapshot) {
            warn!(hop, id = %snapshot.id, "Previous node not found in predecessors");
            break;
        }

        debug!(
            hop,
            id = %snapshot.id,
            visited = state.visited,
            successors = snapshot.successors.len(),
            "Confirmed node"
        );

        if snapshot.successors.is_empty() {
            debug!(hop, "No successors to advance to");
            break;
        }

        state.candidates = next_candidates(node, &snapshot.successors);

        if state.candidates.is_empty() {
            debug!(hop, "No usable successor addresses");
            break;
        }
    }

    state.finish(space)
}

/// Successor list indices to try for the next hop.
///
/// Centered on `s - floor(2 * sqrt(s))`, with one index either side to
/// tolerate list drift between consecutive queries. Only indices inside
/// `[0, s)` are returned.
pub fn jump_indices(successors: usize) -> impl Iterator<Item = usize> {
    let s = successors as i64;
    let mid = s - (2.0 * (successors as f64).sqrt()).floor() as i64;

    ((mid - 1)..=(mid + 1))
        .filter(move |index| *index >= 0 && *index < s)
        .map(|index| index as usize)
}

fn next_candidates(node: &dyn RemoteNode, successors: &[Peer]) -> Vec<String> {
    jump_indices(successors.len())
        .filter_map(|index| {
            let peer = &successors[index];

            node.rpc_address(&peer.address)
                .map_err(|error| {
                    debug!(address = ?peer.address, %error, "Unusable successor address");
                })
                .ok()
        })
        .collect()
}
