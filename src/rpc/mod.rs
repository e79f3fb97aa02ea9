//! Remote node queries.
//!
//! The walker only depends on the [RemoteNode] trait, [HttpRpc] is the
//! json-rpc over http implementation used against a live network.

mod config;
mod http;
pub mod messages;

use std::fmt::Debug;

use tracing::trace;

use crate::common::{NodeSnapshot, RingKey};
use crate::{Error, Result};

pub use config::*;
pub use http::HttpRpc;

/// A way to ask ring nodes about themselves.
///
/// Calls are blocking and may be slow; timeouts and connection reuse are up to
/// the implementation, callers do not retry.
pub trait RemoteNode: Debug + Send + Sync {
    /// Ask the node at `address` which nodes are closest to `key`.
    ///
    /// Returns advertised peer addresses, see [RemoteNode::rpc_address].
    fn find_successors(&self, key: &RingKey, address: &str) -> Result<Vec<String>>;

    /// Fetch the node's identity, counters and neighbour lists.
    fn chord_ring_info(&self, address: &str) -> Result<NodeSnapshot>;

    /// Turn an address advertised in a successor list into one
    /// [RemoteNode::chord_ring_info] accepts.
    fn rpc_address(&self, peer_address: &str) -> Result<String>;
}

/// Query `candidates` in order, returning the first snapshot obtained.
///
/// Fails with [Error::AllCandidatesFailed] listing every attempt if none answers.
pub fn query_first(node: &dyn RemoteNode, candidates: &[String]) -> Result<NodeSnapshot> {
    let mut attempts = Vec::with_capacity(candidates.len());

    for address in candidates {
        match node.chord_ring_info(address) {
            Ok(snapshot) => return Ok(snapshot),
            Err(error) => {
                trace!(?address, ?error, "Candidate failed");
                attempts.push(format!("{}: {}", address, error));
            }
        }
    }

    Err(Error::AllCandidatesFailed(attempts))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct Flaky {
        answering: Vec<String>,
        asked: Mutex<Vec<String>>,
    }

    impl RemoteNode for Flaky {
        fn find_successors(&self, _key: &RingKey, _address: &str) -> Result<Vec<String>> {
            Ok(vec![])
        }

        fn chord_ring_info(&self, address: &str) -> Result<NodeSnapshot> {
            self.asked.lock().unwrap().push(address.to_string());

            if self.answering.iter().any(|a| a == address) {
                Ok(NodeSnapshot {
                    id: RingKey::from_hex(address)?,
                    relay_message_count: 0,
                    uptime: 0,
                    successors: vec![],
                    predecessors: vec![],
                })
            } else {
                Err(Error::Remote(format!("{} is down", address)))
            }
        }

        fn rpc_address(&self, peer_address: &str) -> Result<String> {
            Ok(peer_address.to_string())
        }
    }

    fn addresses(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_success_wins() {
        let node = Flaky {
            answering: addresses(&["b", "c"]),
            ..Default::default()
        };

        let snapshot = query_first(&node, &addresses(&["a", "b", "c"])).unwrap();

        assert_eq!(snapshot.id, RingKey::from(0xb));
        assert_eq!(*node.asked.lock().unwrap(), addresses(&["a", "b"]));
    }

    #[test]
    fn all_failed() {
        let node = Flaky::default();

        match query_first(&node, &addresses(&["a", "b", "c"])) {
            Err(Error::AllCandidatesFailed(attempts)) => {
                assert_eq!(attempts.len(), 3);
                assert!(attempts[1].starts_with("b: "));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            query_first(&node, &[]),
            Err(Error::AllCandidatesFailed(attempts)) if attempts.is_empty()
        ));
    }
}
