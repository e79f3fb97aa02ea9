//! Json-rpc request and response bodies.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::common::{NodeSnapshot, Peer, RingKey};
use crate::{Error, Result};

pub const FIND_SUCCESSOR_ADDRS: &str = "findsuccessoraddrs";
pub const GET_CHORD_RING_INFO: &str = "getchordringinfo";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Serialize)]
pub struct FindSuccessorAddrsParams {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct NoParams {}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<serde_json::Value>,
}

impl<T> RpcResponse<T> {
    pub fn into_result(self) -> Result<T> {
        match (self.result, self.error) {
            (_, Some(error)) if !error.is_null() => Err(Error::Remote(error.to_string())),
            (Some(result), _) => Ok(result),
            (None, _) => Err(Error::Remote("missing result".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordRingInfo {
    pub local_node: LocalNode,
    #[serde(default)]
    pub successors: Vec<PeerInfo>,
    #[serde(default)]
    pub predecessors: Vec<PeerInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNode {
    pub id: String,
    #[serde(default)]
    pub relay_message_count: u64,
    #[serde(default)]
    pub uptime: u64,
}

#[derive(Debug, Deserialize)]
pub struct PeerInfo {
    pub addr: String,
    pub id: String,
}

impl PeerInfo {
    fn into_peer(self) -> Result<Peer> {
        Ok(Peer::new(self.addr, RingKey::from_hex(&self.id)?))
    }
}

impl TryFrom<ChordRingInfo> for NodeSnapshot {
    type Error = Error;

    fn try_from(info: ChordRingInfo) -> Result<Self> {
        Ok(NodeSnapshot {
            id: RingKey::from_hex(&info.local_node.id)?,
            relay_message_count: info.local_node.relay_message_count,
            uptime: info.local_node.uptime,
            successors: info
                .successors
                .into_iter()
                .map(PeerInfo::into_peer)
                .collect::<Result<_>>()?,
            predecessors: info
                .predecessors
                .into_iter()
                .map(PeerInfo::into_peer)
                .collect::<Result<_>>()?,
        })
    }
}
