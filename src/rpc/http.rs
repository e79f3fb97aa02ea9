//! Blocking json-rpc over http.

use std::convert::TryFrom;

use reqwest::{blocking::Client, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use super::messages::{
    ChordRingInfo, FindSuccessorAddrsParams, NoParams, RpcRequest, RpcResponse,
    FIND_SUCCESSOR_ADDRS, GET_CHORD_RING_INFO,
};
use super::{Config, RemoteNode};
use crate::common::{NodeSnapshot, RingKey};
use crate::{Error, Result};

#[derive(Debug, Clone)]
/// [RemoteNode] speaking json-rpc over http to ring nodes.
///
/// Cloning is cheap and shares the connection pool.
pub struct HttpRpc {
    client: Client,
    rpc_port: u16,
}

impl HttpRpc {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .no_proxy()
            .build()?;

        Ok(HttpRpc {
            client,
            rpc_port: config.rpc_port,
        })
    }

    // === Private Methods ===

    fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        method: &str,
        params: P,
    ) -> Result<T> {
        trace!(?url, ?method, "Sending rpc request");

        let body = self
            .client
            .post(url)
            .json(&RpcRequest { method, params })
            .send()?
            .bytes()?;

        let response: RpcResponse<T> = serde_json::from_slice(&body)?;

        response.into_result()
    }
}

impl RemoteNode for HttpRpc {
    fn find_successors(&self, key: &RingKey, address: &str) -> Result<Vec<String>> {
        self.call(
            address,
            FIND_SUCCESSOR_ADDRS,
            FindSuccessorAddrsParams { key: key.to_hex() },
        )
    }

    fn chord_ring_info(&self, address: &str) -> Result<NodeSnapshot> {
        let info: ChordRingInfo = self.call(address, GET_CHORD_RING_INFO, NoParams {})?;

        NodeSnapshot::try_from(info)
    }

    /// Keep the host of `tcp://host:port` and swap in the configured rpc port.
    fn rpc_address(&self, peer_address: &str) -> Result<String> {
        let url =
            Url::parse(peer_address).map_err(|_| Error::InvalidAddress(peer_address.into()))?;

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(format!("http://{}:{}", host, self.rpc_port)),
            _ => Err(Error::InvalidAddress(peer_address.into())),
        }
    }
}
