use std::time::Duration;

/// Port nodes serve json-rpc on, substituted into advertised peer addresses.
pub const DEFAULT_RPC_PORT: u16 = 30003;
/// Default timeout for a whole rpc request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default timeout for establishing the tcp connection of a request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
/// Rpc client configurations
pub struct Config {
    /// Port to reach a peer's json-rpc server on, replacing whatever port
    /// the peer advertises in its ring address.
    ///
    /// Defaults to [DEFAULT_RPC_PORT]
    pub rpc_port: u16,
    /// Request timeout duration.
    ///
    /// Bounds how long a single hop of a walk can stall on one candidate.
    ///
    /// Defaults to [DEFAULT_REQUEST_TIMEOUT]
    pub request_timeout: Duration,
    /// Tcp connect timeout duration.
    ///
    /// Defaults to [DEFAULT_CONNECT_TIMEOUT]
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_port: DEFAULT_RPC_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
