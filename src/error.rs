//! Main Crate Error

#[derive(thiserror::Error, Debug)]
/// Chord size estimator error enum.
pub enum Error {
    #[error(transparent)]
    /// Transparent [reqwest::Error] from the RPC transport.
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode rpc response: {0}")]
    /// The remote node answered with something that isn't the expected json.
    Decode(#[from] serde_json::Error),

    #[error("Remote node returned an error: {0}")]
    /// The rpc response carried an `error` object instead of a `result`.
    Remote(String),

    #[error("Invalid hex ring key: {0:?}")]
    InvalidKey(String),

    #[error("Ring size must be greater than zero")]
    InvalidRingSize,

    #[error("RPC address is required")]
    MissingRpcAddress,

    #[error("Invalid peer address {0:?}")]
    /// A peer address could not be turned into an rpc endpoint.
    InvalidAddress(String),

    #[error("Found no successors for the start key")]
    NoSuccessors,

    #[error("All {} candidate addresses failed: [{}]", .0.len(), .0.join("; "))]
    /// Every candidate of a walk step failed, one `address: error` entry per attempt.
    AllCandidatesFailed(Vec<String>),

    #[error("Walk did not confirm any node")]
    EmptyWalk,

    #[error("Total area covered is zero, cannot estimate total number of nodes")]
    ZeroArea,

    #[error("Total uptime is zero, cannot estimate relay rate")]
    ZeroUptime,

    #[error("Estimated node count {0} is too small to estimate relay rate")]
    DegenerateNodeCount(u64),

    #[error("Estimate does not fit in 64 bits")]
    EstimateOverflow,
}

/// Alias for a [Result] with the crate [Error].
pub type Result<T, E = Error> = std::result::Result<T, E>;
