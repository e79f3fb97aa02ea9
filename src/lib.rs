#![doc = include_str!("../README.md")]

mod common;

mod error;
pub mod estimate;
pub mod rpc;
pub mod sampler;
pub mod walker;

pub use crate::common::{NodeSnapshot, Peer, RingKey, RingSpace, KEY_BITS};
pub use error::{Error, Result};
pub use estimate::Estimate;
pub use rpc::{Config, HttpRpc, RemoteNode};
pub use sampler::{Aggregate, Sampler};
pub use walker::{walk, WalkResult};
