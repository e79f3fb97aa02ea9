//! Run several walks concurrently and aggregate their counters.

use std::{sync::Arc, thread};

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info, warn};

use crate::common::{RingKey, RingSpace};
use crate::estimate::Estimate;
use crate::rpc::RemoteNode;
use crate::walker::{walk, WalkResult};
use crate::{Error, Result};

/// Default number of concurrent walks.
pub const DEFAULT_WALKS: usize = 8;
/// Default hop budget of each walk.
pub const DEFAULT_HOPS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Sum of the counters of every successful walk in a run.
pub struct Aggregate {
    /// Number of walks that contributed.
    pub walks: usize,
    pub visited: u64,
    pub relay_total: u64,
    pub uptime_total: u64,
    pub area: BigUint,
}

impl Aggregate {
    pub fn add(&mut self, result: &WalkResult) {
        self.walks += 1;
        self.visited = self.visited.saturating_add(result.visited);
        self.relay_total = self.relay_total.saturating_add(result.relay_total);
        self.uptime_total = self.uptime_total.saturating_add(result.uptime_total);
        self.area += &result.area;
    }

    /// See [Estimate::new].
    pub fn estimate(&self, space: &RingSpace) -> Result<Estimate> {
        Estimate::new(self, space)
    }
}

#[derive(Debug, Clone)]
/// Launches evenly spaced walks around the ring.
pub struct Sampler {
    space: RingSpace,
    rpc: Arc<dyn RemoteNode>,
    walks: usize,
    hops: usize,
}

impl Sampler {
    pub fn new(space: RingSpace, rpc: Arc<dyn RemoteNode>) -> Self {
        Sampler {
            space,
            rpc,
            walks: DEFAULT_WALKS,
            hops: DEFAULT_HOPS,
        }
    }

    // === Options ===

    /// Number of concurrent walks, at least one.
    pub fn with_walks(mut self, walks: usize) -> Self {
        self.walks = walks.max(1);
        self
    }

    /// Hop budget of each walk.
    pub fn with_hops(mut self, hops: usize) -> Self {
        self.hops = hops;
        self
    }

    // === Public Methods ===

    /// Sample the ring from a random base key through the node at `entry`.
    pub fn run(&self, entry: &str) -> Result<Aggregate> {
        let base = self.space.random_key();

        self.sample(entry, &base)
    }

    /// Sample the ring with walks starting at `base` and evenly spaced from it.
    ///
    /// Blocks until every walk is done. A failed walk is logged and skipped;
    /// the run only fails if the walks covered no area at all.
    pub fn sample(&self, entry: &str, base: &RingKey) -> Result<Aggregate> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(Error::MissingRpcAddress);
        }

        let (sender, receiver) = flume::bounded::<(usize, Result<WalkResult>)>(self.walks);

        let handles = (0..self.walks)
            .map(|index| {
                let start = self.space.offset(base, index, self.walks);
                let space = self.space.clone();
                let rpc = self.rpc.clone();
                let entry = entry.to_string();
                let hops = self.hops;
                let sender = sender.clone();

                debug!(index, %start, "Starting walk");

                thread::spawn(move || {
                    let result = walk(rpc.as_ref(), &space, &start, &entry, hops);
                    let _ = sender.send((index, result));
                })
            })
            .collect::<Vec<_>>();

        drop(sender);

        let mut aggregate = Aggregate::default();

        for (index, result) in receiver.iter() {
            match result {
                Ok(result) => {
                    debug!(index, visited = result.visited, area = %result.area, "Walk done");
                    aggregate.add(&result);
                }
                Err(error) => warn!(index, %error, "Walk failed"),
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("Walk thread panicked");
            }
        }

        info!(
            walks = aggregate.walks,
            visited = aggregate.visited,
            "Sampling done"
        );

        if aggregate.area.is_zero() {
            return Err(Error::ZeroArea);
        }

        Ok(aggregate)
    }
}
