//! Network size and throughput estimation from walk coverage.

use std::convert::TryFrom;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

use crate::common::RingSpace;
use crate::sampler::Aggregate;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Network wide estimates derived from an [Aggregate].
pub struct Estimate {
    /// Nodes the walks visited, including skipped ones.
    pub visited: u64,
    /// Percentage of the key space the walks covered.
    pub covered: f64,
    /// Estimated total number of nodes.
    #[serde(rename = "Estimated")]
    pub estimated: u64,
    /// One standard deviation of [Estimate::estimated].
    pub uncertainty: u64,
    /// Estimated distinct messages entering the network per second.
    #[serde(rename = "relayPS")]
    pub relay_per_second: f64,
}

impl Estimate {
    /// Estimate network size and relay throughput.
    ///
    /// # Explanation
    ///
    /// Assuming node ids are uniformly distributed over the ring, walks that
    /// together saw `visited` nodes over `area` of a ring of size `R`
    /// suggest `visited * R / area` nodes in total.
    ///
    /// Treating `visited` as a Poisson count, its standard deviation is
    /// `sqrt(visited)`, scaled by the same `R / area` factor.
    ///
    /// Relay counters are per hop, so the average per node relay rate times
    /// the node count is divided by the average Chord path length `log2(N) / 2`
    /// to count each message once.
    pub fn new(aggregate: &Aggregate, space: &RingSpace) -> Result<Self> {
        let estimated = total_nodes(aggregate.visited, &aggregate.area, space)?;

        Ok(Estimate {
            visited: aggregate.visited,
            covered: coverage_percent(&aggregate.area, space),
            estimated,
            uncertainty: uncertainty(aggregate.visited, &aggregate.area, space)?,
            relay_per_second: relay_per_second(
                aggregate.relay_total,
                aggregate.uptime_total,
                estimated,
            )?,
        })
    }
}

/// `floor(visited * R / area)`
pub fn total_nodes(visited: u64, area: &BigUint, space: &RingSpace) -> Result<u64> {
    if area.is_zero() {
        return Err(Error::ZeroArea);
    }

    let estimate = BigUint::from(visited) * space.size() / area;

    u64::try_from(&estimate).map_err(|_| Error::EstimateOverflow)
}

/// `floor(sqrt(visited) * R / area)`, computed exactly as `isqrt(visited * R^2) / area`.
pub fn uncertainty(visited: u64, area: &BigUint, space: &RingSpace) -> Result<u64> {
    if area.is_zero() {
        return Err(Error::ZeroArea);
    }

    let scaled = (BigUint::from(visited) * space.size() * space.size()).sqrt();

    u64::try_from(&(scaled / area)).map_err(|_| Error::EstimateOverflow)
}

/// `(relay_total / uptime_total) * nodes / (log2(nodes) / 2)`
pub fn relay_per_second(relay_total: u64, uptime_total: u64, nodes: u64) -> Result<f64> {
    if uptime_total == 0 {
        return Err(Error::ZeroUptime);
    }
    if nodes <= 1 {
        return Err(Error::DegenerateNodeCount(nodes));
    }

    let nodes = nodes as f64;
    let per_node = relay_total as f64 / uptime_total as f64;

    Ok(per_node * nodes / (nodes.log2() / 2.0))
}

/// Percentage of the ring `area` spans, to four decimal places.
///
/// Can exceed 100 when overlapping walks are summed.
pub fn coverage_percent(area: &BigUint, space: &RingSpace) -> f64 {
    let millionths = area * 1_000_000_u32 / space.size();

    u64::try_from(&millionths).unwrap_or(u64::MAX) as f64 / 10_000.0
}
