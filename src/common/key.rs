//! Chord ring key and the circular key space it lives in.
use std::fmt::{self, Debug, Display, Formatter};

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::OsRng;

use crate::{Error, Result};

/// The size of ring keys in bits.
pub const KEY_BITS: usize = 256;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A point on the ring: a node identifier or a lookup target.
///
/// Keys coming from the network are not trusted to be in range, pass them
/// through [RingSpace::reduce] before doing ring arithmetic with them.
pub struct RingKey(BigUint);

impl RingKey {
    /// Parse a hex key as sent by nodes, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<RingKey> {
        let digits = hex.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);

        if digits.is_empty() {
            return Err(Error::InvalidKey(hex.to_string()));
        }

        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(RingKey)
            .ok_or_else(|| Error::InvalidKey(hex.to_string()))
    }

    /// Lowercase hex without prefix or leading zeros, the form rpc requests expect.
    pub fn to_hex(&self) -> String {
        self.0.to_str_radix(16)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for RingKey {
    fn from(value: u64) -> Self {
        RingKey(BigUint::from(value))
    }
}

impl Display for RingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for RingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RingKey({})", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The circular key space `[0, size)`.
///
/// Passed around as a value so runs and tests can use different ring sizes.
pub struct RingSpace {
    size: BigUint,
}

impl Default for RingSpace {
    /// The full `2^256` ring.
    fn default() -> Self {
        RingSpace {
            size: BigUint::one() << KEY_BITS,
        }
    }
}

impl RingSpace {
    pub fn new(size: BigUint) -> Result<Self> {
        if size.is_zero() {
            return Err(Error::InvalidRingSize);
        }

        Ok(RingSpace { size })
    }

    // === Getters ===

    pub fn size(&self) -> &BigUint {
        &self.size
    }

    // === Public Methods ===

    /// Reduce a key modulo the ring size.
    pub fn reduce(&self, key: &RingKey) -> RingKey {
        RingKey(&key.0 % &self.size)
    }

    /// Uniformly random key drawn from the OS entropy source, so sampled
    /// start points can't be predicted by nodes on the ring.
    pub fn random_key(&self) -> RingKey {
        let mut rng = OsRng;

        RingKey(rng.gen_biguint_below(&self.size))
    }

    /// The `index`th of `partitions` evenly spaced keys starting at `base`.
    ///
    /// `(base + size * index / partitions) mod size`
    pub fn offset(&self, base: &RingKey, index: usize, partitions: usize) -> RingKey {
        if partitions == 0 {
            return self.reduce(base);
        }

        let offset = &self.size * BigUint::from(index) / BigUint::from(partitions);

        RingKey((&base.0 + offset) % &self.size)
    }

    /// Clockwise distance from `from` to `to`, wrapping through zero.
    ///
    /// Always in `[0, size)`.
    pub fn forward_distance(&self, from: &RingKey, to: &RingKey) -> BigUint {
        let from = &from.0 % &self.size;
        let to = &to.0 % &self.size;

        if to >= from {
            to - from
        } else {
            (&self.size - from) + to
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_ring() -> RingSpace {
        RingSpace::new(BigUint::from(0x100_u32)).unwrap()
    }

    #[test]
    fn hex() {
        let key = RingKey::from_hex("0x00aBc").unwrap();

        assert_eq!(key, RingKey::from(0xabc));
        assert_eq!(key.to_hex(), "abc");
        assert_eq!(format!("{:?}", key), "RingKey(abc)");

        assert!(RingKey::from_hex("").is_err());
        assert!(RingKey::from_hex("0x").is_err());
        assert!(RingKey::from_hex("xyz").is_err());
    }

    #[test]
    fn default_size() {
        let space = RingSpace::default();

        assert_eq!(space.size().bits(), KEY_BITS as u64 + 1);
        assert!(RingSpace::new(BigUint::zero()).is_err());
    }

    #[test]
    fn reduce() {
        let space = small_ring();

        assert_eq!(space.reduce(&RingKey::from(0x105)), RingKey::from(0x05));
        assert_eq!(space.reduce(&RingKey::from(0xff)), RingKey::from(0xff));
    }

    #[test]
    fn random_key_in_range() {
        let space = small_ring();

        for _ in 0..1000 {
            assert!(space.random_key().as_biguint() < space.size());
        }

        let space = RingSpace::default();
        assert_ne!(space.random_key(), space.random_key());
    }

    #[test]
    fn forward_distance() {
        let space = small_ring();

        let a = RingKey::from(0x05);
        let b = RingKey::from(0x90);

        assert_eq!(space.forward_distance(&a, &a), BigUint::zero());
        assert_eq!(space.forward_distance(&a, &b), BigUint::from(0x8b_u32));
        assert_eq!(space.forward_distance(&b, &a), BigUint::from(0x75_u32));

        for (from, to) in [(0x00, 0xff), (0x10, 0x0f), (0x80, 0x7f), (0x33, 0x34)] {
            let (from, to) = (RingKey::from(from), RingKey::from(to));

            assert_eq!(
                space.forward_distance(&from, &to) + space.forward_distance(&to, &from),
                *space.size()
            );
        }
    }

    #[test]
    fn forward_distance_full_ring() {
        let space = RingSpace::default();

        let a = space.random_key();
        let b = space.random_key();

        assert_eq!(space.forward_distance(&a, &a), BigUint::zero());
        assert_eq!(
            space.forward_distance(&a, &b) + space.forward_distance(&b, &a),
            *space.size()
        );
    }

    #[test]
    fn offsets_evenly_spaced() {
        for space in [small_ring(), RingSpace::default()] {
            for partitions in [1, 3, 7, 8, 16] {
                let base = space.random_key();

                let keys = (0..partitions)
                    .map(|i| space.offset(&base, i, partitions))
                    .collect::<Vec<_>>();

                assert_eq!(keys[0], base);

                let step = space.size() / BigUint::from(partitions);

                for i in 0..partitions {
                    for j in (i + 1)..partitions {
                        assert_ne!(keys[i], keys[j]);
                    }

                    let gap = space.forward_distance(&keys[i], &keys[(i + 1) % partitions]);
                    if partitions == 1 {
                        assert!(gap.is_zero());
                    } else {
                        assert!(gap >= &step - 1_u32 && gap <= &step + 1_u32);
                    }
                }
            }
        }
    }

    #[test]
    fn offset_wraps() {
        let space = small_ring();

        let base = RingKey::from(0xf0);

        assert_eq!(space.offset(&base, 1, 2), RingKey::from(0x70));
        assert_eq!(space.offset(&base, 3, 4), RingKey::from(0xb0));
        assert_eq!(space.offset(&base, 0, 0), base);
    }
}
