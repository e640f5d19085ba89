//! Deterministic randomness with an OS fallback
//!
//! Parameter generation must be reproducible when the caller supplies seed
//! bytes (the WASM-style `randomBytes` input) and unpredictable otherwise.
//! `Rng` models both: a supplied stream is consumed sequentially from offset
//! zero (32-bit draws take 4 bytes little-endian), and an absent stream
//! falls through to the operating-system CSPRNG.
//!
//! `select` is a partial Fisher–Yates shuffle. The index is reduced with a
//! plain modulo, **not** rejection sampling; the resulting bias is part of
//! the published parameter format and must be reproduced bit-for-bit so that
//! extractors generated by earlier deployments keep verifying. The backing
//! array is virtual (a sparse map of displaced entries), so selecting a few
//! words out of a multi-billion-element range costs O(words) memory while
//! emitting exactly the sequence a materialized array would.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::FuzzyError;

/// Byte/integer stream backed by caller-supplied seed bytes or by `OsRng`.
#[derive(Debug)]
pub struct Rng {
    seed: Option<Vec<u8>>,
    offset: usize,
}

impl Rng {
    /// Create a generator. `Some(bytes)` makes every draw deterministic;
    /// `None` draws from the operating system.
    pub fn new(seed: Option<Vec<u8>>) -> Self {
        Self { seed, offset: 0 }
    }

    /// Return `count` bytes, consuming the seed stream in order.
    pub fn bytes(&mut self, count: usize) -> Result<Vec<u8>, FuzzyError> {
        match &self.seed {
            Some(seed) => {
                let end = self.offset.checked_add(count).filter(|&e| e <= seed.len());
                let end = end.ok_or_else(|| {
                    FuzzyError::invalid(format!(
                        "seed stream exhausted: need {count} bytes at offset {}, have {}",
                        self.offset,
                        seed.len()
                    ))
                })?;
                let out = seed[self.offset..end].to_vec();
                self.offset = end;
                Ok(out)
            }
            None => {
                let mut out = vec![0u8; count];
                OsRng.fill_bytes(&mut out);
                Ok(out)
            }
        }
    }

    /// Return an unsigned 32-bit integer assembled from 4 bytes in
    /// little-endian order.
    pub fn next_u32(&mut self) -> Result<u32, FuzzyError> {
        let raw = self.bytes(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// First `m` elements of a Fisher–Yates shuffle of `[0, n)`.
    ///
    /// Draw order and modulo bias are normative: for each `i`, the swap
    /// partner is `i + (next_u32() mod (n − i))`.
    pub fn select(&mut self, n: u64, m: usize) -> Result<Vec<u64>, FuzzyError> {
        if m == 0 || (m as u64) > n {
            return Err(FuzzyError::invalid(format!(
                "cannot select {m} elements from a range of {n}"
            )));
        }
        // Virtual array: absent keys hold their own index.
        let mut displaced: HashMap<u64, u64> = HashMap::with_capacity(2 * m);
        let mut out = Vec::with_capacity(m);
        for i in 0..m as u64 {
            let k = i + self.next_u32()? as u64 % (n - i);
            let xi = displaced.get(&i).copied().unwrap_or(i);
            let xk = displaced.get(&k).copied().unwrap_or(k);
            displaced.insert(i, xk);
            displaced.insert(k, xi);
            out.push(xk);
        }
        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_bytes_are_consumed_in_order() {
        let mut rng = Rng::new(Some((0u8..12).collect()));
        assert_eq!(rng.bytes(3).unwrap(), vec![0, 1, 2]);
        assert_eq!(rng.bytes(0).unwrap(), Vec::<u8>::new());
        assert_eq!(rng.bytes(4).unwrap(), vec![3, 4, 5, 6]);
        assert_eq!(rng.next_u32().unwrap(), u32::from_le_bytes([7, 8, 9, 10]));
        assert!(rng.bytes(2).is_err(), "only one byte left");
    }

    #[test]
    fn u32_is_little_endian() {
        let mut rng = Rng::new(Some(vec![0x01, 0x23, 0x45, 0x67]));
        assert_eq!(rng.next_u32().unwrap(), 0x6745_2301);
    }

    #[test]
    fn os_stream_yields_requested_lengths() {
        let mut rng = Rng::new(None);
        assert_eq!(rng.bytes(32).unwrap().len(), 32);
        rng.next_u32().unwrap();
    }

    #[test]
    fn select_returns_distinct_in_range_values() {
        let mut rng = Rng::new(None);
        let picked = rng.select(1000, 40).unwrap();
        assert_eq!(picked.len(), 40);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 40, "selection must be pairwise distinct");
        assert!(picked.iter().all(|&x| x < 1000));
    }

    #[test]
    fn sparse_select_matches_materialized_shuffle() {
        let seed: Vec<u8> = (0u8..=255).chain(0u8..=255).collect();
        let n = 97u64;
        let m = 20usize;

        let sparse = Rng::new(Some(seed.clone())).select(n, m).unwrap();

        // Reference: the same walk over a dense array.
        let mut rng = Rng::new(Some(seed));
        let mut xs: Vec<u64> = (0..n).collect();
        for i in 0..m {
            let k = i + (rng.next_u32().unwrap() as u64 % (n - i as u64)) as usize;
            xs.swap(i, k);
        }
        assert_eq!(sparse, xs[..m].to_vec());
    }

    #[test]
    fn select_rejects_bad_counts() {
        let mut rng = Rng::new(None);
        assert!(rng.select(10, 0).is_err());
        assert!(rng.select(10, 11).is_err());
    }
}
