//! Deterministic stream of Miller–Rabin bases.
//!
//! Hash-to-prime must return the same prime on every run, so the bases
//! used by the primality test cannot come from an operating-system RNG.
//! [`BaseStream`] expands a BLAKE2b-256 hash of the candidate into an
//! unbounded byte stream, one counter-indexed block at a time, and reduces
//! chunks of it into the requested range.

use blake2::digest::{consts::U32, Digest};
use num_bigint::BigUint;

type Blake2b256 = blake2::Blake2b<U32>;

const SEED_DOMAIN: &[u8] = b"RSA_ACC_MR_SEED";
const STREAM_DOMAIN: &[u8] = b"RSA_ACC_MR_STREAM";

/// Extra bytes drawn beyond the bound's width to keep the modular bias
/// below 2^-64.
const BIAS_MARGIN: usize = 8;

/// A deterministic generator of big-integer samples derived from BLAKE2b-256.
#[derive(Debug, Clone)]
pub struct BaseStream {
    seed: [u8; 32],
    counter: u64,
    buffer: [u8; 32],
    offset: usize,
}

impl BaseStream {
    /// Seeds a stream from the big-endian bytes of `candidate`.
    pub fn for_candidate(candidate: &BigUint) -> Self {
        let bytes = candidate.to_bytes_be();
        let mut hasher = Blake2b256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(&bytes);
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hasher.finalize());
        Self {
            seed,
            counter: 0,
            buffer: [0u8; 32],
            offset: 32,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Blake2b256::new();
        hasher.update(STREAM_DOMAIN);
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.buffer.copy_from_slice(&hasher.finalize());
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }

    fn fill(&mut self, out: &mut [u8]) {
        for byte in out.iter_mut() {
            if self.offset >= self.buffer.len() {
                self.refill();
            }
            *byte = self.buffer[self.offset];
            self.offset += 1;
        }
    }

    /// Returns a sample in `[low, low + span)`.
    ///
    /// # Panics
    ///
    /// Panics if `span` is zero.
    pub fn next_in_range(&mut self, low: &BigUint, span: &BigUint) -> BigUint {
        assert!(*span != BigUint::from(0u8), "span must be non-zero");
        let width = ((span.bits() + 7) / 8) as usize + BIAS_MARGIN;
        let mut raw = vec![0u8; width];
        self.fill(&mut raw);
        low + BigUint::from_bytes_be(&raw) % span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_candidate_same_stream() {
        let candidate = BigUint::from(1_000_003u64);
        let low = BigUint::from(2u8);
        let span = BigUint::from(999_998u64);
        let mut a = BaseStream::for_candidate(&candidate);
        let mut b = BaseStream::for_candidate(&candidate);
        for _ in 0..20 {
            assert_eq!(a.next_in_range(&low, &span), b.next_in_range(&low, &span));
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut stream = BaseStream::for_candidate(&BigUint::from(97u8));
        let low = BigUint::from(2u8);
        let span = BigUint::from(93u8);
        for _ in 0..200 {
            let x = stream.next_in_range(&low, &span);
            assert!(x >= low && x < &low + &span);
        }
    }

    #[test]
    fn different_candidates_diverge() {
        let low = BigUint::from(0u8);
        let span = BigUint::from(u64::MAX);
        let mut a = BaseStream::for_candidate(&BigUint::from(101u8));
        let mut b = BaseStream::for_candidate(&BigUint::from(103u8));
        let xs: Vec<_> = (0..4).map(|_| a.next_in_range(&low, &span)).collect();
        let ys: Vec<_> = (0..4).map(|_| b.next_in_range(&low, &span)).collect();
        assert_ne!(xs, ys);
    }
}
