//! Hash-to-prime encoding.
//!
//! An item is hashed with the digest selected by its [`EncodingScheme`], the
//! digest is read as a big-endian integer, and the integer is incremented
//! until it passes a Miller–Rabin test.  With the default 32 rounds a
//! composite survives with probability at most `4^-32 = 2^-64`.  The search
//! is capped by [`EncoderConfig::max_increments`]; running past the cap is
//! reported as [`AccumulatorError::EncodingNonTermination`] instead of
//! looping forever.

use log::{debug, trace};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{AccumulatorError, Result};
use crate::prng::BaseStream;
use crate::representative::{EncodingScheme, Representative};

/// Default number of Miller–Rabin rounds.
pub const DEFAULT_MR_ROUNDS: u32 = 32;

/// Default cap on increments during the prime search.  Prime gaps below
/// 2^512 are far shorter than this.
pub const DEFAULT_MAX_INCREMENTS: u64 = 1 << 16;

const ROUNDS_ENV: &str = "RSA_ACC_MR_ROUNDS";
const MAX_INCREMENTS_ENV: &str = "RSA_ACC_MAX_INCREMENTS";

const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Tuning knobs for the prime search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Miller–Rabin rounds per candidate that survives trial division.
    pub rounds: u32,
    /// Maximum number of increments before giving up.
    pub max_increments: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_MR_ROUNDS,
            max_increments: DEFAULT_MAX_INCREMENTS,
        }
    }
}

impl EncoderConfig {
    /// Reads `RSA_ACC_MR_ROUNDS` and `RSA_ACC_MAX_INCREMENTS`, falling back to
    /// the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`EncoderConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ROUNDS_ENV) {
            config.rounds = parse_env(ROUNDS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MAX_INCREMENTS_ENV) {
            config.max_increments = parse_env(MAX_INCREMENTS_ENV, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects a configuration that cannot certify primality.
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(AccumulatorError::InvalidConfig(
                "Miller-Rabin rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AccumulatorError::InvalidConfig(format!("{name}={raw} is not a number")))
}

/// Probabilistic primality test: trial division, then `rounds` Miller–Rabin
/// rounds with bases derived deterministically from `n`.
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    if *n < BigUint::from(2u8) {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        if (n % p).is_zero() {
            return *n == BigUint::from(p);
        }
    }
    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // n > 251 here, so [2, n-2] is non-empty.
    let low = BigUint::from(2u8);
    let span = n - 3u8;
    let mut bases = BaseStream::for_candidate(n);
    'rounds: for _ in 0..rounds {
        let a = bases.next_in_range(&low, &span);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'rounds;
            }
        }
        return false;
    }
    true
}

/// Returns the first probable prime `>= start`, examining at most
/// `config.max_increments + 1` candidates.
pub fn next_prime_bounded(start: BigUint, config: &EncoderConfig) -> Result<BigUint> {
    let mut candidate = start;
    let mut increments = 0u64;
    loop {
        if is_probable_prime(&candidate, config.rounds) {
            trace!("prime found after {increments} increments");
            return Ok(candidate);
        }
        if increments >= config.max_increments {
            debug!(
                "hash-to-prime exhausted its bound of {} increments",
                config.max_increments
            );
            return Err(AccumulatorError::EncodingNonTermination { increments });
        }
        candidate += 1u8;
        increments += 1;
    }
}

/// Hashes `bytes` under `scheme` and searches for the next prime.
pub fn hash_to_prime(
    bytes: &[u8],
    scheme: EncodingScheme,
    config: &EncoderConfig,
) -> Result<Representative> {
    let digest = scheme.digest(bytes);
    let start = BigUint::from_bytes_be(&digest);
    next_prime_bounded(start, config).map(Representative::from_prime_unchecked)
}

/// Encodes `bytes` with the default SHA-256 scheme and configuration.
pub fn encode_to_prime(bytes: &[u8]) -> Result<Representative> {
    hash_to_prime(bytes, EncodingScheme::default(), &EncoderConfig::default())
}
