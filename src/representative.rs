//! Prime representatives and the schemes that produce them.

use std::fmt;
use std::str::FromStr;

use log::debug;
use num_bigint::BigUint;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::{AccumulatorError, Result};
use crate::prime::{hash_to_prime, is_probable_prime, EncoderConfig};

/// Item counts at or above this size are encoded on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 16;

/// Digest used to map an item onto the starting point of the prime search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingScheme {
    /// SHA-256, the reference encoding.
    #[default]
    HashToPrimeSha256,
    /// SHA3-256.
    HashToPrimeSha3_256,
    /// BLAKE2b with a 256-bit output.
    HashToPrimeBlake2b256,
}

impl EncodingScheme {
    /// Every supported scheme, ordered by identifier.
    pub const ALL: [EncodingScheme; 3] = [
        EncodingScheme::HashToPrimeSha256,
        EncodingScheme::HashToPrimeSha3_256,
        EncodingScheme::HashToPrimeBlake2b256,
    ];

    /// Stable numeric identifier.
    pub fn id(self) -> u8 {
        match self {
            EncodingScheme::HashToPrimeSha256 => 0,
            EncodingScheme::HashToPrimeSha3_256 => 1,
            EncodingScheme::HashToPrimeBlake2b256 => 2,
        }
    }

    /// Stable textual name.
    pub fn name(self) -> &'static str {
        match self {
            EncodingScheme::HashToPrimeSha256 => "hash-to-prime-sha256",
            EncodingScheme::HashToPrimeSha3_256 => "hash-to-prime-sha3-256",
            EncodingScheme::HashToPrimeBlake2b256 => "hash-to-prime-blake2b256",
        }
    }

    /// Hashes `bytes` with this scheme's digest.
    pub fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            EncodingScheme::HashToPrimeSha256 => sha2::Sha256::digest(bytes).to_vec(),
            EncodingScheme::HashToPrimeSha3_256 => sha3::Sha3_256::digest(bytes).to_vec(),
            EncodingScheme::HashToPrimeBlake2b256 => {
                blake2::Blake2b::<blake2::digest::consts::U32>::digest(bytes).to_vec()
            }
        }
    }
}

impl TryFrom<u8> for EncodingScheme {
    type Error = AccumulatorError;

    fn try_from(id: u8) -> Result<Self> {
        EncodingScheme::ALL
            .into_iter()
            .find(|scheme| scheme.id() == id)
            .ok_or_else(|| AccumulatorError::UnknownEncodingScheme(id.to_string()))
    }
}

impl FromStr for EncodingScheme {
    type Err = AccumulatorError;

    fn from_str(s: &str) -> Result<Self> {
        EncodingScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AccumulatorError::UnknownEncodingScheme(s.to_string()))
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A probable prime standing in for one accumulated item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Representative(BigUint);

impl Representative {
    /// Wraps `value` after re-running the primality test.
    pub fn new(value: BigUint, rounds: u32) -> Result<Self> {
        if is_probable_prime(&value, rounds) {
            Ok(Self(value))
        } else {
            Err(AccumulatorError::InvalidInteger(format!(
                "{value} is not a prime representative"
            )))
        }
    }

    pub(crate) fn from_prime_unchecked(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrows the underlying integer.
    #[inline]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> BigUint {
        self.0
    }
}

impl fmt::Display for Representative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encodes every item under `scheme` with the default search configuration.
pub fn generate_representatives<T>(items: &[T], scheme: EncodingScheme) -> Result<Vec<Representative>>
where
    T: AsRef<[u8]> + Sync,
{
    generate_representatives_with(items, scheme, &EncoderConfig::default())
}

/// Encodes every item under `scheme`, preserving input order.
pub fn generate_representatives_with<T>(
    items: &[T],
    scheme: EncodingScheme,
    config: &EncoderConfig,
) -> Result<Vec<Representative>>
where
    T: AsRef<[u8]> + Sync,
{
    config.validate()?;
    debug!("encoding {} items with {}", items.len(), scheme);
    let use_parallel = {
        #[cfg(not(target_arch = "wasm32"))]
        {
            items.len() >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    };
    if use_parallel {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return items
                .par_iter()
                .map(|item| hash_to_prime(item.as_ref(), scheme, config))
                .collect();
        }
    }
    items
        .iter()
        .map(|item| hash_to_prime(item.as_ref(), scheme, config))
        .collect()
}

/// Returns the first pair of positions holding equal representatives.
pub fn find_duplicate(reps: &[Representative]) -> Option<(usize, usize)> {
    let mut seen = std::collections::HashMap::with_capacity(reps.len());
    for (idx, rep) in reps.iter().enumerate() {
        if let Some(&first) = seen.get(rep) {
            return Some((first, idx));
        }
        seen.insert(rep, idx);
    }
    None
}

/// Fails with [`AccumulatorError::DuplicateRepresentative`] on a repeat.
pub fn ensure_distinct(reps: &[Representative]) -> Result<()> {
    match find_duplicate(reps) {
        Some((first, second)) => Err(AccumulatorError::DuplicateRepresentative { first, second }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_ids_round_trip() {
        for scheme in EncodingScheme::ALL {
            assert_eq!(EncodingScheme::try_from(scheme.id()).unwrap(), scheme);
            assert_eq!(scheme.name().parse::<EncodingScheme>().unwrap(), scheme);
        }
    }

    #[test]
    fn unknown_scheme_is_an_error() {
        assert_eq!(
            EncodingScheme::try_from(9).unwrap_err(),
            AccumulatorError::UnknownEncodingScheme("9".to_string())
        );
        assert!(matches!(
            "poseidon".parse::<EncodingScheme>(),
            Err(AccumulatorError::UnknownEncodingScheme(_))
        ));
    }

    #[test]
    fn scheme_serde_names() {
        let json = serde_json::to_string(&EncodingScheme::HashToPrimeSha256).unwrap();
        assert_eq!(json, "\"hash-to-prime-sha256\"");
        let back: EncodingScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EncodingScheme::HashToPrimeSha256);
    }

    #[test]
    fn preserves_order_and_length() {
        let items = ["Alice", "Bob", "Charlie"];
        let reps = generate_representatives(&items, EncodingScheme::default()).unwrap();
        assert_eq!(reps.len(), 3);
        assert_eq!(
            reps[1].to_string(),
            "93006290325627508022776103386395994712401809437930957652111221015872244345213"
        );
        assert_eq!(
            reps[2].to_string(),
            "49983559231702896786484861814417513147554419964069967620292135702216236071529"
        );
    }

    #[test]
    fn parallel_path_matches_sequential() {
        let items: Vec<String> = (0..PARALLEL_THRESHOLD + 4)
            .map(|i| format!("Element {i}"))
            .collect();
        let all = generate_representatives(&items, EncodingScheme::default()).unwrap();
        for (item, rep) in items.iter().zip(&all) {
            let single =
                generate_representatives(&[item.as_str()], EncodingScheme::default()).unwrap();
            assert_eq!(&single[0], rep);
        }
    }

    #[test]
    fn schemes_disagree() {
        let reps: Vec<_> = EncodingScheme::ALL
            .into_iter()
            .map(|scheme| generate_representatives(&["Alice"], scheme).unwrap().remove(0))
            .collect();
        assert_ne!(reps[0], reps[1]);
        assert_ne!(reps[1], reps[2]);
    }

    #[test]
    fn detects_duplicates() {
        let reps = generate_representatives(&["a", "b", "a"], EncodingScheme::default()).unwrap();
        assert_eq!(find_duplicate(&reps), Some((0, 2)));
        assert_eq!(
            ensure_distinct(&reps).unwrap_err(),
            AccumulatorError::DuplicateRepresentative { first: 0, second: 2 }
        );
        assert!(ensure_distinct(&reps[..2]).is_ok());
    }

    #[test]
    fn new_rejects_composites() {
        assert!(Representative::new(BigUint::from(91u8), 8).is_err());
        assert!(Representative::new(BigUint::from(97u8), 8).is_ok());
    }
}
