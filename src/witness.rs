//! Membership witnesses and their verification.
//!
//! The witness for `r_i` is the accumulator of every other element,
//! `G^(Π_{j≠i} r_j) mod N`, so raising it to `r_i` reproduces the
//! accumulator.  Each witness is computed independently from the full
//! product by exact division, which makes the work embarrassingly parallel.

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::accumulator::{product, AccumulatorValue};
use crate::error::{AccumulatorError, Result};
use crate::representative::{ensure_distinct, Representative};
use crate::setup::Setup;

/// A membership witness in `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Witness(BigUint);

impl Witness {
    /// Wraps a raw integer, reducing it modulo the setup's modulus.
    pub fn from_biguint(value: BigUint, setup: &Setup) -> Self {
        Self(value % setup.modulus())
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

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn witness_for(setup: &Setup, total: &BigUint, index: usize, rep: &Representative) -> Result<Witness> {
    let (quotient, remainder) = total.div_rem(rep.as_biguint());
    if !remainder.is_zero() {
        return Err(AccumulatorError::DivisionMismatch { index });
    }
    Ok(Witness(setup.generator().modpow(&quotient, setup.modulus())))
}

/// Computes one witness per representative, in input order.
///
/// Fails with [`AccumulatorError::DuplicateRepresentative`] when two
/// entries coincide, since their witnesses would be indistinguishable.
pub fn generate_proofs(setup: &Setup, reps: &[Representative]) -> Result<Vec<Witness>> {
    ensure_distinct(reps)?;
    let total = product(reps);
    debug!(
        "generating {} witnesses against a {}-bit product",
        reps.len(),
        total.bits()
    );
    let use_parallel = {
        #[cfg(not(target_arch = "wasm32"))]
        {
            // A single witness already costs a full-size exponentiation.
            reps.len() >= 2 && rayon::current_num_threads() > 1
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    };
    if use_parallel {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return reps
                .par_iter()
                .enumerate()
                .map(|(index, rep)| witness_for(setup, &total, index, rep))
                .collect();
        }
    }
    reps.iter()
        .enumerate()
        .map(|(index, rep)| witness_for(setup, &total, index, rep))
        .collect()
}

/// Computes the witness for `reps[index]` alone.
///
/// Applies the same duplicate check as [`generate_proofs`].
pub fn generate_proof_at(setup: &Setup, reps: &[Representative], index: usize) -> Result<Witness> {
    ensure_distinct(reps)?;
    let rep = reps.get(index).ok_or(AccumulatorError::IndexOutOfRange {
        index,
        len: reps.len(),
    })?;
    witness_for(setup, &product(reps), index, rep)
}

/// Returns `true` iff `witness^rep ≡ value (mod N)`.
pub fn verify(
    witness: &Witness,
    rep: &Representative,
    setup: &Setup,
    value: &AccumulatorValue,
) -> bool {
    witness.0.modpow(rep.as_biguint(), setup.modulus()) == *value.as_biguint()
}

/// A representative paired with its witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipProof {
    /// The prime the item was encoded to.
    pub representative: Representative,
    /// Witness against a specific accumulator value.
    pub witness: Witness,
}

impl MembershipProof {
    /// Checks the proof against `value`.
    pub fn verify(&self, setup: &Setup, value: &AccumulatorValue) -> bool {
        verify(&self.witness, &self.representative, setup, value)
    }

    /// Like [`MembershipProof::verify`] but returns an error on rejection.
    pub fn check(&self, setup: &Setup, value: &AccumulatorValue) -> Result<()> {
        if self.verify(setup, value) {
            Ok(())
        } else {
            Err(AccumulatorError::MembershipRejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{accumulate, accumulate_from_witness};

    fn toy_setup() -> Setup {
        Setup::new(BigUint::from(3233u32), BigUint::from(3u8), BigUint::from(2u8)).unwrap()
    }

    fn reps(values: &[u32]) -> Vec<Representative> {
        values
            .iter()
            .map(|&v| Representative::new(BigUint::from(v), 16).unwrap())
            .collect()
    }

    #[test]
    fn every_witness_verifies() {
        let setup = toy_setup();
        let reps = reps(&[5, 7, 11, 13]);
        let value = accumulate(&setup, &reps).unwrap();
        let witnesses = generate_proofs(&setup, &reps).unwrap();
        assert_eq!(witnesses.len(), reps.len());
        for (w, r) in witnesses.iter().zip(&reps) {
            assert!(verify(w, r, &setup, &value));
        }
    }

    #[test]
    fn witness_is_accumulator_of_the_rest() {
        let setup = toy_setup();
        let all = reps(&[5, 7, 11]);
        let witnesses = generate_proofs(&setup, &all).unwrap();
        let rest = accumulate(&setup, &all[1..]).unwrap();
        assert_eq!(witnesses[0].as_biguint(), rest.as_biguint());
    }

    #[test]
    fn wrong_representative_fails() {
        let setup = toy_setup();
        let all = reps(&[5, 7, 11]);
        let value = accumulate(&setup, &all).unwrap();
        let witnesses = generate_proofs(&setup, &all).unwrap();
        let outsider = Representative::new(BigUint::from(17u8), 16).unwrap();
        assert!(!verify(&witnesses[0], &outsider, &setup, &value));
    }

    #[test]
    fn both_paths_agree() {
        let setup = toy_setup();
        let all = reps(&[5, 7, 11, 13, 17]);
        let witnesses = generate_proofs(&setup, &all).unwrap();
        assert_eq!(
            accumulate_from_witness(&setup, &all, &witnesses).unwrap(),
            accumulate(&setup, &all).unwrap()
        );
    }

    #[test]
    fn single_element_witness_is_generator() {
        let setup = toy_setup();
        let witnesses = generate_proofs(&setup, &reps(&[7])).unwrap();
        assert_eq!(witnesses[0].as_biguint(), setup.generator());
    }

    #[test]
    fn empty_input_gives_no_witnesses() {
        assert!(generate_proofs(&toy_setup(), &[]).unwrap().is_empty());
    }

    #[test]
    fn single_proof_matches_batch() {
        let setup = toy_setup();
        let all = reps(&[5, 7, 11]);
        let batch = generate_proofs(&setup, &all).unwrap();
        assert_eq!(generate_proof_at(&setup, &all, 2).unwrap(), batch[2]);
        assert_eq!(
            generate_proof_at(&setup, &all, 3).unwrap_err(),
            AccumulatorError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn single_proof_rejects_duplicates() {
        let setup = toy_setup();
        let all = reps(&[5, 7, 5]);
        for index in [0, 2] {
            assert_eq!(
                generate_proof_at(&setup, &all, index).unwrap_err(),
                AccumulatorError::DuplicateRepresentative { first: 0, second: 2 }
            );
        }
        assert_eq!(
            generate_proofs(&setup, &all).unwrap_err(),
            AccumulatorError::DuplicateRepresentative { first: 0, second: 2 }
        );
    }

    #[test]
    fn non_divisor_is_a_mismatch() {
        let setup = toy_setup();
        let total = BigUint::from(35u8);
        let stray = Representative::new(BigUint::from(11u8), 16).unwrap();
        assert_eq!(
            witness_for(&setup, &total, 3, &stray).unwrap_err(),
            AccumulatorError::DivisionMismatch { index: 3 }
        );
    }

    #[test]
    fn proof_check_reports_rejection() {
        let setup = toy_setup();
        let all = reps(&[5, 7]);
        let value = accumulate(&setup, &all).unwrap();
        let witnesses = generate_proofs(&setup, &all).unwrap();
        let proof = MembershipProof {
            representative: all[0].clone(),
            witness: witnesses[1].clone(),
        };
        assert_eq!(
            proof.check(&setup, &value).unwrap_err(),
            AccumulatorError::MembershipRejected
        );
    }
}
