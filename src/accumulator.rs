//! Accumulator values, full aggregation and incremental updates.
//!
//! The accumulator of a set `S` with representatives `r_1..r_k` is
//! `G^(r_1 · … · r_k) mod N`.  Because the exponent is a product, the value
//! does not depend on insertion order, and appending one representative `r`
//! is a single exponentiation: `A' = A^r mod N`.

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::One;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::error::{AccumulatorError, Result};
use crate::representative::{ensure_distinct, Representative, PARALLEL_THRESHOLD};
use crate::setup::Setup;
use crate::witness::Witness;

/// An accumulator value in `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccumulatorValue(BigUint);

impl AccumulatorValue {
    /// Wraps a raw integer, reducing it modulo the setup's modulus.
    pub fn from_biguint(value: BigUint, setup: &Setup) -> Self {
        Self(value % setup.modulus())
    }

    /// The value of the empty accumulator: the generator itself.
    pub fn empty(setup: &Setup) -> Self {
        Self(setup.generator().clone())
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

impl fmt::Display for AccumulatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Multiplies every representative together.
pub fn product(reps: &[Representative]) -> BigUint {
    let use_parallel = {
        #[cfg(not(target_arch = "wasm32"))]
        {
            reps.len() >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1
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
                .map(|rep| rep.as_biguint().clone())
                .reduce(BigUint::one, |a, b| a * b);
        }
    }
    reps.iter()
        .fold(BigUint::one(), |acc, rep| acc * rep.as_biguint())
}

/// Computes `G^(Π reps) mod N` with one exponentiation of the full product.
///
/// An empty sequence yields [`AccumulatorValue::empty`].  Repeated
/// representatives are rejected.
pub fn accumulate(setup: &Setup, reps: &[Representative]) -> Result<AccumulatorValue> {
    ensure_distinct(reps)?;
    let exponent = product(reps);
    debug!(
        "accumulating {} representatives, exponent has {} bits",
        reps.len(),
        exponent.bits()
    );
    Ok(AccumulatorValue(
        setup.generator().modpow(&exponent, setup.modulus()),
    ))
}

/// Recovers the accumulator from the first element's witness:
/// `witness_0^rep_0 mod N`.
///
/// This is the second construction path and must agree with [`accumulate`].
/// Both slices must come from the same [`generate_proofs`](crate::generate_proofs)
/// call, so their lengths must match.
pub fn accumulate_from_witness(
    setup: &Setup,
    reps: &[Representative],
    witnesses: &[Witness],
) -> Result<AccumulatorValue> {
    if reps.len() != witnesses.len() {
        return Err(AccumulatorError::LengthMismatch {
            representatives: reps.len(),
            witnesses: witnesses.len(),
        });
    }
    let (rep, witness) = reps
        .first()
        .zip(witnesses.first())
        .ok_or(AccumulatorError::EmptySet)?;
    Ok(AccumulatorValue(
        witness
            .as_biguint()
            .modpow(rep.as_biguint(), setup.modulus()),
    ))
}

/// Appends one representative: `A^rep mod N`.
///
/// This call is stateless and cannot tell whether `rep` was already
/// accumulated; [`RsaAccumulator`](crate::RsaAccumulator) tracks membership
/// for callers that need set semantics.
pub fn update_accumulator(
    value: &AccumulatorValue,
    rep: &Representative,
    setup: &Setup,
) -> AccumulatorValue {
    debug!("updating accumulator with a {}-bit representative", rep.as_biguint().bits());
    AccumulatorValue(value.0.modpow(rep.as_biguint(), setup.modulus()))
}
