#![deny(missing_docs)]

//! # rsa_accumulator
//!
//! An RSA accumulator compresses a set of items into one integer modulo an
//! RSA modulus `N` of unknown factorization.  Any member can later show a
//! short witness proving it was accumulated, without revealing the rest of
//! the set.
//!
//! ## Pipeline
//!
//! * **Setup**: the [`Setup`] value carries `N`, the generator `G` and a
//!   reserved auxiliary generator.  It is validated once and threaded
//!   explicitly through every call; [`obtain_setup`] returns the fixed
//!   2048-bit parameters and [`SetupSource`] lets other ceremonies plug in.
//! * **Hash-to-prime**: [`encode_to_prime`] hashes bytes and walks upward to
//!   the next probable prime, under a bounded search.
//! * **Representatives**: [`generate_representatives`] encodes an ordered
//!   item list under an [`EncodingScheme`].
//! * **Accumulation**: [`accumulate`] computes `G^(Π r_i) mod N` with a single
//!   exponentiation; [`update_accumulator`] appends one representative.
//! * **Witnesses**: [`generate_proofs`] returns `G^(Π r_j / r_i) mod N` for
//!   every element and [`verify`] checks `w^r ≡ A (mod N)`.
//!
//! ## Usage
//!
//! ```rust
//! use rsa_accumulator::{
//!     accumulate, generate_proofs, generate_representatives, obtain_setup,
//!     update_accumulator, verify, EncodingScheme,
//! };
//!
//! let setup = obtain_setup().unwrap();
//! let reps = generate_representatives(&["Alice", "Bob"], EncodingScheme::default()).unwrap();
//! let value = accumulate(&setup, &reps).unwrap();
//! let witnesses = generate_proofs(&setup, &reps).unwrap();
//! assert!(verify(&witnesses[0], &reps[0], &setup, &value));
//!
//! let carol = generate_representatives(&["Carol"], EncodingScheme::default()).unwrap();
//! let updated = update_accumulator(&value, &carol[0], &setup);
//! assert!(!verify(&witnesses[0], &reps[0], &setup, &updated));
//! ```
//!
//! Deletion and non-membership proofs are not provided.

mod accumulator;
mod codec;
mod error;
mod prime;
mod prng;
mod representative;
mod session;
mod setup;
mod witness;

pub use accumulator::{
    accumulate, accumulate_from_witness, product, update_accumulator, AccumulatorValue,
};
pub use codec::{biguint_from_hex, biguint_to_hex};
pub use error::{AccumulatorError, Result};
pub use prime::{
    encode_to_prime, hash_to_prime, is_probable_prime, next_prime_bounded, EncoderConfig,
    DEFAULT_MAX_INCREMENTS, DEFAULT_MR_ROUNDS,
};
pub use representative::{
    ensure_distinct, find_duplicate, generate_representatives, generate_representatives_with,
    EncodingScheme, Representative, PARALLEL_THRESHOLD,
};
pub use session::{
    accumulate_and_prove, accumulate_and_prove_with, accumulate_items, accumulate_items_with,
    RsaAccumulator,
};
pub use setup::{obtain_setup, FixedSetup, Setup, SetupSource, RSA_BIT_LENGTH};
pub use witness::{generate_proof_at, generate_proofs, verify, MembershipProof, Witness};

/// Re-exported so callers can build setups and inspect values without a
/// direct `num-bigint` dependency.
pub use num_bigint::BigUint;
