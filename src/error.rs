//! Error taxonomy shared by every accumulator operation.
//!
//! A failed membership check is not an error: [`verify`](crate::verify)
//! returns `false`.  The variants below cover malformed inputs, bounded
//! searches that ran out, and internal invariant violations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AccumulatorError>;

/// Errors raised while building, proving against or decoding accumulators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    #[error("invalid setup: {reason}")]
    /// The modulus or one of the generators is not usable.
    InvalidSetup {
        /// Which check failed.
        reason: String,
    },
    #[error("hash-to-prime search gave up after {increments} increments")]
    /// No prime was found within the configured search bound.
    EncodingNonTermination {
        /// Number of candidates examined before giving up.
        increments: u64,
    },
    #[error("representative {index} does not divide the aggregate product")]
    /// Exact division failed during witness computation.  This is a defect,
    /// never an expected outcome.
    DivisionMismatch {
        /// Position of the offending representative.
        index: usize,
    },
    #[error("unknown encoding scheme: {0}")]
    /// A scheme identifier did not name a supported encoding.
    UnknownEncodingScheme(String),
    #[error("duplicate representative at positions {first} and {second}")]
    /// Two items mapped to the same representative.
    DuplicateRepresentative {
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeated occurrence.
        second: usize,
    },
    #[error("{representatives} representatives but {witnesses} witnesses")]
    /// Representatives and witnesses were supplied in unequal numbers.
    LengthMismatch {
        /// Number of representatives.
        representatives: usize,
        /// Number of witnesses.
        witnesses: usize,
    },
    #[error("operation requires at least one element")]
    /// The operation is undefined for an empty set.
    EmptySet,
    #[error("item is not a member of the accumulator")]
    /// A proof was requested for an item that was never added.
    NotAMember,
    #[error("index {index} out of range for {len} elements")]
    /// A positional lookup was past the end of the set.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of elements available.
        len: usize,
    },
    #[error("membership proof rejected")]
    /// A witness did not verify against the accumulator value.
    MembershipRejected,
    #[error("invalid integer encoding: {0}")]
    /// A textual big integer could not be parsed.
    InvalidInteger(String),
    #[error("codec error: {0}")]
    /// A JSON document was malformed or incomplete.
    Codec(String),
    #[error("invalid configuration: {0}")]
    /// An environment override could not be parsed.
    InvalidConfig(String),
}

impl AccumulatorError {
    pub(crate) fn invalid_setup(reason: impl Into<String>) -> Self {
        AccumulatorError::InvalidSetup {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AccumulatorError {
    fn from(err: serde_json::Error) -> Self {
        AccumulatorError::Codec(err.to_string())
    }
}

impl From<hex::FromHexError> for AccumulatorError {
    fn from(err: hex::FromHexError) -> Self {
        AccumulatorError::InvalidInteger(err.to_string())
    }
}
