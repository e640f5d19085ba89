//! One error taxonomy for the whole scheme
//!
//! Every fallible operation in the crate surfaces one of these variants.
//! The first two signal caller mistakes; the last three are **expected
//! terminal values** of the recovery pipeline: a guess that cannot be
//! corrected ends in `NoSolution`, `RepeatedRoots`, or `HashMismatch`, and
//! the caller decides whether that is a user-facing "recovery failed" or a
//! security event. None of them unwind; no partial state is left behind.

#![forbid(unsafe_code)]

/// Errors produced by parameter generation, secret generation, and recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FuzzyError {
    /// A count, range, uniqueness, or threshold constraint was violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A parameter that must be prime failed the primality test.
    #[error("{0} is not prime")]
    NotPrime(u64),

    /// The linear system (or the decoder built on it) has no consistent
    /// solution.
    #[error("no solution exists")]
    NoSolution,

    /// The difference polynomial has repeated roots; recovery abandoned.
    #[error("repeated roots have been detected")]
    RepeatedRoots,

    /// The recovered word set fails the identity check.
    #[error("hashes do not match")]
    HashMismatch,
}

impl FuzzyError {
    /// Convenience constructor for `InvalidInput` with a formatted reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        FuzzyError::InvalidInput(reason.into())
    }
}
