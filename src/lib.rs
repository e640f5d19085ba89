//! Crate root: public surface, shared constants, and scheme-wide invariants
//!
//! This module is the **single canonical entry-point** for downstream users of
//! the library. It re-exports the three core operations (`gen_params`,
//! `gen_secret`, `gen_keys`), the entity types they exchange, and the shared
//! error taxonomy.
//!
//! ## Invariants (scheme-wide)
//!
//! - **Field.** All polynomial and matrix arithmetic happens in GF(p) for a
//!   prime `p` that fits in 64 bits; `p` is the smallest prime strictly
//!   greater than the corpus size, so every word is a field element.
//!   Multiplications widen to 128 bits, so primes near 2^33 stay exact.
//! - **Determinism.** With caller-supplied seed bytes, `gen_params` is a pure
//!   function of its input: the salt is drawn first (32 bytes), then the
//!   extractor (4 bytes per word, little-endian u32, Fisher–Yates with the
//!   historical modulo bias). Key derivation is deterministic everywhere.
//! - **Canonical encodings.** The strings fed to the memory-hard hash
//!   (`"original_words:[w0, w1, …]"` and `"key:<decimal>"`) are
//!   byte-for-byte stable; changing their spacing or bracket style breaks
//!   every previously issued `Secret`.
//! - **Failure mode.** Every reachable failure is a precise
//!   [`FuzzyError`]: recovery-time dead ends (`NoSolution`,
//!   `RepeatedRoots`, `HashMismatch`) are ordinary return values, never
//!   panics, and no partial state is observable afterwards.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Shared error taxonomy for every fallible operation in the crate.
pub mod error;
/// GF(p) scalar arithmetic for 64-bit primes (128-bit intermediates).
pub mod field;
/// Deterministic Miller–Rabin primality testing and next-prime search.
pub mod prime;
/// Deterministic byte/u32 stream and Fisher–Yates selection.
pub mod rng;
/// Dense polynomials over GF(p): arithmetic, divmod, gcd, root finding.
pub mod poly;
/// Gaussian elimination over GF(p), tolerant of singular systems.
pub mod gauss;
/// Berlekamp–Welch error-correcting decoder.
pub mod decode;
/// Sketch construction and word recovery from approximate matches.
pub mod sketch;
/// Canonical hash-input encodings, scrypt identity hash, HMAC-SHA-512 KDF.
pub mod hashing;
/// Upper-case hex codec and serde adapters for the JSON surface.
pub mod codec;
/// The entity types and the three core operations.
pub mod vault;

pub use crate::error::FuzzyError;
pub use crate::vault::{gen_keys, gen_params, gen_secret, Input, Params, Secret};

/// Salt length in bytes, fixed by the parameter format.
pub const SALT_LEN: usize = 32;

/// Output length of the memory-hard hash and of every derived key, in bytes.
pub const KEY_LEN: usize = 64;
