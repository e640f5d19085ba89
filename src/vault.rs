//! Entities and the three core operations
//!
//! `Input → gen_params → Params`, `Params + words → gen_secret → Secret`,
//! `Secret + words + count → gen_keys → keys`. All three are pure functions
//! of their arguments (plus OS entropy when no seed bytes are supplied);
//! nothing is cached between calls and failures leave no partial state.
//!
//! The JSON field names on the entity types are normative: they are the
//! interchange format shared with the other implementations of this scheme.
//! Byte fields travel as upper-case hex via the adapters in
//! [`crate::codec`].

#![forbid(unsafe_code)]

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::error::FuzzyError;
use crate::hashing;
use crate::prime::{first_prime_greater_than, is_prime};
use crate::rng::Rng;
use crate::sketch;
use crate::{KEY_LEN, SALT_LEN};

// ============================================================================
// Entities
// ============================================================================

/// Input to parameter generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Number of words in the original and every recovery set.
    pub set_size: usize,
    /// Minimum number of correct matches required for recovery.
    pub correct_threshold: usize,
    /// Size of the corpus the words are drawn from.
    pub corpus_size: u64,
    /// Optional deterministic seed stream (hex lines on the wire).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::opt_hex_lines"
    )]
    pub random_bytes: Option<Vec<u8>>,
}

/// Public parameters: the input plus the derived prime, salt, and extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    /// Number of words in the original and every recovery set.
    pub set_size: usize,
    /// Minimum number of correct matches required for recovery.
    pub correct_threshold: usize,
    /// Size of the corpus the words are drawn from.
    pub corpus_size: u64,
    /// The seed stream, carried through from the input when present.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::opt_hex_lines"
    )]
    pub random_bytes: Option<Vec<u8>>,
    /// Smallest prime strictly greater than the corpus size.
    pub prime: u64,
    /// 32-byte salt for both memory-hard hashes.
    #[serde(with = "codec::hex_bytes")]
    pub salt: Vec<u8>,
    /// `setSize` distinct field elements used by the key extractor.
    pub extractor: Vec<u64>,
}

/// Immutable public recovery state: parameters plus sketch and identity hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Number of words in the original and every recovery set.
    pub set_size: usize,
    /// Minimum number of correct matches required for recovery.
    pub correct_threshold: usize,
    /// Size of the corpus the words are drawn from.
    pub corpus_size: u64,
    /// Smallest prime strictly greater than the corpus size.
    pub prime: u64,
    /// `setSize` distinct field elements used by the key extractor.
    pub extractor: Vec<u64>,
    /// 32-byte salt for both memory-hard hashes.
    #[serde(with = "codec::hex_bytes")]
    pub salt: Vec<u8>,
    /// Top `2·(setSize − correctThreshold)` coefficients of the word
    /// polynomial.
    pub sketch: Vec<u64>,
    /// 64-byte identity hash of the sorted original words.
    #[serde(with = "codec::hex_bytes")]
    pub hash: Vec<u8>,
}

// ============================================================================
// Validation
// ============================================================================

/// Shared count/threshold constraints for (setSize, correctThreshold,
/// corpusSize).
fn validate_config(set_size: usize, correct_threshold: usize, corpus_size: u64) -> Result<(), FuzzyError> {
    if set_size < 1 {
        return Err(FuzzyError::invalid("setSize must be positive"));
    }
    if correct_threshold < 1 || correct_threshold > set_size {
        return Err(FuzzyError::invalid(format!(
            "correctThreshold {correct_threshold} must satisfy 0 < c <= setSize {set_size}"
        )));
    }
    if corpus_size <= set_size as u64 {
        return Err(FuzzyError::invalid(format!(
            "corpusSize {corpus_size} must exceed setSize {set_size}"
        )));
    }
    if 2 * (set_size - correct_threshold) > set_size {
        return Err(FuzzyError::invalid(format!(
            "correctThreshold {correct_threshold} is too small for setSize {set_size}"
        )));
    }
    Ok(())
}

/// Enforce that a word set has exactly `set_size` distinct entries in
/// `[0, corpus_size)`.
pub fn check_words(words: &[u64], set_size: usize, corpus_size: u64) -> Result<(), FuzzyError> {
    if words.len() != set_size {
        return Err(FuzzyError::invalid("incorrect number of words"));
    }
    let distinct: HashSet<u64> = words.iter().copied().collect();
    if distinct.len() != set_size {
        return Err(FuzzyError::invalid("words are not unique"));
    }
    if let Some(w) = words.iter().find(|&&w| w >= corpus_size) {
        return Err(FuzzyError::invalid(format!("word {w} out of range")));
    }
    Ok(())
}

fn validate_derived(
    set_size: usize,
    corpus_size: u64,
    prime: u64,
    salt: &[u8],
    extractor: &[u64],
) -> Result<(), FuzzyError> {
    if !is_prime(prime) {
        return Err(FuzzyError::NotPrime(prime));
    }
    if prime <= corpus_size {
        return Err(FuzzyError::invalid(format!(
            "prime {prime} must exceed corpusSize {corpus_size}"
        )));
    }
    if salt.len() != SALT_LEN {
        return Err(FuzzyError::invalid(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    if extractor.len() != set_size {
        return Err(FuzzyError::invalid(format!(
            "extractor must hold {set_size} entries, got {}",
            extractor.len()
        )));
    }
    if extractor.iter().any(|&e| e >= prime) {
        return Err(FuzzyError::invalid("extractor entry out of field range"));
    }
    let distinct: HashSet<u64> = extractor.iter().copied().collect();
    if distinct.len() != extractor.len() {
        return Err(FuzzyError::invalid("extractor entries are not distinct"));
    }
    Ok(())
}

impl Input {
    /// Check the count and threshold invariants.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        validate_config(self.set_size, self.correct_threshold, self.corpus_size)
    }
}

impl Params {
    /// Check the input invariants plus the derived prime/salt/extractor.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        validate_config(self.set_size, self.correct_threshold, self.corpus_size)?;
        validate_derived(
            self.set_size,
            self.corpus_size,
            self.prime,
            &self.salt,
            &self.extractor,
        )
    }

    fn tau(&self) -> usize {
        2 * (self.set_size - self.correct_threshold)
    }
}

impl Secret {
    /// Check every invariant a well-formed secret satisfies.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        validate_config(self.set_size, self.correct_threshold, self.corpus_size)?;
        validate_derived(
            self.set_size,
            self.corpus_size,
            self.prime,
            &self.salt,
            &self.extractor,
        )?;
        let tau = self.tau();
        if self.sketch.len() != tau {
            return Err(FuzzyError::invalid(format!(
                "sketch must hold {tau} entries, got {}",
                self.sketch.len()
            )));
        }
        if self.sketch.iter().any(|&t| t >= self.prime) {
            return Err(FuzzyError::invalid("sketch entry out of field range"));
        }
        if self.hash.len() != KEY_LEN {
            return Err(FuzzyError::invalid(format!(
                "hash must be {KEY_LEN} bytes, got {}",
                self.hash.len()
            )));
        }
        Ok(())
    }

    fn tau(&self) -> usize {
        2 * (self.set_size - self.correct_threshold)
    }
}

// ============================================================================
// Core operations
// ============================================================================

/// Derive public parameters from an input, deterministically when seed bytes
/// are supplied.
///
/// Draw order is normative: the 32-byte salt first, then the extractor via
/// Fisher–Yates over `[0, prime)`.
pub fn gen_params(input: &Input) -> Result<Params, FuzzyError> {
    input.validate()?;
    let prime = first_prime_greater_than(input.corpus_size)?;
    let mut rng = Rng::new(input.random_bytes.clone());
    let salt = rng.bytes(SALT_LEN)?;
    let extractor = rng.select(prime, input.set_size)?;
    debug!(prime, set_size = input.set_size, "parameters generated");
    Ok(Params {
        set_size: input.set_size,
        correct_threshold: input.correct_threshold,
        corpus_size: input.corpus_size,
        random_bytes: input.random_bytes.clone(),
        prime,
        salt,
        extractor,
    })
}

/// Produce the immutable public recovery state for a set of original words.
pub fn gen_secret(params: &Params, original_words: &[u64]) -> Result<Secret, FuzzyError> {
    params.validate()?;
    check_words(original_words, params.set_size, params.corpus_size)?;

    let sketch = sketch::gen_sketch(original_words, params.prime, params.tau())?;
    let mut sorted = original_words.to_vec();
    sorted.sort_unstable();
    let hash = hashing::hash_words(&sorted, &params.salt)?.to_vec();
    debug!(sketch_len = sketch.len(), "secret generated");

    Ok(Secret {
        set_size: params.set_size,
        correct_threshold: params.correct_threshold,
        corpus_size: params.corpus_size,
        prime: params.prime,
        extractor: params.extractor.clone(),
        salt: params.salt.clone(),
        sketch,
        hash,
    })
}

/// Derive `key_count` keys from a recovery word set.
///
/// An exact guess is accepted by the identity hash alone; otherwise the
/// sketch pipeline reconstructs the original words, and only a
/// reconstruction that re-hashes to the stored identity is used. A
/// `key_count` of zero short-circuits to an empty vector.
pub fn gen_keys(
    secret: &Secret,
    recovery_words: &[u64],
    key_count: usize,
) -> Result<Vec<[u8; KEY_LEN]>, FuzzyError> {
    if key_count == 0 {
        return Ok(Vec::new());
    }
    secret.validate()?;
    check_words(recovery_words, secret.set_size, secret.corpus_size)?;

    let mut sorted = recovery_words.to_vec();
    sorted.sort_unstable();

    let words = if hashing::hash_words(&sorted, &secret.salt)?.as_slice() == &secret.hash[..] {
        debug!("fast path: recovery words accepted verbatim");
        sorted
    } else if secret.tau() == 0 {
        // No sketch: exact match was the only way in.
        return Err(FuzzyError::HashMismatch);
    } else {
        let recovered = sketch::recover_words(secret, &sorted)?;
        if hashing::hash_words(&recovered, &secret.salt)?.as_slice() != &secret.hash[..] {
            return Err(FuzzyError::HashMismatch);
        }
        debug!("slow path: reconstructed words verified");
        recovered
    };

    let ek = hashing::derive_ek(&secret.extractor, &words, secret.prime, &secret.salt)?;
    Ok((0..key_count as u64).map(|k| hashing::derive_key(&ek, k)).collect())
}

// ============================================================================
// Tests
// ============================================================================
