//! Sketch construction and word recovery
//!
//! The sketch publishes the top `τ = 2·(s − c)` coefficients of the monic
//! polynomial whose roots are the original words. Those coefficients say
//! nothing useful about any individual word, but together with a guess that
//! matches in at least `c` places they pin the polynomial down completely:
//! the guessed words are evaluation points of the reconstructed "high" part,
//! the Berlekamp–Welch decoder strips the influence of the wrong guesses,
//! and the difference polynomial factors back into exactly the original
//! words, provided it is square-free, which the repeated-root gate checks
//! first.

#![forbid(unsafe_code)]

use tracing::debug;

use crate::decode::berlekamp_welch;
use crate::error::FuzzyError;
use crate::field::Gf;
use crate::poly::Poly;
use crate::vault::Secret;

/// Top `tau` coefficients (below the leading one) of `Π (z − w)` over GF(p).
///
/// `tau` is always even by construction (`2·(s − c)`); the parity check is
/// kept as a guard against malformed callers.
pub fn gen_sketch(words: &[u64], p: u64, tau: usize) -> Result<Vec<u64>, FuzzyError> {
    if tau % 2 != 0 {
        return Err(FuzzyError::invalid("bad error threshold"));
    }
    if tau > words.len() {
        return Err(FuzzyError::invalid(format!(
            "error threshold {tau} exceeds word count {}",
            words.len()
        )));
    }
    let poly = Poly::from_roots(Gf::new(p), words);
    let n = words.len();
    Ok(poly.coeffs()[n - tau..n].to_vec())
}

/// Monic degree-`s` polynomial whose top coefficients are the sketch and
/// whose remaining coefficients are zero.
pub fn p_high(sketch: &[u64], s: usize, p: u64) -> Result<Poly, FuzzyError> {
    if sketch.len() > s {
        return Err(FuzzyError::invalid(format!(
            "sketch length {} exceeds set size {s}",
            sketch.len()
        )));
    }
    let mut coeffs = vec![0u64; s - sketch.len()];
    coeffs.extend_from_slice(sketch);
    coeffs.push(1);
    Ok(Poly::from_coeffs(Gf::new(p), coeffs))
}

/// Reconstruct the original words from an approximate, sorted guess.
///
/// This is the slow path of key recovery: evaluate the reconstructed high
/// part at every guessed word, decode the low-degree remainder, and factor
/// the difference. The caller still has to verify the result against the
/// identity hash.
pub fn recover_words(secret: &Secret, sorted_words: &[u64]) -> Result<Vec<u64>, FuzzyError> {
    let s = secret.set_size;
    let tau = 2 * (s - secret.correct_threshold);
    if sorted_words.len() != s {
        return Err(FuzzyError::invalid(format!(
            "expected {s} recovery words, got {}",
            sorted_words.len()
        )));
    }
    if tau == 0 {
        // Exact-match configuration: there is nothing to correct.
        return Err(FuzzyError::invalid(
            "recovery without a sketch requires an exact match",
        ));
    }

    let high = p_high(&secret.sketch, s, secret.prime)?;
    let beta: Vec<u64> = sorted_words.iter().map(|&w| high.eval(w)).collect();
    let low = berlekamp_welch(sorted_words, &beta, s - tau, tau / 2, secret.prime)?;
    let diff = high.sub(&low);

    if diff.has_repeated_roots() {
        debug!(tau, "difference polynomial is not square-free");
        return Err(FuzzyError::RepeatedRoots);
    }
    let roots = diff.roots()?;
    debug!(candidates = roots.len(), "slow-path root extraction finished");
    Ok(roots)
}

// ============================================================================
// Tests
// ============================================================================
