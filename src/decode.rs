//! Berlekamp–Welch decoding
//!
//! Recovers a message polynomial of degree < k from `n = k + 2t` evaluations
//! of which up to `t` may be wrong. The classic linear system is built over
//! GF(p): unknowns are the k+t coefficients of `Q = P·E` and the t low
//! coefficients of the monic error locator `E`; row i encodes
//! `Q(a_i) = b_i · E(a_i)`. Any solution with at most `t` actual errors
//! yields the same exact quotient `Q / E`. A non-zero remainder, like an
//! unsolvable system, means the received word lies beyond the decoder's
//! correction radius.

#![forbid(unsafe_code)]

use crate::error::FuzzyError;
use crate::field::Gf;
use crate::gauss::{self, Matrix};
use crate::poly::Poly;
use crate::prime::is_prime;

/// Powers `1, a, a², …, a^(count−1)` mod p, with the convention `0^0 = 1`.
fn powers(gf: Gf, a: u64, count: usize) -> Vec<u64> {
    let mut out = Vec::with_capacity(count);
    let mut acc = 1u64;
    for _ in 0..count {
        out.push(acc);
        acc = gf.mul(acc, a);
    }
    out
}

/// Decode the unique polynomial of degree < `k` agreeing with `b` on all
/// but at most `t` of the query points `a`.
///
/// The query points must be pairwise distinct field elements; `n = k + 2t`
/// must equal the number of points. Fails with `NoSolution` when no
/// degree-bounded polynomial explains the received values.
pub fn berlekamp_welch(
    a: &[u64],
    b: &[u64],
    k: usize,
    t: usize,
    p: u64,
) -> Result<Poly, FuzzyError> {
    if a.is_empty() {
        return Err(FuzzyError::invalid("no query points"));
    }
    if a.len() != b.len() {
        return Err(FuzzyError::invalid(format!(
            "query/value length mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if k < 1 || t < 1 {
        return Err(FuzzyError::invalid(format!(
            "k={k} and t={t} are not consistent"
        )));
    }
    if a.len() != k + 2 * t {
        return Err(FuzzyError::invalid(format!(
            "expected n = k + 2t = {} points, got {}",
            k + 2 * t,
            a.len()
        )));
    }
    if !is_prime(p) {
        return Err(FuzzyError::NotPrime(p));
    }

    let gf = Gf::new(p);
    let n = a.len();

    let mut m = Matrix::new(gf, n, n);
    let mut y = vec![0u64; n];
    for i in 0..n {
        let ai = gf.reduce(a[i]);
        let bi = gf.reduce(b[i]);
        let apow = powers(gf, ai, k + t);
        for (j, &pw) in apow.iter().enumerate() {
            m.set(i, j, pw);
        }
        for j in 0..t {
            m.set(i, k + t + j, gf.mul(gf.neg(bi), apow[j]));
        }
        y[i] = gf.mul(bi, apow[t]);
    }

    let x = gauss::solve(&m, &y)?;

    let q = Poly::from_coeffs(gf, x[..k + t].to_vec());
    let mut e_coeffs = x[k + t..].to_vec();
    e_coeffs.push(1); // monic of degree t
    let e = Poly::from_coeffs(gf, e_coeffs);

    let (message, remainder) = q.divmod(&e)?;
    if !remainder.is_zero() {
        return Err(FuzzyError::NoSolution);
    }
    Ok(message)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Evaluate `poly` at each point, then corrupt the listed positions.
    fn received(poly: &Poly, points: &[u64], corrupt: &[(usize, u64)]) -> Vec<u64> {
        let mut b: Vec<u64> = points.iter().map(|&x| poly.eval(x)).collect();
        for &(idx, val) in corrupt {
            b[idx] = val;
        }
        b
    }

    #[test]
    fn textbook_decode_over_gf_929() {
        // Message 1 + 2z + 3z², seven points, two corrupted positions.
        let gf = Gf::new(929);
        let message = Poly::from_coeffs(gf, vec![1, 2, 3]);
        let a: Vec<u64> = (0..7).collect();
        let b = received(&message, &a, &[(1, 123), (4, 500)]);
        let decoded = berlekamp_welch(&a, &b, 3, 2, 929).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn error_free_words_exercise_the_singular_path() {
        // With zero actual errors the locator is under-determined; the
        // particular solution must still divide out to the message.
        let gf = Gf::new(929);
        let message = Poly::from_coeffs(gf, vec![7, 0, 11]);
        let a: Vec<u64> = (10..17).collect();
        let b = received(&message, &a, &[]);
        let decoded = berlekamp_welch(&a, &b, 3, 2, 929).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn single_error_with_unit_capacity() {
        let gf = Gf::new(7789);
        let message = Poly::from_coeffs(gf, vec![5, 3, 0, 1]);
        let a = [2u64, 3, 5, 7, 11, 13];
        let b = received(&message, &a, &[(2, 0)]);
        let decoded = berlekamp_welch(&a, &b, 4, 1, 7789).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn overloaded_word_is_rejected() {
        // Values drawn from a degree-3 "high" polynomial with only one of
        // three points on the code; worked instance over GF(7) whose unique
        // system solution leaves a non-zero remainder.
        let a = [1u64, 4, 5];
        let b = [6u64, 5, 2];
        assert_eq!(berlekamp_welch(&a, &b, 1, 1, 7), Err(FuzzyError::NoSolution));
    }

    #[test]
    fn validates_shapes_and_modulus() {
        assert!(matches!(
            berlekamp_welch(&[], &[], 1, 1, 7),
            Err(FuzzyError::InvalidInput(_))
        ));
        assert!(matches!(
            berlekamp_welch(&[1, 2, 3], &[1, 2], 1, 1, 7),
            Err(FuzzyError::InvalidInput(_))
        ));
        assert!(matches!(
            berlekamp_welch(&[1, 2, 3], &[1, 2, 3], 0, 1, 7),
            Err(FuzzyError::InvalidInput(_))
        ));
        assert!(matches!(
            berlekamp_welch(&[1, 2, 3, 4], &[1, 2, 3, 4], 1, 1, 7),
            Err(FuzzyError::InvalidInput(_))
        ));
        assert_eq!(
            berlekamp_welch(&[1, 2, 3], &[1, 2, 3], 1, 1, 6),
            Err(FuzzyError::NotPrime(6))
        );
    }
}
