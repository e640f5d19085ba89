//! Dense polynomials over GF(p)
//!
//! Coefficients are stored little-endian (index 0 is the constant term) and
//! kept normalized: no trailing zeros, and the zero polynomial is the empty
//! vector. Degrees in this scheme stay tiny (at most the word-set size), so
//! schoolbook multiplication and Euclidean division are the right tools; the
//! only super-linear work is `pow_mod`, which raises to exponents as large
//! as the field characteristic in O(log p) modular multiplications.
//!
//! Root finding targets **square-free** inputs. The linear-factor product is
//! extracted with `gcd(f, z^p − z)` and then split by a deterministic
//! equal-degree walk: for δ = 0, 1, 2, … compute
//! `gcd(g, (z+δ)^((p−1)/2) − 1)` until a proper divisor falls out. The walk
//! terminates for any product of distinct linear factors because two
//! distinct roots r ≠ r′ disagree on the quadratic character of `r+δ` for
//! some shift δ.

#![forbid(unsafe_code)]

use crate::error::FuzzyError;
use crate::field::Gf;

/// A polynomial over GF(p), normalized little-endian coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    gf: Gf,
    coeffs: Vec<u64>,
}

impl Poly {
    /// The zero polynomial.
    pub fn zero(gf: Gf) -> Self {
        Self { gf, coeffs: Vec::new() }
    }

    /// Build from little-endian coefficients; entries are reduced mod p and
    /// trailing zeros trimmed.
    pub fn from_coeffs(gf: Gf, coeffs: Vec<u64>) -> Self {
        let mut coeffs: Vec<u64> = coeffs.into_iter().map(|c| gf.reduce(c)).collect();
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { gf, coeffs }
    }

    /// The monic product `Π (z − w)` over the given roots.
    pub fn from_roots(gf: Gf, roots: &[u64]) -> Self {
        let mut acc = Self::from_coeffs(gf, vec![1]);
        for &w in roots {
            acc = acc.mul(&Self::from_coeffs(gf, vec![gf.neg(w), 1]));
        }
        acc
    }

    /// The arithmetic context this polynomial lives in.
    #[inline]
    pub fn field(&self) -> Gf {
        self.gf
    }

    /// Normalized little-endian coefficients (empty for zero).
    #[inline]
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficient of `z^i`, zero beyond the degree.
    #[inline]
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// True for the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree, `None` for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Leading coefficient, zero for the zero polynomial.
    #[inline]
    pub fn leading(&self) -> u64 {
        self.coeffs.last().copied().unwrap_or(0)
    }

    /// Horner evaluation at `x`.
    pub fn eval(&self, x: u64) -> u64 {
        let gf = self.gf;
        let mut acc = 0u64;
        for &c in self.coeffs.iter().rev() {
            acc = gf.add(gf.mul(acc, x), c);
        }
        acc
    }

    /// Pointwise sum.
    pub fn add(&self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.gf, rhs.gf);
        let gf = self.gf;
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..n).map(|i| gf.add(self.coeff(i), rhs.coeff(i))).collect();
        Poly::from_coeffs(gf, coeffs)
    }

    /// Pointwise difference.
    pub fn sub(&self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.gf, rhs.gf);
        let gf = self.gf;
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..n).map(|i| gf.sub(self.coeff(i), rhs.coeff(i))).collect();
        Poly::from_coeffs(gf, coeffs)
    }

    /// Schoolbook product.
    pub fn mul(&self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.gf, rhs.gf);
        let gf = self.gf;
        if self.is_zero() || rhs.is_zero() {
            return Poly::zero(gf);
        }
        let mut coeffs = vec![0u64; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] = gf.add(coeffs[i + j], gf.mul(a, b));
            }
        }
        Poly::from_coeffs(gf, coeffs)
    }

    /// Scale every coefficient by `c`.
    pub fn mul_scalar(&self, c: u64) -> Poly {
        let gf = self.gf;
        Poly::from_coeffs(gf, self.coeffs.iter().map(|&a| gf.mul(a, c)).collect())
    }

    /// Divide by the leading coefficient; zero stays zero.
    pub fn monic(&self) -> Poly {
        match self.leading() {
            0 | 1 => self.clone(),
            lead => self.mul_scalar(self.gf.inv(lead)),
        }
    }

    /// Euclidean division: `self = q·d + r` with `deg r < deg d`.
    pub fn divmod(&self, d: &Poly) -> Result<(Poly, Poly), FuzzyError> {
        debug_assert_eq!(self.gf, d.gf);
        let gf = self.gf;
        let dd = d
            .degree()
            .ok_or_else(|| FuzzyError::invalid("division by the zero polynomial"))?;
        let sd = match self.degree() {
            Some(sd) if sd >= dd => sd,
            _ => return Ok((Poly::zero(gf), self.clone())),
        };

        let lead_inv = gf.inv(d.leading());
        let mut rem = self.coeffs.clone();
        let mut quot = vec![0u64; sd - dd + 1];
        for i in (0..=sd - dd).rev() {
            let c = gf.mul(rem[i + dd], lead_inv);
            quot[i] = c;
            if c == 0 {
                continue;
            }
            for (j, &dc) in d.coeffs.iter().enumerate() {
                rem[i + j] = gf.sub(rem[i + j], gf.mul(c, dc));
            }
        }
        Ok((Poly::from_coeffs(gf, quot), Poly::from_coeffs(gf, rem)))
    }

    /// Formal derivative.
    pub fn derivative(&self) -> Poly {
        let gf = self.gf;
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| gf.mul(c, (i as u64) % gf.modulus()))
            .collect();
        Poly::from_coeffs(gf, coeffs)
    }

    /// Monic greatest common divisor.
    pub fn gcd(a: &Poly, b: &Poly) -> Poly {
        let mut a = a.clone();
        let mut b = b.clone();
        while !b.is_zero() {
            let (_, r) = a.divmod(&b).expect("divisor is non-zero");
            a = b;
            b = r;
        }
        a.monic()
    }

    /// `base^e mod m` by square-and-multiply.
    pub fn pow_mod(base: &Poly, mut e: u64, m: &Poly) -> Result<Poly, FuzzyError> {
        if m.degree().is_none() {
            return Err(FuzzyError::invalid("modulus polynomial is zero"));
        }
        let gf = base.gf;
        let mut b = base.divmod(m)?.1;
        let mut acc = Poly::from_coeffs(gf, vec![1]).divmod(m)?.1;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&b).divmod(m)?.1;
            }
            b = b.mul(&b).divmod(m)?.1;
            e >>= 1;
        }
        Ok(acc)
    }

    /// True when the polynomial shares a factor with its derivative, i.e.
    /// has a repeated root over the algebraic closure.
    pub fn has_repeated_roots(&self) -> bool {
        let d = self.derivative();
        if d.is_zero() {
            // Degree >= 1 with a vanishing derivative means every exponent is
            // a multiple of p; such inputs never occur here but are repeated.
            return self.degree().map_or(false, |n| n > 0);
        }
        Poly::gcd(self, &d).degree().map_or(false, |n| n > 0)
    }

    /// All distinct roots in `[0, p)`, ascending. The input must be
    /// square-free and non-zero.
    pub fn roots(&self) -> Result<Vec<u64>, FuzzyError> {
        let gf = self.gf;
        let p = gf.modulus();
        if self.is_zero() {
            return Err(FuzzyError::invalid("cannot take roots of the zero polynomial"));
        }

        let mut f = self.monic();
        let mut out = Vec::new();
        if f.degree() == Some(0) {
            return Ok(out);
        }
        if f.coeff(0) == 0 {
            out.push(0);
            let z = Poly::from_coeffs(gf, vec![0, 1]);
            f = f.divmod(&z)?.0;
        }
        if let Some(d) = f.degree() {
            if d > 0 {
                // Product of the distinct non-zero linear factors of f.
                let z = Poly::from_coeffs(gf, vec![0, 1]);
                let zp = Poly::pow_mod(&z, p, &f)?;
                let linear = Poly::gcd(&f, &zp.sub(&z));
                split_linear(&linear, &mut out)?;
            }
        }
        out.sort_unstable();
        Ok(out)
    }
}

/// Split a monic product of distinct linear factors into its roots with a
/// deterministic sequence of quadratic-character shifts.
fn split_linear(g: &Poly, out: &mut Vec<u64>) -> Result<(), FuzzyError> {
    let gf = g.field();
    let deg = match g.degree() {
        None | Some(0) => return Ok(()),
        Some(1) => {
            out.push(gf.neg(g.coeff(0)));
            return Ok(());
        }
        Some(deg) => deg,
    };

    let p = gf.modulus();
    let half = (p - 1) / 2;
    for delta in 0..p {
        let shifted = Poly::from_coeffs(gf, vec![delta, 1]);
        let w = Poly::pow_mod(&shifted, half, g)?;
        let w_minus_one = w.sub(&Poly::from_coeffs(gf, vec![1]));
        let h = Poly::gcd(g, &w_minus_one);
        if let Some(d) = h.degree() {
            if d > 0 && d < deg {
                let rest = g.divmod(&h)?.0;
                split_linear(&h, out)?;
                split_linear(&rest, out)?;
                return Ok(());
            }
        }
    }
    // Unreachable for genuine products of distinct linear factors.
    Err(FuzzyError::NoSolution)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn gf() -> Gf {
        Gf::new(7789)
    }

    #[test]
    fn normalization_trims_trailing_zeros() {
        let f = Poly::from_coeffs(gf(), vec![3, 0, 5, 0, 0]);
        assert_eq!(f.coeffs(), &[3, 0, 5]);
        assert_eq!(f.degree(), Some(2));
        assert!(Poly::from_coeffs(gf(), vec![0, 0]).is_zero());
    }

    #[test]
    fn from_roots_vanishes_exactly_at_roots() {
        let roots = [1u64, 5, 100, 2500];
        let f = Poly::from_roots(gf(), &roots);
        assert_eq!(f.degree(), Some(4));
        assert_eq!(f.leading(), 1);
        for &r in &roots {
            assert_eq!(f.eval(r), 0);
        }
        assert_ne!(f.eval(2), 0);
    }

    #[test]
    fn divmod_satisfies_the_euclidean_identity() {
        let a = Poly::from_coeffs(gf(), vec![3, 1, 4, 1, 5, 9, 2, 6]);
        let d = Poly::from_coeffs(gf(), vec![7, 1, 8, 2]);
        let (q, r) = a.divmod(&d).unwrap();
        assert!(r.degree() < d.degree());
        assert_eq!(q.mul(&d).add(&r), a);
        assert!(a.divmod(&Poly::zero(gf())).is_err());
    }

    #[test]
    fn gcd_of_overlapping_products_is_the_common_part() {
        let g = gf();
        let a = Poly::from_roots(g, &[1, 2, 3]);
        let b = Poly::from_roots(g, &[2, 3, 4]).mul_scalar(5);
        let d = Poly::gcd(&a, &b);
        assert_eq!(d, Poly::from_roots(g, &[2, 3]));
        // gcd with zero is the (monic) other argument
        assert_eq!(Poly::gcd(&a, &Poly::zero(g)), a);
    }

    #[test]
    fn pow_mod_matches_naive_exponentiation() {
        let g = Gf::new(101);
        let base = Poly::from_coeffs(g, vec![3, 1]);
        let m = Poly::from_coeffs(g, vec![1, 0, 0, 1]);
        let mut naive = Poly::from_coeffs(g, vec![1]);
        for e in 0..20u64 {
            assert_eq!(Poly::pow_mod(&base, e, &m).unwrap(), naive.divmod(&m).unwrap().1);
            naive = naive.mul(&base);
        }
    }

    #[test]
    fn repeated_root_detection() {
        let g = gf();
        let single = Poly::from_roots(g, &[1, 2, 3]);
        assert!(!single.has_repeated_roots());
        let doubled = Poly::from_roots(g, &[1, 1, 2]);
        assert!(doubled.has_repeated_roots());
    }

    #[test]
    fn roots_of_a_linear_product_are_recovered() {
        let roots = [0u64, 1, 12, 110, 7788];
        let f = Poly::from_roots(gf(), &roots).mul_scalar(42);
        let mut expected = roots.to_vec();
        expected.sort_unstable();
        assert_eq!(f.roots().unwrap(), expected);
    }

    #[test]
    fn roots_ignore_irreducible_cofactors() {
        // (z - 4)(z - 9) times an irreducible quadratic: z^2 + 1 over GF(103)
        // (103 ≡ 3 mod 4, so -1 is a non-residue).
        let g = Gf::new(103);
        let f = Poly::from_roots(g, &[4, 9]).mul(&Poly::from_coeffs(g, vec![1, 0, 1]));
        assert_eq!(f.roots().unwrap(), vec![4, 9]);
    }

    #[test]
    fn roots_agree_with_exhaustive_search() {
        let g = Gf::new(101);
        let f = Poly::from_coeffs(g, vec![13, 57, 0, 88, 1, 9]);
        let brute: Vec<u64> = (0..101).filter(|&x| f.eval(x) == 0).collect();
        if !f.has_repeated_roots() {
            assert_eq!(f.roots().unwrap(), brute);
        }
    }

    #[test]
    fn constant_polynomials_have_no_roots() {
        assert_eq!(Poly::from_coeffs(gf(), vec![5]).roots().unwrap(), Vec::<u64>::new());
        assert!(Poly::zero(gf()).roots().is_err());
    }
}
