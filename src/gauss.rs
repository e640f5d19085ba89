//! Gaussian elimination over GF(p)
//!
//! Solves `M · x = y` on an n×(n+1) augmented matrix, taking care with the
//! singular case: the decoder's systems are frequently rank-deficient (the
//! error locator is under-determined when fewer errors occurred than the
//! capacity allows), and any point of the solution set is as good as any
//! other. When the echelon form shows trailing null rows we therefore build
//! a **particular solution** bottom-up from each row's leading one; when it
//! shows an inconsistent row instead, the system has no solution at all.
//!
//! The returned vector always satisfies `M · x = y`; that postcondition is
//! re-verified before returning and a violation is reported as
//! `NoSolution` rather than silently propagated.

#![forbid(unsafe_code)]

use crate::error::FuzzyError;
use crate::field::Gf;

/// Dense matrix over GF(p) in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    gf: Gf,
    rows: usize,
    cols: usize,
    a: Vec<u64>,
}

impl Matrix {
    /// All-zero matrix with the given shape.
    pub fn new(gf: Gf, rows: usize, cols: usize) -> Self {
        Self { gf, rows, cols, a: vec![0; rows * cols] }
    }

    /// Build from row-major entries; reduced mod p.
    pub fn from_rows(gf: Gf, rows: &[Vec<u64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == cols));
        let a = rows.iter().flatten().map(|&v| gf.reduce(v)).collect();
        Self { gf, rows: rows.len(), cols, a }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Entry at `(r, c)`.
    #[inline]
    pub fn at(&self, r: usize, c: usize) -> u64 {
        self.a[r * self.cols + c]
    }

    /// Overwrite entry at `(r, c)` (reduced mod p).
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: u64) {
        self.a[r * self.cols + c] = self.gf.reduce(v);
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for c in 0..self.cols {
            self.a.swap(i * self.cols + c, j * self.cols + c);
        }
    }
}

/// Convert `a` in place to row-echelon form with unit pivots.
///
/// When a pivot column holds only zeros below the pivot row, only the
/// column index advances; the row index stays, exactly like the reference
/// elimination this scheme interoperates with.
fn row_echelon(a: &mut Matrix) {
    let gf = a.gf;
    let (nrows, ncols) = (a.rows, a.cols);
    let mut h = 0; // pivot row
    let mut k = 0; // pivot column
    while h < nrows && k < ncols {
        let pivot = (h..nrows).find(|&i| a.at(i, k) != 0);
        let Some(pivot) = pivot else {
            k += 1;
            continue;
        };
        a.swap_rows(h, pivot);

        let scale = gf.inv(a.at(h, k));
        for c in k..ncols {
            a.set(h, c, gf.mul(a.at(h, c), scale));
        }
        for i in h + 1..nrows {
            let f = a.at(i, k);
            if f == 0 {
                continue;
            }
            a.set(i, k, 0);
            for c in k + 1..ncols {
                a.set(i, c, gf.sub(a.at(i, c), gf.mul(a.at(h, c), f)));
            }
        }
        h += 1;
        k += 1;
    }
}

/// A system in echelon form is singular iff a diagonal entry vanished.
fn is_singular(a: &Matrix) -> bool {
    (0..a.rows).any(|i| a.at(i, i) == 0)
}

/// Back-substitution for the non-singular case; the solution ends up in the
/// augmented column.
fn back_substitute(a: &mut Matrix) {
    let gf = a.gf;
    let last = a.cols - 1;
    for row in (1..a.rows).rev() {
        for above in (0..row).rev() {
            let f = gf.mul(a.at(above, row), a.at(row, last));
            a.set(above, row, 0);
            a.set(above, last, gf.sub(a.at(above, last), f));
        }
    }
}

/// Count all-zero rows at the bottom of an echelon-form matrix.
fn count_null_rows(a: &Matrix) -> usize {
    let mut count = 0;
    for row in (0..a.rows).rev() {
        if (0..a.cols).any(|c| a.at(row, c) != 0) {
            return count;
        }
        count += 1;
    }
    count
}

/// Particular solution of a singular, consistent system; `NoSolution` when
/// the echelon form is inconsistent.
fn solve_singular(a: &mut Matrix) -> Result<Vec<u64>, FuzzyError> {
    let gf = a.gf;
    let (nrows, ncols) = (a.rows, a.cols);
    let null_rows = count_null_rows(a);
    if null_rows == 0 {
        return Err(FuzzyError::NoSolution);
    }

    let mut x = vec![0u64; ncols - 1];
    for row in (0..nrows - null_rows).rev() {
        // Leading entry of a non-null echelon row is a one.
        let col = (0..ncols)
            .find(|&c| a.at(row, c) == 1)
            .ok_or(FuzzyError::NoSolution)?;
        if col == ncols - 1 {
            // 0 = 1: the row is inconsistent.
            return Err(FuzzyError::NoSolution);
        }
        x[col] = a.at(row, ncols - 1);
        for above in (0..row).rev() {
            let f = a.at(above, col);
            if f == 0 {
                continue;
            }
            a.set(above, col, 0);
            for c in col + 1..ncols {
                a.set(above, c, gf.sub(a.at(above, c), gf.mul(f, a.at(row, c))));
            }
        }
    }
    Ok(x)
}

/// Solve `m · x = y` over GF(p).
///
/// Returns a vector satisfying the system (the unique solution when `m` is
/// invertible, otherwise a particular solution), or `NoSolution`.
pub fn solve(m: &Matrix, y: &[u64]) -> Result<Vec<u64>, FuzzyError> {
    let gf = m.gf;
    let n = m.nrows();
    if n == 0 || m.ncols() != n || y.len() != n {
        return Err(FuzzyError::invalid(format!(
            "linear system must be square and matched: {}x{} with {} targets",
            m.nrows(),
            m.ncols(),
            y.len()
        )));
    }

    // Augment [M | y].
    let mut a = Matrix::new(gf, n, n + 1);
    for r in 0..n {
        for c in 0..n {
            a.set(r, c, m.at(r, c));
        }
        a.set(r, n, gf.reduce(y[r]));
    }

    row_echelon(&mut a);
    let x = if is_singular(&a) {
        solve_singular(&mut a)?
    } else {
        back_substitute(&mut a);
        (0..n).map(|r| a.at(r, n)).collect()
    };

    // Postcondition: the particular solution really solves the system.
    for r in 0..n {
        let lhs = (0..n).fold(0u64, |acc, c| gf.add(acc, gf.mul(m.at(r, c), x[c])));
        if lhs != gf.reduce(y[r]) {
            return Err(FuzzyError::NoSolution);
        }
    }
    Ok(x)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn check(m: &Matrix, y: &[u64]) -> Vec<u64> {
        let x = solve(m, y).unwrap();
        let gf = m.gf;
        for r in 0..m.nrows() {
            let lhs = (0..m.ncols()).fold(0, |acc, c| gf.add(acc, gf.mul(m.at(r, c), x[c])));
            assert_eq!(lhs, gf.reduce(y[r]));
        }
        x
    }

    #[test]
    fn non_singular_vandermonde_like_system() {
        let gf = Gf::new(13);
        let m = Matrix::from_rows(
            gf,
            &[
                vec![1, 5, 12, 10, 11],
                vec![1, 7, 10, 2, 1],
                vec![1, 8, 12, 1, 8],
                vec![1, 9, 3, 12, 4],
                vec![1, 10, 9, 11, 6],
            ],
        );
        check(&m, &[10, 6, 1, 3, 5]);
    }

    #[test]
    fn singular_but_consistent_system_yields_a_particular_solution() {
        let gf = Gf::new(13);
        let m = Matrix::from_rows(
            gf,
            &[
                vec![1, 0, 0, 0, 0],
                vec![1, 2, 4, 0, 0],
                vec![1, 3, 9, 0, 0],
                vec![1, 4, 3, 0, 0],
                vec![1, 10, 9, 11, 6],
            ],
        );
        check(&m, &[0, 0, 0, 0, 5]);
    }

    #[test]
    fn duplicated_rows_stay_consistent() {
        let gf = Gf::new(13);
        let m = Matrix::from_rows(
            gf,
            &[
                vec![1, 1, 1, 1],
                vec![1, 1, 1, 1],
                vec![1, 1, 1, 1],
                vec![1, 1, 1, 2],
            ],
        );
        let x = check(&m, &[0, 0, 0, 3]);
        assert_eq!(x.len(), 4);
    }

    #[test]
    fn inconsistent_system_has_no_solution() {
        let gf = Gf::new(5);
        let m = Matrix::from_rows(gf, &[vec![1, 2], vec![2, 4]]);
        assert_eq!(solve(&m, &[1, 3]), Err(FuzzyError::NoSolution));
    }

    #[test]
    fn dependent_rows_with_matching_targets_are_solvable() {
        let gf = Gf::new(7);
        let m = Matrix::from_rows(gf, &[vec![1, 2, 3], vec![2, 4, 6], vec![1, 1, 1]]);
        // Row 2 = 2 × row 1, and the targets agree, so a solution exists.
        check(&m, &[4, 1, 1]);
    }

    #[test]
    fn rejects_shape_mismatches() {
        let gf = Gf::new(7);
        let m = Matrix::from_rows(gf, &[vec![1, 2], vec![3, 4]]);
        assert!(matches!(solve(&m, &[1]), Err(FuzzyError::InvalidInput(_))));
    }
}
