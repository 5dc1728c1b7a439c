//! Syndrome based decoding of the shortened Reed-Solomon codes.
//!
//! The decoder always works on the full (parent) length `Np`, the shortened
//! symbols are put back as zeros in front of the received word. With the
//! parent word `r = (r_0, ..., r_(Np-1))` the steps are
//!
//! 1. Compute the syndromes `S_i = r(α^i)` for `i = 0, ..., T - 1`. If they
//!    are all zero, `r` is a codeword and nothing is to be done.
//! 2. Find the error locator polynomial σ with the Berlekamp-Massey algorithm.
//!    For errors at positions `p_1, ..., p_v` it is
//!    `σ(x) = (1 - α^(p_1) x) ... (1 - α^(p_v) x)`.
//! 3. Find the zeros of σ by trying all `α^(-p)` (Chien search).
//! 4. With known positions the syndromes are linear in the error values,
//!
//!    > S_i = e_1 α^(i p_1) + ... + e_v α^(i p_v),
//!
//!    which is solved directly by Gauss-Jordan elimination.
//! 5. Subtract the error values and compute the syndromes again. If they do
//!    not vanish now, there were too many errors.
//!
//! Errors found inside the shortened prefix can not be real, they indicate
//! a decoding failure as well.
mod berlekamp_massey;

use alloc::{vec, vec::Vec};
use arrayvec::ArrayVec;

use super::{ReedSolomon, Word};
use crate::bits::InputError;
use crate::galois::{ArithmeticError, Field, GF, MAX_ORDER};

/// Largest number of errors a code over GF(256) can correct.
const MAX_ERRORS: usize = MAX_ORDER / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingError {
    Input(InputError),
    /// Error locations were found in the implicit zero symbols of the
    /// shortened code.
    ///
    /// This usually means there were a lot of transmission errors, uncorrectable.
    ErrorsOutsideRange,
    /// The syndromes did not vanish after correction, too many errors.
    Uncorrectable,
    Arithmetic(ArithmeticError),
}

impl From<InputError> for DecodingError {
    fn from(err: InputError) -> Self {
        DecodingError::Input(err)
    }
}

impl From<ArithmeticError> for DecodingError {
    fn from(err: ArithmeticError) -> Self {
        DecodingError::Arithmetic(err)
    }
}

type Syndromes = ArrayVec<GF, MAX_ORDER>;

/// Correct the parent length word `parent` in-place.
///
/// Returns the number of corrected symbols. On error `parent` is in an
/// unspecified state.
pub(super) fn correct(code: &ReedSolomon, parent: &mut Word) -> Result<usize, DecodingError> {
    let field = code.field();
    let t = code.max_errors();
    debug_assert_eq!(parent.len(), field.order());

    let syndromes = compute_syndromes(field, parent, code.parity_len());
    if syndromes.iter().all(|s| s.is_zero()) {
        return Ok(0);
    }
    log::trace!("syndromes {:?}", syndromes.as_slice());

    let (sigma, degree) = berlekamp_massey::error_locator(field, &syndromes, t)?;
    let degree = degree.min(t);
    let positions = chien_search(field, &sigma, degree);
    log::trace!(
        "locator degree {}, error positions {:?}",
        degree,
        positions.as_slice()
    );

    let count = positions.len();
    if count == 0 || count > t {
        log::debug!("{} roots for {} syndromes, giving up", count, syndromes.len());
        return Err(DecodingError::Uncorrectable);
    }
    if positions.iter().any(|p| *p < code.shortening()) {
        return Err(DecodingError::ErrorsOutsideRange);
    }

    // A[r][c] = α^(r p_c), b[r] = S_r
    let mut mat = vec![GF::ZERO; count * count];
    let mut magnitudes: Vec<GF> = syndromes[..count].to_vec();
    for r in 0..count {
        for (c, p) in positions.iter().enumerate() {
            mat[r * count + c] = field.exp(r * p);
        }
    }
    let skipped = solve(field, &mut mat, &mut magnitudes, count)?;
    if skipped > 0 {
        log::debug!("magnitude system singular, skipped {} pivots", skipped);
    }
    log::trace!("error values {:?}", magnitudes.as_slice());

    for (p, e) in positions.iter().zip(magnitudes.iter()) {
        parent[*p] -= *e;
    }

    if compute_syndromes(field, parent, code.parity_len())
        .iter()
        .any(|s| !s.is_zero())
    {
        return Err(DecodingError::Uncorrectable);
    }
    Ok(count)
}

/// Evaluate the word at α^0, α^1, ..., α^(len - 1).
///
/// The symbol at index `j` is the coefficient of x^j.
fn compute_syndromes(field: &Field, word: &[GF], len: usize) -> Syndromes {
    (0..len).map(|i| field.eval(word, field.exp(i))).collect()
}

/// Find the positions `p` with σ(α^(-p)) = 0 for `p = 0, ..., Np - 1`.
///
/// Stops after `degree` zeros were found.
fn chien_search(field: &Field, sigma: &[GF], degree: usize) -> ArrayVec<usize, MAX_ERRORS> {
    let mut positions = ArrayVec::new();
    if degree == 0 {
        return positions;
    }
    let n = field.order();
    for p in 0..n {
        let x_inv = field.exp(n - p);
        let mut power = GF::ONE;
        let mut value = GF::ZERO;
        for s in &sigma[..=degree] {
            value += field.mul(*s, power);
            power = field.mul(power, x_inv);
        }
        if value.is_zero() {
            positions.push(p);
            if positions.len() == degree || positions.is_full() {
                break;
            }
        }
    }
    positions
}

/// Solve the linear system `mat` * x = `b` for x using Gauss-Jordan
/// elimination, the solution is written to `b`.
///
/// `mat` is square with `row_stride` columns and is destroyed. A zero pivot
/// is replaced by swapping in a lower row. If there is none, the column is
/// skipped and its entry of `b` left as is. Returns the number of skipped
/// columns, zero for a nonsingular system.
fn solve(
    field: &Field,
    mat: &mut [GF],
    b: &mut [GF],
    row_stride: usize,
) -> Result<usize, ArithmeticError> {
    let n = b.len();
    let c = |i: usize, j: usize| i * row_stride + j;
    let mut skipped = 0;
    for i in 0..n {
        if mat[c(i, i)].is_zero() {
            if let Some(i_nz) = (i + 1..n).find(|k| !mat[c(*k, i)].is_zero()) {
                b.swap(i, i_nz);
                for j in 0..n {
                    mat.swap(c(i, j), c(i_nz, j));
                }
            } else {
                skipped += 1;
                continue;
            }
        }

        let inv = field.inv(mat[c(i, i)])?;
        for j in 0..n {
            mat[c(i, j)] = field.mul(mat[c(i, j)], inv);
        }
        b[i] = field.mul(b[i], inv);

        for k in (0..n).filter(|k| *k != i) {
            let factor = mat[c(k, i)];
            if factor.is_zero() {
                continue;
            }
            for j in 0..n {
                let m_ij = mat[c(i, j)];
                mat[c(k, j)] -= field.mul(factor, m_ij);
            }
            let b_i = b[i];
            b[k] -= field.mul(factor, b_i);
        }
    }
    Ok(skipped)
}

#[cfg(test)]
fn gf256() -> Field {
    Field::new(8).unwrap()
}

#[cfg(test)]
fn mul_add(field: &Field, row: &[GF], x: &[GF]) -> GF {
    row.iter().zip(x.iter()).map(|(a, b)| field.mul(*a, *b)).sum()
}

#[test]
fn test_syndromes_of_polynomial() {
    let field = gf256();
    // x^2 + 1 at α^0, α^1, α^2
    let word = [GF(1), GF(0), GF(1)];
    let syn = compute_syndromes(&field, &word, 3);
    assert_eq!(syn[0], GF(0));
    assert_eq!(syn[1], field.exp(2) + GF::ONE);
    assert_eq!(syn[2], field.exp(4) + GF::ONE);
}

#[test]
fn test_chien_search_finds_positions() {
    let field = gf256();
    // σ(x) = (1 - α^3 x)(1 - α^200 x)
    let a = field.exp(3);
    let b = field.exp(200);
    let sigma = [GF::ONE, a + b, field.mul(a, b)];
    let positions = chien_search(&field, &sigma, 2);
    assert_eq!(positions.as_slice(), &[3, 200]);

    assert!(chien_search(&field, &sigma, 0).is_empty());
}

#[test]
fn test_chien_search_no_roots() {
    let field = Field::new(3).unwrap();
    // x^2 + x + 1 has no zeros in GF(8)
    let sigma = [GF(1), GF(1), GF(1)];
    assert!(chien_search(&field, &sigma, 2).is_empty());
}

#[test]
fn test_solve_1x1() {
    let field = gf256();
    let mut mat = vec![GF(5)];
    let mut b = [GF(88)];
    assert_eq!(solve(&field, &mut mat, &mut b, 1), Ok(0));
    assert_eq!(field.mul(GF(5), b[0]), GF(88));
}

#[test]
fn test_solve_2x2() {
    let field = gf256();
    let rows = [[GF(2), GF(1)], [GF(5), GF(2)]];
    let rhs = [GF(56), GF(23)];
    let mut mat: Vec<GF> = rows.iter().flatten().cloned().collect();
    let mut b = rhs;
    assert_eq!(solve(&field, &mut mat, &mut b, 2), Ok(0));
    for (row, r) in rows.iter().zip(rhs.iter()) {
        assert_eq!(mul_add(&field, row, &b), *r);
    }
}

#[test]
fn test_solve_3x3_permute() {
    let field = gf256();
    let rows = [
        [GF(0), GF(0), GF(8)],
        [GF(89), GF(0), GF(2)],
        [GF(45), GF(10), GF(5)],
    ];
    let rhs = [GF(126), GF(23), GF(99)];
    let mut mat: Vec<GF> = rows.iter().flatten().cloned().collect();
    let mut b = rhs;
    assert_eq!(solve(&field, &mut mat, &mut b, 3), Ok(0));
    for (row, r) in rows.iter().zip(rhs.iter()) {
        assert_eq!(mul_add(&field, row, &b), *r);
    }
}

#[test]
fn test_solve_2x2_singular() {
    let field = gf256();
    // second row is twice the first one
    let mut mat = vec![GF(2), GF(1), GF(4), GF(2)];
    let mut b = [GF(56), GF(23)];
    assert_eq!(solve(&field, &mut mat, &mut b, 2), Ok(1));
}
