//! The Berlekamp-Massey (BM) algorithm for finding the error locator.
//!
//! BM finds the shortest linear feedback shift register generating the
//! syndrome sequence. Its connection polynomial is the error locator σ.
use crate::galois::{ArithmeticError, Field, GF};
use crate::reed_solomon::Poly;

/// Compute σ from the syndromes `syn`.
///
/// Returns the coefficients σ_0, ..., σ_t (lowest power first) and the
/// length `L` of the shift register. If `L > t` the polynomial is cut
/// after σ_t and the caller should not trust it. σ_0 is always one.
pub(super) fn error_locator(
    field: &Field,
    syn: &[GF],
    t: usize,
) -> Result<(Poly, usize), ArithmeticError> {
    let n = syn.len();
    let mut cur = Poly::new(); // current connection polynomial
    cur.extend(core::iter::repeat(GF::ZERO).take(n + 1));
    cur[0] = GF::ONE;
    let mut prev = cur.clone(); // connection polynomial before last length change
    let mut len_lfsr = 0;
    let mut shift = 1;
    let mut discrepancy_m = GF::ONE; // discrepancy at the last length change

    for k in 0..n {
        let discrepancy = syn[k]
            + (1..=len_lfsr)
                .map(|i| field.mul(cur[i], syn[k - i]))
                .sum::<GF>();
        if discrepancy.is_zero() {
            shift += 1;
            continue;
        }

        let before = cur.clone();
        let coef = field.div(discrepancy, discrepancy_m)?;
        for (ci, pj) in cur[shift..].iter_mut().zip(prev.iter()) {
            *ci -= field.mul(coef, *pj);
        }
        if 2 * len_lfsr <= k {
            len_lfsr = k + 1 - len_lfsr;
            prev = before;
            discrepancy_m = discrepancy;
            shift = 1;
        } else {
            shift += 1;
        }
    }

    let mut sigma = Poly::new();
    sigma.extend(
        cur.iter()
            .take(len_lfsr.min(t) + 1)
            .cloned()
            .chain(core::iter::repeat(GF::ZERO))
            .take(t + 1),
    );
    if sigma[0].is_zero() {
        sigma[0] = GF::ONE;
    }
    log::trace!("BM: L = {}, sigma {:?}", len_lfsr, sigma.as_slice());
    Ok((sigma, len_lfsr))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn syndromes_of(field: &Field, errors: &[(usize, GF)], len: usize) -> alloc::vec::Vec<GF> {
    (0..len)
        .map(|i| {
            errors
                .iter()
                .map(|(p, e)| field.mul(*e, field.exp(i * p)))
                .sum::<GF>()
        })
        .collect()
}

#[test]
fn test_single_error() {
    let field = Field::new(8).unwrap();
    let syn = syndromes_of(&field, &[(17, GF(99))], 8);
    let (sigma, len) = error_locator(&field, &syn, 4).unwrap();
    assert_eq!(len, 1);
    assert_eq!(sigma.as_slice(), &[GF(1), field.exp(17), GF(0), GF(0), GF(0)]);
}

#[test]
fn test_locator_has_error_zeros() {
    let field = Field::new(6).unwrap();
    let errors = [(2, GF(7)), (30, GF(1)), (41, GF(60))];
    let syn = syndromes_of(&field, &errors, 6);
    let (sigma, len) = error_locator(&field, &syn, 3).unwrap();
    assert_eq!(len, 3);
    assert_eq!(sigma[0], GF::ONE);
    for (p, _) in errors {
        // σ(α^(-p)) = 0
        let x = field.exp(field.order() - p);
        let value: GF = sigma
            .iter()
            .enumerate()
            .map(|(i, s)| field.mul(*s, field.pow(x, i as i64).unwrap()))
            .sum();
        assert_eq!(value, GF::ZERO, "position {}", p);
    }
}

#[test]
fn test_too_many_errors() {
    let field = Field::new(4).unwrap();
    let errors = [(1, GF(3)), (4, GF(9)), (7, GF(1)), (11, GF(12))];
    let syn = syndromes_of(&field, &errors, 4);
    let (sigma, len) = error_locator(&field, &syn, 2).unwrap();
    // four errors, but only four syndromes
    assert_eq!(sigma.len(), 3);
    assert_eq!(len, 2);
}
