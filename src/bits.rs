//! Validation of the bit and LLR slices handed to the codecs.
//!
//! Both codecs work on unpacked bits, one `u8` per bit with value 0 or 1.
//! Anything else is rejected before any decoding work is done.
use crate::galois::{Field, GF};

/// Problems with caller supplied input buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// The buffer does not have the length the code shape demands.
    WrongLength { expected: usize, actual: usize },
    /// A bit slice contained a value other than 0 or 1.
    InvalidBit { index: usize, value: u8 },
    /// A log-likelihood ratio was NaN or infinite.
    NonFiniteLlr { index: usize },
    /// A symbol is not an element of the code's field.
    InvalidSymbol { index: usize, value: u16 },
}

pub(crate) fn check_len(actual: usize, expected: usize) -> Result<(), InputError> {
    if actual != expected {
        return Err(InputError::WrongLength { expected, actual });
    }
    Ok(())
}

/// Check that `bits` has length `expected` and only contains 0 and 1.
pub(crate) fn check_bits(bits: &[u8], expected: usize) -> Result<(), InputError> {
    check_len(bits.len(), expected)?;
    match bits.iter().position(|b| *b > 1) {
        Some(index) => Err(InputError::InvalidBit {
            index,
            value: bits[index],
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_symbols(
    field: &Field,
    symbols: &[GF],
    expected: usize,
) -> Result<(), InputError> {
    check_len(symbols.len(), expected)?;
    match symbols.iter().position(|s| !field.contains(*s)) {
        Some(index) => Err(InputError::InvalidSymbol {
            index,
            value: symbols[index].0,
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_llrs(llrs: &[f64], expected: usize) -> Result<(), InputError> {
    check_len(llrs.len(), expected)?;
    match llrs.iter().position(|l| !l.is_finite()) {
        Some(index) => Err(InputError::NonFiniteLlr { index }),
        None => Ok(()),
    }
}

#[test]
fn test_check_bits() {
    assert_eq!(check_bits(&[0, 1, 1, 0], 4), Ok(()));
    assert_eq!(
        check_bits(&[0, 1, 1], 4),
        Err(InputError::WrongLength {
            expected: 4,
            actual: 3
        })
    );
    assert_eq!(
        check_bits(&[0, 1, 2, 0], 4),
        Err(InputError::InvalidBit { index: 2, value: 2 })
    );
}

#[test]
fn test_check_llrs() {
    assert_eq!(check_llrs(&[1.5, -0.25], 2), Ok(()));
    assert_eq!(
        check_llrs(&[1.5, f64::NAN], 2),
        Err(InputError::NonFiniteLlr { index: 1 })
    );
    assert_eq!(
        check_llrs(&[f64::NEG_INFINITY], 1),
        Err(InputError::NonFiniteLlr { index: 0 })
    );
}

#[test]
fn test_check_symbols() {
    let field = Field::new(3).unwrap();
    assert_eq!(check_symbols(&field, &[GF(0), GF(7)], 2), Ok(()));
    assert_eq!(
        check_symbols(&field, &[GF(1), GF(8)], 2),
        Err(InputError::InvalidSymbol { index: 1, value: 8 })
    );
}
