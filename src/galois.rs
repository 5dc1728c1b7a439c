//! Arithmetic in the finite fields GF(2^m) for 1 <= m <= 8.
//!
//! An element is stored as an integer whose bits are the coefficients of a
//! polynomial of degree less than m, the least significant bit being the
//! coefficient for 1. For example, in GF(8):
//!
//! > 6 = 0b110 = x^2 + x.
//!
//! Addition is done coefficient by coefficient, so it is a plain XOR.
//!
//! Multiplication is polynomial multiplication modulo a fixed primitive
//! polynomial of degree m. Because the polynomial is primitive, the powers
//! 1, x, x^2, ..., x^(2^m - 2) run through all nonzero elements. We call
//! this generator α. Any nonzero element a is α^i for exactly one i, its
//! logarithm, and a product becomes a sum of logarithms:
//!
//! > a * b = α^i * α^j = α^(i + j).
//!
//! The two lookup tables `exp` and `log` implement this. `exp` is stored
//! twice in a row so that `exp[log a + log b]` never needs a modulo.
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest supported field degree m.
pub const MAX_DEGREE: u8 = 8;

/// Number of nonzero elements of the largest supported field.
pub const MAX_ORDER: usize = (1 << MAX_DEGREE) - 1;

/// Primitive polynomials used for the reduction, indexed by degree.
///
/// The bit for x^m is included, e.g. 0x11D = x^8 + x^4 + x^3 + x^2 + 1.
const PRIMITIVE_POLYNOMIALS: [u16; MAX_DEGREE as usize + 1] =
    [0x00, 0x03, 0x07, 0x0B, 0x13, 0x25, 0x43, 0x89, 0x11D];

/// An element of GF(2^m).
///
/// Addition does not depend on m, so it is available as an operator.
/// Everything else needs the tables of a [Field].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GF(pub u16);

impl GF {
    pub const ZERO: GF = GF(0);
    pub const ONE: GF = GF(1);

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for GF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GF({})", self.0)
    }
}

impl Add<GF> for GF {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        GF(self.0 ^ rhs.0)
    }
}

impl AddAssign<GF> for GF {
    fn add_assign(&mut self, rhs: GF) {
        *self = *self + rhs;
    }
}

impl Sub<GF> for GF {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl SubAssign<GF> for GF {
    fn sub_assign(&mut self, rhs: GF) {
        *self = *self - rhs;
    }
}

impl Neg for GF {
    type Output = Self;

    fn neg(self) -> Self {
        self
    }
}

impl Sum for GF {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(GF::ZERO, |a, b| a + b)
    }
}

/// Operations which are undefined for the zero element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    DivisionByZero,
    LogOfZero,
}

/// Lookup tables for one field GF(2^m).
///
/// The tables are built once and never change, a `&Field` can be shared
/// freely between threads.
#[derive(Clone)]
pub struct Field {
    degree: u8,
    order: usize,
    exp: [u16; 2 * MAX_ORDER],
    log: [u16; MAX_ORDER + 1],
    symbol_bits: [[u8; MAX_DEGREE as usize]; MAX_ORDER + 1],
}

impl Field {
    /// Build the tables for GF(2^degree).
    ///
    /// Returns `None` if the degree is not in `1..=8`.
    pub fn new(degree: u8) -> Option<Self> {
        if degree == 0 || degree > MAX_DEGREE {
            return None;
        }
        let order = (1usize << degree) - 1;
        let primitive = PRIMITIVE_POLYNOMIALS[degree as usize];
        let mut exp = [0u16; 2 * MAX_ORDER];
        let mut log = [0u16; MAX_ORDER + 1];

        // LFSR: multiply by x and reduce whenever the x^m bit shows up
        let mut x: u16 = 1;
        for i in 0..order {
            exp[i] = x;
            log[x as usize] = i as u16;
            x <<= 1;
            if x & (1 << degree) != 0 {
                x ^= primitive;
            }
        }
        for i in order..2 * order {
            exp[i] = exp[i - order];
        }

        let mut symbol_bits = [[0u8; MAX_DEGREE as usize]; MAX_ORDER + 1];
        for (value, bits) in symbol_bits.iter_mut().enumerate().take(order + 1) {
            for (b, bit) in bits.iter_mut().enumerate().take(degree as usize) {
                *bit = ((value >> b) & 1) as u8;
            }
        }

        Some(Self {
            degree,
            order,
            exp,
            log,
            symbol_bits,
        })
    }

    /// The degree m of the field.
    pub fn degree(&self) -> u8 {
        self.degree
    }

    /// Number of nonzero elements, 2^m - 1.
    ///
    /// This is also the length of the full (unshortened) Reed-Solomon code.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of elements, 2^m.
    pub fn size(&self) -> usize {
        self.order + 1
    }

    pub fn contains(&self, a: GF) -> bool {
        (a.0 as usize) <= self.order
    }

    /// Return α^i, `i` is reduced modulo the order.
    pub fn exp(&self, i: usize) -> GF {
        GF(self.exp[i % self.order])
    }

    pub fn log(&self, a: GF) -> Result<usize, ArithmeticError> {
        if a.is_zero() {
            return Err(ArithmeticError::LogOfZero);
        }
        Ok(self.log[a.0 as usize] as usize)
    }

    pub fn add(&self, a: GF, b: GF) -> GF {
        a + b
    }

    pub fn mul(&self, a: GF, b: GF) -> GF {
        if a.is_zero() || b.is_zero() {
            return GF::ZERO;
        }
        let i = self.log[a.0 as usize] as usize + self.log[b.0 as usize] as usize;
        GF(self.exp[i])
    }

    pub fn div(&self, a: GF, b: GF) -> Result<GF, ArithmeticError> {
        if b.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        if a.is_zero() {
            return Ok(GF::ZERO);
        }
        let i = self.log[a.0 as usize] as usize + self.order - self.log[b.0 as usize] as usize;
        Ok(GF(self.exp[i]))
    }

    /// Multiplicative inverse, α^(order - log a).
    pub fn inv(&self, a: GF) -> Result<GF, ArithmeticError> {
        if a.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(GF(self.exp[self.order - self.log[a.0 as usize] as usize]))
    }

    /// Compute `base^power`. Negative powers of zero are a division by zero.
    pub fn pow(&self, base: GF, power: i64) -> Result<GF, ArithmeticError> {
        if power == 0 {
            return Ok(GF::ONE);
        }
        if base.is_zero() {
            return if power > 0 {
                Ok(GF::ZERO)
            } else {
                Err(ArithmeticError::DivisionByZero)
            };
        }
        let order = self.order as i64;
        let i = (self.log[base.0 as usize] as i64 * power.rem_euclid(order)) % order;
        Ok(GF(self.exp[i as usize]))
    }

    /// Evaluate the polynomial with coefficients `poly`, lowest power first,
    /// at `x` (Horner's scheme).
    pub fn eval(&self, poly: &[GF], x: GF) -> GF {
        poly.iter()
            .rev()
            .fold(GF::ZERO, |acc, c| self.mul(acc, x) + *c)
    }

    /// The m bits of `a`, least significant bit first.
    pub fn symbol_bits(&self, a: GF) -> &[u8] {
        &self.symbol_bits[a.0 as usize][..self.degree as usize]
    }

    /// Write the bits of every symbol into `bits`, m bits per symbol.
    pub(crate) fn symbols_to_bits(&self, symbols: &[GF], bits: &mut [u8]) {
        let m = self.degree as usize;
        debug_assert_eq!(symbols.len() * m, bits.len());
        for (s, chunk) in symbols.iter().zip(bits.chunks_exact_mut(m)) {
            chunk.copy_from_slice(self.symbol_bits(*s));
        }
    }

    /// Pack m bits, least significant first, into a symbol.
    pub fn bits_to_symbol(&self, bits: &[u8]) -> GF {
        debug_assert_eq!(bits.len(), self.degree as usize);
        GF(bits
            .iter()
            .enumerate()
            .fold(0, |v, (i, b)| v | (((*b & 1) as u16) << i)))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Field")
            .field("degree", &self.degree)
            .field("primitive", &PRIMITIVE_POLYNOMIALS[self.degree as usize])
            .finish()
    }
}

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn all_fields() -> impl Iterator<Item = Field> {
    (1..=MAX_DEGREE).filter_map(Field::new)
}

#[test]
fn unsupported_degrees() {
    assert!(Field::new(0).is_none());
    assert!(Field::new(9).is_none());
}

#[test]
fn sanity_check_tables() {
    use alloc::collections::BTreeSet;

    for field in all_fields() {
        let n = field.order();
        let powers: BTreeSet<u16> = (0..n).map(|i| field.exp(i).0).collect();
        assert_eq!(powers.len(), n, "degree {}", field.degree());
        assert!(!powers.contains(&0));

        for i in 0..n {
            assert_eq!(field.log(field.exp(i)), Ok(i));
            assert_eq!(field.exp[i], field.exp[i + n]);
        }
        for a in 1..=n as u16 {
            assert_eq!(field.exp(field.log(GF(a)).unwrap()), GF(a));
        }
    }
}

#[test]
fn gf8_powers() {
    let field = Field::new(3).unwrap();
    let powers: Vec<u16> = (0..8).map(|i| field.exp(i).0).collect();
    assert_eq!(powers, [1, 2, 4, 3, 6, 7, 5, 1]);
}

#[test]
fn gf256_mul() {
    let field = Field::new(8).unwrap();
    assert_eq!(field.mul(GF(123), GF(1)), GF(123));
    assert_eq!(field.mul(GF(234), GF(0)), GF(0));
    assert_eq!(field.mul(GF(0), GF(23)), GF(0));
    let product = [GF(4), GF(8), GF(16), GF(32)]
        .iter()
        .fold(GF(2), |acc, x| field.mul(acc, *x));
    assert_eq!(product, GF(38));
    assert_eq!(field.exp(8), GF(0x1D));
}

#[test]
fn inverse_law() {
    for field in all_fields() {
        for a in 1..=field.order() as u16 {
            let inv = field.inv(GF(a)).unwrap();
            assert_eq!(field.mul(inv, GF(a)), GF::ONE, "degree {}", field.degree());
        }
        assert_eq!(field.inv(GF::ZERO), Err(ArithmeticError::DivisionByZero));
    }
}

#[test]
fn div_mul() {
    for field in all_fields() {
        let size = field.size() as u16;
        for a in 0..size {
            for b in 1..size {
                let a_div_b = field.div(GF(a), GF(b)).unwrap();
                assert_eq!(field.mul(a_div_b, GF(b)), GF(a));
            }
            assert_eq!(
                field.div(GF(a), GF::ZERO),
                Err(ArithmeticError::DivisionByZero)
            );
        }
    }
}

#[test]
fn pow_matches_repeated_mul() {
    let field = Field::new(5).unwrap();
    for a in 0..32 {
        let mut expected = GF::ONE;
        for p in 0..70 {
            assert_eq!(field.pow(GF(a), p), Ok(expected), "{}^{}", a, p);
            expected = field.mul(expected, GF(a));
        }
    }
    assert_eq!(field.pow(GF(7), -1), field.inv(GF(7)));
    assert_eq!(field.pow(GF(0), -2), Err(ArithmeticError::DivisionByZero));
    assert_eq!(field.log(GF(0)), Err(ArithmeticError::LogOfZero));
}

#[test]
fn eval_horner() {
    let field = Field::new(3).unwrap();
    // x^2 + 1 = (x + 1)^2
    let poly = [GF(1), GF(0), GF(1)];
    assert_eq!(field.eval(&poly, GF(1)), GF(0));
    assert_eq!(field.eval(&poly, GF(2)), GF(5));
    assert_eq!(field.eval(&poly, GF(0)), GF(1));
    assert_eq!(field.eval(&[], GF(3)), GF(0));
}

#[test]
fn symbol_bits_lsb_first() {
    let field = Field::new(4).unwrap();
    assert_eq!(field.symbol_bits(GF(0b1101)), &[1, 0, 1, 1]);
    for a in 0..16 {
        assert_eq!(field.bits_to_symbol(field.symbol_bits(GF(a))), GF(a));
    }

    let mut bits = [0u8; 8];
    field.symbols_to_bits(&[GF(1), GF(8)], &mut bits);
    assert_eq!(bits, [1, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn add_is_xor() {
    let field = Field::new(4).unwrap();
    assert_eq!(field.add(GF(0b1010), GF(0b0110)), GF(0b1100));
    for a in 0..16 {
        assert_eq!(field.add(GF(a), GF(a)), GF::ZERO);
        assert_eq!(field.add(GF(a), GF::ZERO), GF(a));
    }
}

#[test]
fn test_neg() {
    for a in 0..256 {
        let a = GF(a);
        assert_eq!(a + -a, GF::ZERO);
        assert_eq!(a - a, GF::ZERO);
    }
}
