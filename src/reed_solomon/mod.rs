//! Shortened systematic Reed-Solomon codes over GF(2^m).
//!
//! A Reed-Solomon code with `T` parity symbols adds redundancy to `K`
//! information symbols such that up to `t = T / 2` wrong symbols can be
//! corrected. The full (parent) code over GF(2^m) has length `Np = 2^m - 1`.
//! Shorter codes, `N < Np`, are obtained by _shortening_: the first
//! `S = Np - N` information symbols are implicitly zero and never sent.
//!
//! Encoding is systematic, a codeword is the information followed by the
//! parity symbols. The parity is the remainder of a polynomial division by
//! the generator polynomial, computed with a shift register.
//!
//! The generator polynomial is
//!
//! > g(x) = (x - α^0) (x - α^1) ... (x - α^(T-1)),
//!
//! scaled such that its _constant_ coefficient is one instead of the usual
//! leading one. The shift register reads the coefficients in reverse, so it
//! really divides by the reciprocal polynomial, which is monic after this
//! scaling. Encoder and decoder are built for each other, the scaling must
//! not be changed on one side only.
//!
//! The decoder is _syndrome_ based, the `decoding` module describes the
//! steps.
//!
//! ```rust
//! # use fecodec::reed_solomon::ReedSolomon;
//! // RS(7, 3) over GF(8), corrects two symbol errors
//! let code = ReedSolomon::new(3, 7, 3).unwrap();
//! let info = [1, 0, 0, 0, 1, 0, 1, 1, 0];
//! let codeword = code.encode(&info).unwrap();
//!
//! let mut received = codeword.clone();
//! received[0] ^= 1;
//! received[20] ^= 1;
//! let decoded = code.decode(&received).unwrap();
//! assert_eq!(decoded.info, info);
//! assert_eq!(decoded.codeword, codeword);
//! ```
mod decoding;

#[cfg(test)]
mod tests;

use alloc::{vec, vec::Vec};
use arrayvec::ArrayVec;
use core::iter::repeat;

use crate::bits::{self, InputError};
use crate::galois::{Field, GF, MAX_ORDER};

pub use decoding::DecodingError;

/// Coefficients of a polynomial over the field, lowest power first.
pub(crate) type Poly = ArrayVec<GF, { MAX_ORDER + 1 }>;

/// Symbols of a word of at most full length.
pub(crate) type Word = ArrayVec<GF, MAX_ORDER>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Only GF(2^m) with 1 <= m <= 8 is supported.
    UnsupportedFieldDegree(u8),
    /// The codeword length exceeds the parent length `2^m - 1`.
    FieldTooSmall { n: usize, max: usize },
    /// Needs `0 < k < n`.
    InvalidDimensions { n: usize, k: usize },
}

/// Result of a successful decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The corrected codeword bits, `N * m`.
    pub codeword: Vec<u8>,
    /// The information bits, `K * m`. A prefix of `codeword`.
    pub info: Vec<u8>,
    /// Number of symbols that were corrected.
    pub corrected: usize,
}

/// A shortened Reed-Solomon code with its field and generator polynomial.
///
/// Construct it once and share it, it is never modified.
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    field: Field,
    n: usize,
    k: usize,
    generator: Poly,
}

impl ReedSolomon {
    /// Code of length `n` with `k` information symbols over GF(2^m).
    ///
    /// The number of parity symbols is `n - k`.
    pub fn new(m: u8, n: usize, k: usize) -> Result<Self, ConfigError> {
        let field = Field::new(m).ok_or(ConfigError::UnsupportedFieldDegree(m))?;
        if n > field.order() {
            return Err(ConfigError::FieldTooSmall {
                n,
                max: field.order(),
            });
        }
        if k == 0 || k >= n {
            return Err(ConfigError::InvalidDimensions { n, k });
        }
        let generator = generator_polynomial(&field, n - k);
        log::debug!(
            "RS({}, {}) over GF(2^{}), shortened by {}",
            n,
            k,
            m,
            field.order() - n
        );
        Ok(Self {
            field,
            n,
            k,
            generator,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Codeword length `N` in symbols.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of information symbols `K`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of parity symbols `T = N - K`.
    pub fn parity_len(&self) -> usize {
        self.n - self.k
    }

    /// Number of implicit zero symbols `S = 2^m - 1 - N`.
    pub fn shortening(&self) -> usize {
        self.field.order() - self.n
    }

    /// Number of symbol errors which can always be corrected, `T / 2`.
    pub fn max_errors(&self) -> usize {
        self.parity_len() / 2
    }

    /// The generator polynomial, lowest power first, `g[0] = 1`.
    pub fn generator(&self) -> &[GF] {
        &self.generator
    }

    /// Encode `K * m` information bits into `N * m` codeword bits.
    pub fn encode(&self, info_bits: &[u8]) -> Result<Vec<u8>, InputError> {
        let m = self.field.degree() as usize;
        bits::check_bits(info_bits, self.k * m)?;
        let data: Word = info_bits
            .chunks_exact(m)
            .map(|c| self.field.bits_to_symbol(c))
            .collect();
        let mut parity: Word = repeat(GF::ZERO).take(self.parity_len()).collect();
        self.encode_symbols(&data, &mut parity)?;

        let mut code = vec![0; self.n * m];
        let (info_part, parity_part) = code.split_at_mut(self.k * m);
        self.field.symbols_to_bits(&data, info_part);
        self.field.symbols_to_bits(&parity, parity_part);
        Ok(code)
    }

    /// Compute the `T` parity symbols for `K` information symbols.
    pub fn encode_symbols(&self, data: &[GF], parity: &mut [GF]) -> Result<(), InputError> {
        bits::check_symbols(&self.field, data, self.k)?;
        bits::check_len(parity.len(), self.parity_len())?;

        // Let d be the data polynomial and g* the reciprocal of the generator.
        // The register ends up holding the remainder r of
        //
        //     d(x) * x^T = q(x) g*(x) + r(x),
        //
        // highest power first, so d(x) * x^T - r(x) is divisible by g*.
        // Shortened symbols are zero and shifted through first.
        parity.fill(GF::ZERO);
        for _ in 0..self.shortening() {
            self.shift(parity, GF::ZERO);
        }
        for a in data {
            self.shift(parity, *a);
        }
        Ok(())
    }

    fn shift(&self, register: &mut [GF], input: GF) {
        let t = register.len();
        let g = &self.generator;
        let feedback = register[0] + input;
        for j in 0..t - 1 {
            register[j] = register[j + 1] + self.field.mul(feedback, g[j + 1]);
        }
        register[t - 1] = self.field.mul(feedback, g[t]);
    }

    /// Decode `N * m` received bits.
    ///
    /// Fails if the errors could not be corrected. Nothing is returned in
    /// that case, callers wanting the raw information can take the first
    /// `K * m` received bits.
    pub fn decode(&self, recv_bits: &[u8]) -> Result<Decoded, DecodingError> {
        let m = self.field.degree() as usize;
        bits::check_bits(recv_bits, self.n * m)?;
        let mut word: Word = recv_bits
            .chunks_exact(m)
            .map(|c| self.field.bits_to_symbol(c))
            .collect();
        let corrected = self.decode_symbols(&mut word)?;

        let mut codeword = vec![0; self.n * m];
        self.field.symbols_to_bits(&word, &mut codeword);
        let info = codeword[..self.k * m].to_vec();
        Ok(Decoded {
            codeword,
            info,
            corrected,
        })
    }

    /// Correct the `N` symbols in `received` in-place.
    ///
    /// Returns the number of corrected symbols. On error `received` is left
    /// as it was.
    pub fn decode_symbols(&self, received: &mut [GF]) -> Result<usize, DecodingError> {
        bits::check_symbols(&self.field, received, self.n)?;
        let shortening = self.shortening();
        let mut parent: Word = repeat(GF::ZERO)
            .take(shortening)
            .chain(received.iter().cloned())
            .collect();
        let corrected = decoding::correct(self, &mut parent)?;
        received.copy_from_slice(&parent[shortening..]);
        Ok(corrected)
    }
}

/// Compute (x - α^0) ... (x - α^(len-1)) and scale it to `g[0] = 1`.
fn generator_polynomial(field: &Field, len: usize) -> Poly {
    let mut g = Poly::new();
    g.push(GF::ONE);
    for i in 0..len {
        let root = field.exp(i);
        g.push(GF::ZERO);
        for j in (1..g.len()).rev() {
            g[j] = g[j - 1] - field.mul(g[j], root);
        }
        g[0] = -field.mul(g[0], root);
    }
    let scale = field
        .inv(g[0])
        .expect("constant term is a product of powers of α, this is a bug");
    for c in g.iter_mut() {
        *c = field.mul(*c, scale);
    }
    g
}
