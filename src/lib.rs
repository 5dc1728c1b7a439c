//! Forward error correction codecs for simulation of digital links.
//!
//! Two codes are implemented:
//!
//! - a terminated rate 1/2 convolutional code with generators (7, 5) and
//!   soft or hard decision Viterbi decoding, see [convolutional],
//! - shortened systematic Reed-Solomon codes over GF(2^m), m <= 8, with an
//!   algebraic syndrome decoder, see [reed_solomon].
//!
//! All codecs work on unpacked bits, one `u8` with value 0 or 1 per bit.
//! Code objects are immutable after construction and can be shared between
//! threads. The crate is `no_std` but needs `alloc`.
//!
//! Diagnostics of the decoders are emitted through the [log] facade, no
//! logger is installed.
#![no_std]

extern crate alloc;

pub mod bits;
pub mod convolutional;
pub mod galois;
pub mod reed_solomon;

pub use bits::InputError;
pub use convolutional::{ConvolutionalCode, NscError};
pub use galois::{ArithmeticError, Field, GF};
pub use reed_solomon::{ConfigError, Decoded, DecodingError, ReedSolomon};
