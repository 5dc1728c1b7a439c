//! Terminated rate 1/2 non-systematic convolutional (NSC) code.
//!
//! A block of `K` information bits is followed by two zero tail bits which
//! drive the encoder back into its start state. Every input bit produces two
//! output bits, so a codeword has `N = 2 * (K + 2)` bits. The state machine
//! is described in [trellis].
//!
//! Decoding is done with the Viterbi algorithm, either on hard decisions
//! (bits) or soft decisions (log-likelihood ratios of BPSK symbols, where a
//! positive value favours bit 0).
//!
//! ```rust
//! # use fecodec::convolutional::ConvolutionalCode;
//! let code = ConvolutionalCode::new(4);
//! let codeword = code.encode(&[1, 0, 1, 1]).unwrap();
//! assert_eq!(codeword, [1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 1, 1]);
//!
//! let mut received = codeword.clone();
//! received[3] ^= 1;
//! assert_eq!(code.decode_hard(&received).unwrap(), [1, 0, 1, 1]);
//! ```
pub mod trellis;
mod viterbi;


use alloc::{vec, vec::Vec};

use crate::bits::{self, InputError};
use trellis::{Bit, State};

/// Number of zero bits appended to terminate the trellis.
pub const TAIL_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NscError {
    Input(InputError),
    /// The decoder could not allocate its path memory.
    OutOfMemory,
}

impl From<InputError> for NscError {
    fn from(err: InputError) -> Self {
        NscError::Input(err)
    }
}

/// Lengths of a terminated NSC code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionalCode {
    info_len: usize,
}

impl ConvolutionalCode {
    /// Code for blocks of `info_len` information bits.
    pub fn new(info_len: usize) -> Self {
        Self { info_len }
    }

    /// Number of information bits `K`.
    pub fn info_len(&self) -> usize {
        self.info_len
    }

    pub fn tail_len(&self) -> usize {
        TAIL_LEN
    }

    /// Number of code bits `N = 2 * (K + 2)`.
    pub fn code_len(&self) -> usize {
        2 * self.steps()
    }

    /// Number of trellis steps, one per input bit including the tail.
    pub(crate) fn steps(&self) -> usize {
        self.info_len + TAIL_LEN
    }

    /// Encode `data` (`K` bits) into a terminated codeword (`N` bits).
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, NscError> {
        let mut code = vec![0; self.code_len()];
        self.encode_into(data, &mut code)?;
        Ok(code)
    }

    /// Encode `data` into `code`, which must hold exactly `N` bits.
    pub fn encode_into(&self, data: &[u8], code: &mut [u8]) -> Result<(), NscError> {
        bits::check_bits(data, self.info_len)?;
        bits::check_len(code.len(), self.code_len())?;

        let input = data
            .iter()
            .map(|b| Bit::from_value(*b))
            .chain([Bit::Zero; TAIL_LEN]);
        let mut state = State::START;
        for (bit, out) in input.zip(code.chunks_exact_mut(2)) {
            out.copy_from_slice(&state.output(bit));
            state = state.next(bit);
        }
        debug_assert_eq!(state, State::START);
        Ok(())
    }

    /// Soft decision Viterbi decoding of `N` log-likelihood ratios.
    pub fn decode_soft(&self, llr: &[f64]) -> Result<Vec<u8>, NscError> {
        let mut info = vec![0; self.info_len];
        self.decode_soft_into(llr, &mut info, None)?;
        Ok(info)
    }

    /// Soft decision decoding into `info_hat` (`K` bits).
    ///
    /// If `code_hat` is given, the decoded information is encoded again
    /// into it, e.g. to count channel bit errors.
    pub fn decode_soft_into(
        &self,
        llr: &[f64],
        info_hat: &mut [u8],
        code_hat: Option<&mut [u8]>,
    ) -> Result<(), NscError> {
        bits::check_llrs(llr, self.code_len())?;
        self.check_outputs(info_hat, &code_hat)?;
        viterbi::decode(self, viterbi::soft_metric(llr), info_hat)?;
        self.reencode(info_hat, code_hat)
    }

    /// Hard decision Viterbi decoding of `N` received bits.
    pub fn decode_hard(&self, rx_bits: &[u8]) -> Result<Vec<u8>, NscError> {
        let mut info = vec![0; self.info_len];
        self.decode_hard_into(rx_bits, &mut info, None)?;
        Ok(info)
    }

    /// Hard decision decoding into `info_hat`, see [decode_soft_into](Self::decode_soft_into).
    pub fn decode_hard_into(
        &self,
        rx_bits: &[u8],
        info_hat: &mut [u8],
        code_hat: Option<&mut [u8]>,
    ) -> Result<(), NscError> {
        bits::check_bits(rx_bits, self.code_len())?;
        self.check_outputs(info_hat, &code_hat)?;
        viterbi::decode(self, viterbi::hard_metric(rx_bits), info_hat)?;
        self.reencode(info_hat, code_hat)
    }

    fn check_outputs(
        &self,
        info_hat: &[u8],
        code_hat: &Option<&mut [u8]>,
    ) -> Result<(), NscError> {
        bits::check_len(info_hat.len(), self.info_len)?;
        if let Some(code_hat) = code_hat {
            bits::check_len(code_hat.len(), self.code_len())?;
        }
        Ok(())
    }

    fn reencode(&self, info_hat: &[u8], code_hat: Option<&mut [u8]>) -> Result<(), NscError> {
        match code_hat {
            Some(code_hat) => self.encode_into(info_hat, code_hat),
            None => Ok(()),
        }
    }
}
