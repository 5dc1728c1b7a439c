//! The trellis of the 4-state, rate 1/2 convolutional code.
//!
//! The encoder is a 2-bit shift register `(s1 s2)` where `s1` holds the most
//! recent input bit. For an input bit `b` two output bits are produced by the
//! generator polynomials 7 = 111 and 5 = 101 (octal notation),
//!
//! > v = b + s1 + s2,
//! > w = b + s2,
//!
//! and the register shifts to `(b s1)`. Everything the encoder and the
//! Viterbi decoder need is precomputed in the two tables below, so neither
//! of them branches on bit values.
use flagset::{flags, FlagSet};

#[cfg(test)]
use enum_iterator::Sequence;

flags! {
    /// The states of the shift register.
    ///
    /// A state is a flag so sets of states, for example the states a
    /// decoder can reach at a given time, are a [FlagSet].
    pub enum State: u8 {
        /// register 00
        A = 0b0001,
        /// register 01
        B = 0b0010,
        /// register 10
        C = 0b0100,
        /// register 11
        D = 0b1000,
    }
}

/// An input bit of the encoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Sequence))]
pub enum Bit {
    Zero,
    One,
}

/// Generator polynomials for the two output bits, the most significant bit
/// taps the input.
pub const GENERATORS: [u8; 2] = [0b111, 0b101];

/// Next state for `[state][input bit]`.
const NEXT_STATE: [[State; 2]; 4] = [
    [State::A, State::C],
    [State::A, State::C],
    [State::B, State::D],
    [State::B, State::D],
];

/// Output bits `(v, w)` for `[state][input bit]`.
const OUTPUT_BITS: [[[u8; 2]; 2]; 4] = [
    [[0, 0], [1, 1]],
    [[1, 1], [0, 0]],
    [[1, 0], [0, 1]],
    [[0, 1], [1, 0]],
];

impl State {
    /// Encoding starts here and the tail bits lead back here.
    pub const START: State = State::A;

    pub const ALL: [State; 4] = [State::A, State::B, State::C, State::D];

    /// The register content as a number, `s1` being the high bit.
    pub fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub fn next(self, bit: Bit) -> State {
        NEXT_STATE[self.index()][bit.index()]
    }

    pub fn output(self, bit: Bit) -> [u8; 2] {
        OUTPUT_BITS[self.index()][bit.index()]
    }

    /// Set of all four states.
    pub fn all() -> FlagSet<Self> {
        FlagSet::full()
    }
}

impl Bit {
    pub const ALL: [Bit; 2] = [Bit::Zero, Bit::One];

    /// Convert an unpacked bit, which must be 0 or 1.
    pub(crate) fn from_value(value: u8) -> Bit {
        Self::ALL[value as usize]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    pub fn value(&self) -> u8 {
        self.index() as u8
    }
}

#[cfg(test)]
use enum_iterator::all;

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn tables_follow_generators() {
    for state in State::all() {
        let s = state.index() as u8;
        for bit in all::<Bit>() {
            let register = (bit.value() << 2) | s;
            let expected = GENERATORS.map(|g| ((register & g).count_ones() % 2) as u8);
            assert_eq!(state.output(bit), expected, "{:?} {:?}", state, bit);
            assert_eq!(
                state.next(bit).index() as u8,
                (bit.value() << 1) | (s >> 1),
                "{:?} {:?}",
                state,
                bit
            );
        }
    }
}

#[test]
fn two_zeros_terminate() {
    for state in State::ALL {
        assert_eq!(state.next(Bit::Zero).next(Bit::Zero), State::START);
    }
}

#[test]
fn start_state_is_silent_on_zero() {
    assert_eq!(State::START.output(Bit::Zero), [0, 0]);
    assert_eq!(State::START.next(Bit::Zero), State::START);
}

#[test]
fn every_state_has_two_predecessors() {
    for target in State::ALL {
        let count = State::ALL
            .iter()
            .flat_map(|s| all::<Bit>().map(move |b| s.next(b)))
            .filter(|s| *s == target)
            .count();
        assert_eq!(count, 2, "{:?}", target);
    }
}

#[test]
fn state_index_order() {
    let indices: [usize; 4] = State::ALL.map(|s| s.index());
    assert_eq!(indices, [0, 1, 2, 3]);
    let from_set: alloc::vec::Vec<State> = State::all().into_iter().collect();
    assert_eq!(from_set, State::ALL);
    assert_eq!(Bit::from_value(1), Bit::One);
}
