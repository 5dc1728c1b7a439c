//! Viterbi decoding on the 4-state trellis.
//!
//! The decoder searches the path through the trellis with the smallest
//! accumulated cost (path metric). At every step each state keeps only its
//! best incoming path (add-compare-select) together with a back pointer.
//! After the last step the back pointers are followed from the best final
//! state to recover the input bits.
//!
//! Soft and hard decoding only differ in the branch metric and in the type
//! the metrics are accumulated in.
use core::fmt::Debug;
use core::ops::{Add, Sub};

use alloc::vec::Vec;
use flagset::FlagSet;

use super::trellis::{Bit, State};
use super::{ConvolutionalCode, NscError};

/// An accumulated cost, smaller is better.
pub(super) trait PathMetric:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Debug
{
    const ZERO: Self;
    /// Metric of states no path has reached yet.
    const UNREACHABLE: Self;
}

impl PathMetric for f64 {
    const ZERO: Self = 0.0;
    const UNREACHABLE: Self = f64::INFINITY;
}

impl PathMetric for u32 {
    const ZERO: Self = 0;
    const UNREACHABLE: Self = u32::MAX;
}

/// BPSK mapping, bit 0 is sent as +1 and bit 1 as -1.
const BPSK: [f64; 2] = [1.0, -1.0];

/// LLR magnitudes are clipped to this value.
///
/// A branch metric is then at most `2 * LLR_LIMIT` in magnitude and the
/// normalized path metrics stay below `8 * LLR_LIMIT`, far from overflow.
pub(super) const LLR_LIMIT: f64 = f64::MAX / 64.0;

/// Negative correlation of the two LLRs of a step with the BPSK symbols of
/// the candidate output.
pub(super) fn soft_metric(llr: &[f64]) -> impl Fn(usize, [u8; 2]) -> f64 + '_ {
    move |step: usize, [v, w]: [u8; 2]| {
        let received = &llr[2 * step..2 * step + 2];
        let (a, b) = (
            received[0].clamp(-LLR_LIMIT, LLR_LIMIT),
            received[1].clamp(-LLR_LIMIT, LLR_LIMIT),
        );
        -(BPSK[v as usize] * a + BPSK[w as usize] * b)
    }
}

/// Hamming distance between the received bits of a step and the candidate output.
pub(super) fn hard_metric(rx_bits: &[u8]) -> impl Fn(usize, [u8; 2]) -> u32 + '_ {
    move |step: usize, [v, w]: [u8; 2]| {
        let received = &rx_bits[2 * step..2 * step + 2];
        (received[0] != v) as u32 + (received[1] != w) as u32
    }
}

/// Back pointer: the state a survivor path came from and the bit it took.
#[derive(Debug, Clone, Copy)]
struct Survivor {
    previous: State,
    bit: Bit,
}

impl Survivor {
    const NONE: Survivor = Survivor {
        previous: State::START,
        bit: Bit::Zero,
    };
}

/// Run the Viterbi algorithm and write the first `K` decoded bits to `info_hat`.
///
/// Returns the metric of the chosen path. The path metrics are shifted to a
/// minimum of zero after every step, the shifts are added back at the end.
pub(super) fn decode<M, F>(
    code: &ConvolutionalCode,
    branch_metric: F,
    info_hat: &mut [u8],
) -> Result<M, NscError>
where
    M: PathMetric,
    F: Fn(usize, [u8; 2]) -> M,
{
    let steps = code.steps();
    debug_assert_eq!(info_hat.len(), code.info_len());

    let mut survivors: Vec<[Survivor; 4]> = Vec::new();
    survivors
        .try_reserve_exact(steps)
        .map_err(|_| NscError::OutOfMemory)?;

    // The encoder always starts in State::START.
    let mut metrics = [M::UNREACHABLE; 4];
    metrics[State::START.index()] = M::ZERO;
    let mut reachable: FlagSet<State> = State::START.into();
    let mut offset = M::ZERO;

    // forward pass
    for step in 0..steps {
        let mut next_metrics = [M::UNREACHABLE; 4];
        let mut next_reachable = FlagSet::default();
        let mut survivor = [Survivor::NONE; 4];
        for previous in reachable {
            for bit in Bit::ALL {
                let state = previous.next(bit);
                let candidate =
                    metrics[previous.index()] + branch_metric(step, previous.output(bit));
                if candidate < next_metrics[state.index()] {
                    next_metrics[state.index()] = candidate;
                    survivor[state.index()] = Survivor { previous, bit };
                    next_reachable |= state;
                }
            }
        }
        debug_assert!(!next_reachable.is_empty());

        let mut min = M::UNREACHABLE;
        for s in next_reachable {
            if next_metrics[s.index()] < min {
                min = next_metrics[s.index()];
            }
        }
        for s in next_reachable {
            next_metrics[s.index()] = next_metrics[s.index()] - min;
        }
        offset = offset + min;

        metrics = next_metrics;
        reachable = next_reachable;
        survivors.push(survivor);
    }

    // The tail should have brought us back to State::START, but pick
    // the best state anyway. Ties go to State::START.
    let mut state = State::START;
    for s in reachable {
        if metrics[s.index()] < metrics[state.index()] {
            state = s;
        }
    }
    let best = metrics[state.index()] + offset;
    log::trace!(
        "viterbi: {} steps, final state {:?}, path metric {:?}",
        steps,
        state,
        best
    );

    // backward pass, tail bits are dropped
    for (step, survivor) in survivors.iter().enumerate().rev() {
        let Survivor { previous, bit } = survivor[state.index()];
        if step < info_hat.len() {
            info_hat[step] = bit.value();
        }
        state = previous;
    }
    debug_assert_eq!(state, State::START);

    Ok(best)
}

#[cfg(test)]
use alloc::vec;

#[test]
fn soft_metric_prefers_matching_signs() {
    let llr = [4.0, -2.0, 0.5, 0.5];
    let metric = soft_metric(&llr);
    // step 0 received looks like bits (0, 1)
    assert_eq!(metric(0, [0, 1]), -6.0);
    assert_eq!(metric(0, [1, 0]), 6.0);
    assert_eq!(metric(0, [0, 0]), -2.0);
    assert_eq!(metric(1, [1, 1]), 1.0);
}

#[test]
fn soft_metric_clips_huge_llrs() {
    let llr = [f64::MAX, -f64::MAX, 1e307, 1e307];
    let metric = soft_metric(&llr);
    assert_eq!(metric(0, [0, 1]), -2.0 * LLR_LIMIT);
    assert_eq!(metric(0, [1, 0]), 2.0 * LLR_LIMIT);
    assert_eq!(metric(0, [0, 0]), 0.0);
    assert!(metric(1, [0, 0]).is_finite());
}

#[test]
fn hard_metric_is_hamming_distance() {
    let rx = [0, 1, 1, 1];
    let metric = hard_metric(&rx);
    assert_eq!(metric(0, [0, 1]), 0);
    assert_eq!(metric(0, [1, 1]), 1);
    assert_eq!(metric(0, [1, 0]), 2);
    assert_eq!(metric(1, [0, 0]), 2);
}

#[test]
fn noiseless_path_has_zero_hard_metric() {
    let code = ConvolutionalCode::new(6);
    let data = [1, 1, 0, 1, 0, 0];
    let codeword = code.encode(&data).unwrap();
    let mut info = vec![0; 6];
    let metric = decode(&code, hard_metric(&codeword), &mut info).unwrap();
    assert_eq!(metric, 0);
    assert_eq!(info, data);
}

#[test]
fn hard_metric_counts_flipped_bits() {
    let code = ConvolutionalCode::new(12);
    let data = [0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1, 0];
    let mut received = code.encode(&data).unwrap();
    received[2] ^= 1;
    received[17] ^= 1;
    let mut info = vec![0; 12];
    let metric = decode(&code, hard_metric(&received), &mut info).unwrap();
    assert_eq!(metric, 2);
    assert_eq!(info, data);
}
