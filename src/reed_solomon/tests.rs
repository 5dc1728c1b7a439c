use alloc::{vec, vec::Vec};

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

use super::{ConfigError, DecodingError, ReedSolomon};
use crate::bits::InputError;
use crate::galois::GF;

fn symbols(values: &[u16]) -> Vec<GF> {
    values.iter().map(|v| GF(*v)).collect()
}

fn to_bits(code: &ReedSolomon, symbols: &[GF]) -> Vec<u8> {
    let mut bits = vec![0; symbols.len() * code.field().degree() as usize];
    code.field().symbols_to_bits(symbols, &mut bits);
    bits
}

fn random_data(code: &ReedSolomon, rng: &mut StdRng) -> Vec<GF> {
    (0..code.k())
        .map(|_| GF(rng.gen_range(0..code.field().size() as u16)))
        .collect()
}

fn encode_symbols(code: &ReedSolomon, data: &[GF]) -> Vec<GF> {
    let mut parity = vec![GF::ZERO; code.parity_len()];
    code.encode_symbols(data, &mut parity).unwrap();
    data.iter().cloned().chain(parity).collect()
}

/// Add a random nonzero value at `count` distinct random positions.
fn add_errors(code: &ReedSolomon, word: &mut [GF], count: usize, rng: &mut StdRng) {
    for p in sample(rng, word.len(), count) {
        word[p] += GF(rng.gen_range(1..code.field().size() as u16));
    }
}

#[test]
fn shape() {
    let code = ReedSolomon::new(8, 255, 223).unwrap();
    assert_eq!(code.n(), 255);
    assert_eq!(code.k(), 223);
    assert_eq!(code.parity_len(), 32);
    assert_eq!(code.shortening(), 0);
    assert_eq!(code.max_errors(), 16);

    let code = ReedSolomon::new(4, 10, 4).unwrap();
    assert_eq!(code.shortening(), 5);
    assert_eq!(code.max_errors(), 3);
}

#[test]
fn generator_gf8() {
    let code = ReedSolomon::new(3, 7, 3).unwrap();
    assert_eq!(code.generator(), symbols(&[1, 5, 5, 3, 2]).as_slice());
}

#[test]
fn generator_has_consecutive_zeros() {
    for (m, n, k) in [(3, 7, 3), (4, 15, 9), (6, 63, 41), (8, 255, 223)] {
        let code = ReedSolomon::new(m, n, k).unwrap();
        let field = code.field();
        let g = code.generator();
        assert_eq!(g.len(), n - k + 1);
        assert_eq!(g[0], GF::ONE);
        for i in 0..n - k {
            let value = field.eval(g, field.exp(i));
            assert_eq!(value, GF::ZERO, "root α^{} for RS({}, {})", i, n, k);
        }
    }
}

#[test]
fn encode_gf8() {
    let code = ReedSolomon::new(3, 7, 3).unwrap();
    let codeword = encode_symbols(&code, &symbols(&[1, 2, 3]));
    assert_eq!(codeword, symbols(&[1, 2, 3, 5, 0, 5, 0]));

    let bits = code.encode(&[1, 0, 0, 0, 1, 0, 1, 1, 0]).unwrap();
    #[rustfmt::skip]
    assert_eq!(bits, [
        1, 0, 0,  0, 1, 0,  1, 1, 0,
        1, 0, 1,  0, 0, 0,  1, 0, 1,  0, 0, 0,
    ]);
}

#[test]
fn encode_shortened() {
    // the four shortened symbols are shifted through the register first
    let code = ReedSolomon::new(4, 10, 4).unwrap();
    let codeword = encode_symbols(&code, &symbols(&[9, 0, 15, 4]));
    assert_eq!(codeword, symbols(&[9, 0, 15, 4, 14, 10, 3, 15, 3, 9]));
}

#[test]
fn codewords_have_zero_syndromes() {
    let mut rng = StdRng::seed_from_u64(1);
    for (m, n, k) in [(3, 7, 3), (4, 10, 4), (5, 20, 10), (8, 100, 80)] {
        let code = ReedSolomon::new(m, n, k).unwrap();
        for _ in 0..20 {
            let mut codeword = encode_symbols(&code, &random_data(&code, &mut rng));
            let expected = codeword.clone();
            assert_eq!(code.decode_symbols(&mut codeword), Ok(0));
            assert_eq!(codeword, expected);
        }
    }
}

#[test]
fn round_trip_without_errors() {
    let mut rng = StdRng::seed_from_u64(2);
    for (m, n, k) in [(3, 7, 3), (4, 15, 9), (6, 40, 30), (8, 255, 223)] {
        let code = ReedSolomon::new(m, n, k).unwrap();
        let info: Vec<u8> = (0..k * m as usize).map(|_| rng.gen_range(0..2)).collect();
        let codeword = code.encode(&info).unwrap();
        assert_eq!(codeword.len(), n * m as usize);
        assert_eq!(&codeword[..info.len()], &info[..]);

        let decoded = code.decode(&codeword).unwrap();
        assert_eq!(decoded.codeword, codeword);
        assert_eq!(decoded.info, info);
        assert_eq!(decoded.corrected, 0);
    }
}

#[test]
fn corrects_up_to_max_errors() {
    let mut rng = StdRng::seed_from_u64(3);
    for (m, n, k) in [(3, 7, 3), (4, 15, 9), (5, 20, 10), (8, 100, 80), (8, 255, 223)] {
        let code = ReedSolomon::new(m, n, k).unwrap();
        for _ in 0..50 {
            let codeword = encode_symbols(&code, &random_data(&code, &mut rng));
            let errors = rng.gen_range(0..=code.max_errors());
            let mut received = codeword.clone();
            add_errors(&code, &mut received, errors, &mut rng);

            assert_eq!(
                code.decode_symbols(&mut received),
                Ok(errors),
                "RS({}, {}) over GF(2^{})",
                n,
                k,
                m
            );
            assert_eq!(received, codeword);
        }
    }
}

#[test]
fn two_errors_gf8() {
    let code = ReedSolomon::new(3, 7, 3).unwrap();
    let info = [1, 0, 0, 0, 1, 0, 1, 1, 0];
    let codeword = code.encode(&info).unwrap();
    let mut received = codeword.clone();
    received[0] ^= 1;
    received[20] ^= 1;

    let decoded = code.decode(&received).unwrap();
    assert_eq!(decoded.corrected, 2);
    assert_eq!(decoded.codeword, codeword);
    assert_eq!(decoded.info, info);
}

#[test]
fn ccsds_like_16_errors() {
    let code = ReedSolomon::new(8, 255, 223).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let data = random_data(&code, &mut rng);
    let codeword = to_bits(&code, &encode_symbols(&code, &data));

    let mut received = codeword.clone();
    for p in sample(&mut rng, code.n(), 16) {
        // flip the low bit, one error per symbol
        received[8 * p] ^= 1;
    }
    let decoded = code.decode(&received).unwrap();
    assert_eq!(decoded.corrected, 16);
    assert_eq!(decoded.codeword, codeword);
}

#[test]
fn all_zero_message_16_and_17_errors() {
    let code = ReedSolomon::new(8, 255, 223).unwrap();
    let info = vec![0u8; 223 * 8];
    let codeword = code.encode(&info).unwrap();
    assert_eq!(codeword, vec![0u8; 255 * 8]);

    let mut rng = StdRng::seed_from_u64(7);
    let positions: Vec<usize> = sample(&mut rng, code.n(), 17).into_vec();

    let mut received = codeword.clone();
    for p in &positions[..16] {
        received[8 * p + rng.gen_range(0..8)] ^= 1;
    }
    let decoded = code.decode(&received).unwrap();
    assert_eq!(decoded.corrected, 16);
    assert_eq!(decoded.codeword, codeword);
    assert_eq!(decoded.info, info);

    received[8 * positions[16]] ^= 1;
    match code.decode(&received) {
        Ok(decoded) => assert_ne!(decoded.info, info),
        Err(err) => assert!(matches!(
            err,
            DecodingError::Uncorrectable | DecodingError::ErrorsOutsideRange
        )),
    }
}

#[test]
fn too_many_errors_are_not_hidden() {
    let code = ReedSolomon::new(8, 255, 223).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let codeword = encode_symbols(&code, &random_data(&code, &mut rng));
        let mut received = codeword.clone();
        add_errors(&code, &mut received, 17, &mut rng);
        match code.decode_symbols(&mut received) {
            Ok(_) => assert_ne!(received, codeword),
            Err(err) => assert!(matches!(
                err,
                DecodingError::Uncorrectable | DecodingError::ErrorsOutsideRange
            )),
        }
    }
}

#[test]
fn gf4_exhaustive_single_errors() {
    let code = ReedSolomon::new(2, 3, 1).unwrap();
    assert_eq!(code.max_errors(), 1);
    for a in 0..4 {
        let codeword = encode_symbols(&code, &[GF(a)]);
        for p in 0..3 {
            for e in 1..4 {
                let mut received = codeword.clone();
                received[p] += GF(e);
                assert_eq!(code.decode_symbols(&mut received), Ok(1));
                assert_eq!(received, codeword);
            }
        }
    }
}

#[test]
fn errors_in_shortened_part() {
    // A codeword of the full code RS(15, 9) with a nonzero symbol in front.
    // Its last 10 symbols look like a shortened RS(10, 4) word with one error
    // in the implicit zeros.
    let full = ReedSolomon::new(4, 15, 9).unwrap();
    let mut data = vec![GF::ZERO; 9];
    data[0] = GF::ONE;
    let codeword = encode_symbols(&full, &data);

    let code = ReedSolomon::new(4, 10, 4).unwrap();
    let mut received = codeword[5..].to_vec();
    let before = received.clone();
    assert_eq!(
        code.decode_symbols(&mut received),
        Err(DecodingError::ErrorsOutsideRange)
    );
    assert_eq!(received, before);
}

#[test]
fn failed_decoding_leaves_input() {
    let code = ReedSolomon::new(3, 7, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let mut failures = 0;
    for _ in 0..100 {
        let codeword = encode_symbols(&code, &random_data(&code, &mut rng));
        let mut received = codeword.clone();
        add_errors(&code, &mut received, 3, &mut rng);
        let before = received.clone();
        if code.decode_symbols(&mut received).is_err() {
            assert_eq!(received, before);
            failures += 1;
        }
    }
    assert!(failures > 0);
}

#[test]
fn config_errors() {
    assert_eq!(
        ReedSolomon::new(0, 1, 1).unwrap_err(),
        ConfigError::UnsupportedFieldDegree(0)
    );
    assert_eq!(
        ReedSolomon::new(9, 300, 200).unwrap_err(),
        ConfigError::UnsupportedFieldDegree(9)
    );
    assert_eq!(
        ReedSolomon::new(3, 8, 4).unwrap_err(),
        ConfigError::FieldTooSmall { n: 8, max: 7 }
    );
    assert_eq!(
        ReedSolomon::new(4, 10, 10).unwrap_err(),
        ConfigError::InvalidDimensions { n: 10, k: 10 }
    );
    assert_eq!(
        ReedSolomon::new(4, 10, 0).unwrap_err(),
        ConfigError::InvalidDimensions { n: 10, k: 0 }
    );
    // GF(2) only allows n = 1, which leaves no room for parity
    assert_eq!(
        ReedSolomon::new(1, 1, 1).unwrap_err(),
        ConfigError::InvalidDimensions { n: 1, k: 1 }
    );
}

#[test]
fn input_errors() {
    let code = ReedSolomon::new(3, 7, 3).unwrap();
    assert_eq!(
        code.encode(&[0; 8]),
        Err(InputError::WrongLength {
            expected: 9,
            actual: 8
        })
    );
    assert_eq!(
        code.encode(&[0, 0, 0, 0, 0, 0, 0, 0, 2]),
        Err(InputError::InvalidBit { index: 8, value: 2 })
    );
    assert_eq!(
        code.decode(&[1; 22]),
        Err(DecodingError::Input(InputError::WrongLength {
            expected: 21,
            actual: 22
        }))
    );

    let mut word = symbols(&[1, 2, 3, 5, 0, 8, 0]);
    assert_eq!(
        code.decode_symbols(&mut word),
        Err(DecodingError::Input(InputError::InvalidSymbol {
            index: 5,
            value: 8
        }))
    );
    let mut parity = [GF::ZERO; 3];
    assert_eq!(
        code.encode_symbols(&symbols(&[1, 2, 3]), &mut parity),
        Err(InputError::WrongLength {
            expected: 4,
            actual: 3
        })
    );
}
