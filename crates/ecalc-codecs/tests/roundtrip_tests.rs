//! Round-trip laws for every registered codec.
//!
//! ```text
//! x ──encode──▶ symbols ──decode──▶ x
//! ```

use ecalc_codecs::dna::{reverse_transcribe, transcribe};
use ecalc_codecs::melody::transpose;
use ecalc_codecs::roman::binary_round_trip;
use ecalc_codecs::{Codec, CodecRegistry, DnaCodec, MelodyCodec, MorseCodec, RnaCodec, RomanCodec};
use proptest::prelude::*;

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    #[test]
    fn dna_round_trips(x in any::<i64>()) {
        prop_assert_eq!(DnaCodec.round_trip(x), x);
    }

    #[test]
    fn rna_round_trips(x in any::<i64>()) {
        let dna = DnaCodec.encode(x);
        prop_assert_eq!(RnaCodec.decode(&transcribe(&dna)), x);
        prop_assert_eq!(reverse_transcribe(&transcribe(&dna)), dna);
    }

    #[test]
    fn morse_round_trips(x in any::<i64>()) {
        prop_assert_eq!(MorseCodec.round_trip(x), x);
    }

    #[test]
    fn melody_round_trips(x in any::<i64>()) {
        prop_assert_eq!(MelodyCodec.round_trip(x), x);
    }

    #[test]
    fn melody_transposition_inverts(x in any::<i64>(), semitones in -24i32..=24) {
        let melody = MelodyCodec.encode(x);
        let restored = transpose(&transpose(&melody, semitones), -semitones);
        prop_assert_eq!(MelodyCodec.decode(&restored), x);
    }

    // Roman numerals accumulate thousands, so keep magnitudes modest.
    #[test]
    fn roman_round_trips(x in -250_000i64..=250_000) {
        prop_assert_eq!(RomanCodec.round_trip(x), x);
    }

    #[test]
    fn binary_detour_is_identity(x in any::<u64>()) {
        prop_assert_eq!(binary_round_trip(x), x);
    }

    #[test]
    fn digit_codecs_emit_one_symbol_per_digit(x in any::<i64>()) {
        let expected = x.unsigned_abs().to_string().len() + usize::from(x < 0);
        for codec in [&DnaCodec as &dyn Codec, &MorseCodec, &MelodyCodec] {
            prop_assert_eq!(codec.encode(x).len(), expected);
        }
    }

    #[test]
    fn rendered_form_parses_back(x in -1_000_000i64..=1_000_000) {
        for id in CodecRegistry::global().ids() {
            let codec = CodecRegistry::global().get(id).unwrap();
            let rendered = codec.render(&codec.encode(x));
            prop_assert_eq!(codec.decode(&codec.parse(&rendered)), x, "codec {}", id);
        }
    }

    #[test]
    fn encoded_len_predicts_encode(x in -250_000i64..=250_000) {
        for id in CodecRegistry::global().ids() {
            let codec = CodecRegistry::global().get(id).unwrap();
            prop_assert_eq!(codec.encoded_len(x), codec.encode(x).len() as u64, "codec {}", id);
        }
    }
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_every_single_digit() {
    for codec_id in CodecRegistry::global().ids() {
        let codec = CodecRegistry::global().get(codec_id).unwrap();
        for x in -9..=9 {
            assert_eq!(codec.round_trip(x), x, "codec {} digit {}", codec_id, x);
        }
    }
}

#[test]
fn test_decoders_never_panic_on_garbage() {
    for codec_id in CodecRegistry::global().ids() {
        let codec = CodecRegistry::global().get(codec_id).unwrap();
        let garbage = codec.parse("?? ## -- !! ZZZZ");
        let _ = codec.decode(&garbage);
        let _ = codec.decode(&codec.parse(""));
    }
}

#[test]
fn test_empty_sequence_decodes_to_zero() {
    for codec_id in CodecRegistry::global().ids() {
        let codec = CodecRegistry::global().get(codec_id).unwrap();
        assert_eq!(codec.decode(&codec.parse("")), 0, "codec {}", codec_id);
    }
}
