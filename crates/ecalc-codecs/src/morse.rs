//! Morse codec (division pipeline)
use once_cell::sync::Lazy;

use crate::sequence::{DigitTable, SymbolSequence};
use crate::Codec;

static MORSE_TABLE: Lazy<DigitTable> = Lazy::new(|| {
    DigitTable::new(
        ["-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----."],
        "-....-",
    )
});

/// Audible signal for one subtraction step: dot on even, dash on odd.
pub fn parity_signal(value: u64) -> char {
    if value % 2 == 0 {
        '.'
    } else {
        '-'
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MorseCodec;

impl Codec for MorseCodec {
    fn id(&self) -> &'static str {
        "morse"
    }

    fn separator(&self) -> &'static str {
        " "
    }

    fn encode(&self, value: i64) -> SymbolSequence {
        MORSE_TABLE.encode(value)
    }

    fn decode(&self, sequence: &SymbolSequence) -> i64 {
        MORSE_TABLE.decode(sequence)
    }
}
