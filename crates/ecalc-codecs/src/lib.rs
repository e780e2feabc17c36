//! Enterprise Calculator codecs
//!
//! Four decorative, lossless representations of a signed integer, each
//! behind the [`Codec`] trait so the pipelines never depend on a concrete
//! table:
//!
//! ```text
//! addition        digit ↔ DNA codon ↔ RNA codon
//! subtraction     digit ↔ musical note
//! multiplication  integer ↔ Roman numeral → binary → integer
//! division        digit ↔ Morse
//! ```
//!
//! For every codec `decode(encode(x)) == x`. Decoders never fail: an
//! unknown symbol reads as the digit `0`.

pub mod dna;
pub mod melody;
pub mod morse;
pub mod registry;
pub mod roman;
pub mod sequence;

pub use dna::{DnaCodec, RnaCodec};
pub use melody::{MelodyCodec, Note};
pub use morse::MorseCodec;
pub use registry::CodecRegistry;
pub use roman::RomanCodec;
pub use sequence::SymbolSequence;

use sequence::split_digits;

/// A reversible integer representation
pub trait Codec: Send + Sync {
    /// Registry id (ex: "dna")
    fn id(&self) -> &'static str;

    /// Separator between symbols in rendered form
    fn separator(&self) -> &'static str;

    fn encode(&self, value: i64) -> SymbolSequence;

    fn decode(&self, sequence: &SymbolSequence) -> i64;

    /// Number of symbols `encode(value)` produces, computed without
    /// building them. One per decimal digit plus the sign sentinel.
    fn encoded_len(&self, value: i64) -> u64 {
        let (negative, digits) = split_digits(value);
        digits.len() as u64 + u64::from(negative)
    }

    fn render(&self, sequence: &SymbolSequence) -> String {
        sequence.join(self.separator())
    }

    fn parse(&self, text: &str) -> SymbolSequence {
        SymbolSequence::parse(text, self.separator())
    }

    /// `decode(encode(value))`
    fn round_trip(&self, value: i64) -> i64 {
        self.decode(&self.encode(value))
    }
}
