//! DNA codec and RNA transcription (addition pipeline)
//!
//! Each digit becomes a four-nucleotide codon. RNA is not a table of its
//! own: transcription swaps thymine for uracil symbol by symbol.

use once_cell::sync::Lazy;

use crate::sequence::{DigitTable, SymbolSequence};
use crate::Codec;

static DNA_TABLE: Lazy<DigitTable> = Lazy::new(|| {
    DigitTable::new(
        ["AAAA", "AAAT", "AAGA", "AAGT", "ATAA", "ATAT", "ATGA", "ATGT", "GAAA", "GAAT"],
        "GGGG",
    )
});

/// Codon separator in rendered form
pub const CODON_SEPARATOR: &str = "-";

/// DNA → RNA
pub fn transcribe(dna: &SymbolSequence) -> SymbolSequence {
    dna.map(|codon| codon.replace('T', "U"))
}

/// RNA → DNA
pub fn reverse_transcribe(rna: &SymbolSequence) -> SymbolSequence {
    rna.map(|codon| codon.replace('U', "T"))
}

/// `[AAGU]-[AUAA]`, the form the helix renderer reads
pub fn bracketed(sequence: &SymbolSequence) -> String {
    sequence
        .iter()
        .map(|codon| format!("[{}]", codon))
        .collect::<Vec<_>>()
        .join(CODON_SEPARATOR)
}

/// Whether every symbol is made only of DNA nucleotides
pub fn is_valid_dna(sequence: &SymbolSequence) -> bool {
    let nucleotide = |c: char| matches!(c, 'A' | 'T' | 'C' | 'G');
    !sequence.is_empty()
        && sequence
            .iter()
            .all(|codon| !codon.is_empty() && codon.chars().all(nucleotide))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DnaCodec;

impl Codec for DnaCodec {
    fn id(&self) -> &'static str {
        "dna"
    }

    fn separator(&self) -> &'static str {
        CODON_SEPARATOR
    }

    fn encode(&self, value: i64) -> SymbolSequence {
        DNA_TABLE.encode(value)
    }

    fn decode(&self, sequence: &SymbolSequence) -> i64 {
        DNA_TABLE.decode(sequence)
    }
}

/// RNA view of the DNA codec: encode then transcribe, reverse-transcribe
/// then decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct RnaCodec;

impl Codec for RnaCodec {
    fn id(&self) -> &'static str {
        "rna"
    }

    fn separator(&self) -> &'static str {
        CODON_SEPARATOR
    }

    fn encode(&self, value: i64) -> SymbolSequence {
        transcribe(&DnaCodec.encode(value))
    }

    fn decode(&self, sequence: &SymbolSequence) -> i64 {
        DnaCodec.decode(&reverse_transcribe(sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_digits() {
        assert_eq!(DnaCodec.render(&DnaCodec.encode(34)), "AAGT-ATAA");
        assert_eq!(DnaCodec.render(&DnaCodec.encode(-8)), "GGGG-GAAA");
    }

    #[test]
    fn test_transcription() {
        let dna = DnaCodec.encode(37);
        let rna = transcribe(&dna);
        assert_eq!(rna.join("-"), "AAGU-AUGU");
        assert_eq!(bracketed(&rna), "[AAGU]-[AUGU]");
        assert_eq!(reverse_transcribe(&rna), dna);
    }

    #[test]
    fn test_rna_decode() {
        let rna = SymbolSequence::parse("GGGG-AUAU-AAAA", "-");
        assert_eq!(RnaCodec.decode(&rna), -50);
    }

    #[test]
    fn test_unknown_codon_reads_zero() {
        let dna = SymbolSequence::parse("AAAT-CCCC", "-");
        assert_eq!(DnaCodec.decode(&dna), 10);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_dna(&DnaCodec.encode(-1234567890)));
        assert!(!is_valid_dna(&RnaCodec.encode(1)));
    }
}
