//! Musical-note codec (subtraction pipeline)
//!
//! Digits map onto the natural notes from C4 to E5; `REST` in front marks a
//! negative value. Transposition works on the chromatic scale, so a melody
//! shifted by `n` semitones decodes again after shifting it back by `-n`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::sequence::{DigitTable, SymbolSequence};
use crate::Codec;

pub const REST: &str = "REST";

static NOTE_TABLE: Lazy<DigitTable> = Lazy::new(|| {
    DigitTable::new(["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5", "D5", "E5"], REST)
});

const PITCH_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// MIDI number of A4
const A4_MIDI: i32 = 69;
const A4_HZ: f64 = 440.0;

/// Seconds each played note sustains on the sheet
pub const NOTE_DURATION_SECS: f64 = 4.0;

/// A single note with its pitch resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    /// `None` for a rest
    pub midi: Option<i32>,
    pub frequency_hz: u32,
    pub duration_secs: f64,
}

impl Note {
    /// Resolve a note symbol such as `C4`, `F#3` or `REST`.
    pub fn parse(symbol: &str) -> Option<Self> {
        if symbol == REST {
            return Some(Self {
                name: REST.to_string(),
                midi: None,
                frequency_hz: 0,
                duration_secs: NOTE_DURATION_SECS,
            });
        }
        let midi = midi_number(symbol)?;
        Some(Self::from_midi(midi))
    }

    pub fn from_midi(midi: i32) -> Self {
        let semitones_from_a4 = f64::from(midi - A4_MIDI);
        let frequency = A4_HZ * 2f64.powf(semitones_from_a4 / 12.0);
        Self {
            name: note_name(midi),
            midi: Some(midi),
            frequency_hz: frequency.round() as u32,
            duration_secs: NOTE_DURATION_SECS,
        }
    }

    /// Note that represents a value when it is played: its last digit.
    pub fn for_value(value: i64) -> Self {
        let symbol = NOTE_TABLE.symbol((value.unsigned_abs() % 10) as u8);
        Self::parse(symbol).unwrap_or_else(|| Self::from_midi(A4_MIDI))
    }
}

fn midi_number(symbol: &str) -> Option<i32> {
    let split = symbol.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let (pitch, octave) = symbol.split_at(split);
    let class = PITCH_NAMES.iter().position(|p| *p == pitch)? as i32;
    let octave: i32 = octave.parse().ok()?;
    Some((octave + 1) * 12 + class)
}

fn note_name(midi: i32) -> String {
    let class = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", PITCH_NAMES[class], octave)
}

/// Shift every note by `semitones`. Rests and unreadable symbols are kept.
pub fn transpose(melody: &SymbolSequence, semitones: i32) -> SymbolSequence {
    melody.map(|symbol| match midi_number(symbol) {
        Some(midi) => note_name(midi + semitones),
        None => symbol.to_string(),
    })
}

/// `♪C4 ♪D4`, the form the music sheet reads
pub fn format_melody(melody: &SymbolSequence) -> String {
    melody
        .iter()
        .map(|note| format!("♪{}", note))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MelodyCodec;

impl Codec for MelodyCodec {
    fn id(&self) -> &'static str {
        "melody"
    }

    fn separator(&self) -> &'static str {
        " "
    }

    fn encode(&self, value: i64) -> SymbolSequence {
        NOTE_TABLE.encode(value)
    }

    fn decode(&self, sequence: &SymbolSequence) -> i64 {
        NOTE_TABLE.decode(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_negative() {
        assert_eq!(MelodyCodec.render(&MelodyCodec.encode(-15)), "REST D4 A4");
        assert_eq!(format_melody(&MelodyCodec.encode(10)), "♪D4 ♪C4");
    }

    #[test]
    fn test_transpose_crosses_octave() {
        let melody = SymbolSequence::from(vec!["B4", "C4", "REST"]);
        let up = transpose(&melody, 2);
        assert_eq!(up.join(" "), "C#5 D4 REST");

        let down = transpose(&melody, -2);
        assert_eq!(down.join(" "), "A4 A#3 REST");
    }

    #[test]
    fn test_transposed_melody_is_not_decodable_until_restored() {
        let melody = MelodyCodec.encode(1234);
        let shifted = transpose(&melody, 2);
        assert_ne!(MelodyCodec.decode(&shifted), 1234);
        assert_eq!(MelodyCodec.decode(&transpose(&shifted, -2)), 1234);
    }

    #[test]
    fn test_frequencies() {
        assert_eq!(Note::parse("A4").unwrap().frequency_hz, 440);
        assert_eq!(Note::parse("C4").unwrap().frequency_hz, 262);
        assert_eq!(Note::parse("E5").unwrap().frequency_hz, 659);
        assert_eq!(Note::parse(REST).unwrap().frequency_hz, 0);
        assert!(Note::parse("H2").is_none());
    }

    #[test]
    fn test_note_for_value_uses_last_digit() {
        assert_eq!(Note::for_value(-25).name, "A4");
        assert_eq!(Note::for_value(7).name, "C5");
    }
}
