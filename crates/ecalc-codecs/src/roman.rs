//! Roman numeral codec with a binary detour (multiplication pipeline)
//!
//! Unlike the digit tables, the Roman codec accumulates: the symbols are
//! the numeral tokens (`M`, `CM`, ... `I`) that add up to the magnitude.
//! Zero is written `N` and a leading `-` marks a negative value. Decoding
//! goes Roman → decimal → binary string → decimal.

use crate::sequence::SymbolSequence;
use crate::Codec;

pub const ZERO: &str = "N";
pub const NEGATIVE: &str = "-";

const NUMERALS: [(u64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn letter_value(c: char) -> u64 {
    match c {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

/// Number of numeral tokens `encode` will produce for `magnitude`,
/// computed without building them.
pub fn token_count(magnitude: u64) -> u64 {
    if magnitude == 0 {
        return 1;
    }
    let mut remaining = magnitude;
    let mut count = 0;
    for (value, _) in NUMERALS {
        count += remaining / value;
        remaining %= value;
    }
    count
}

pub fn to_roman(magnitude: u64) -> Vec<&'static str> {
    if magnitude == 0 {
        return vec![ZERO];
    }
    let mut remaining = magnitude;
    let mut tokens = Vec::with_capacity(token_count(magnitude) as usize);
    for (value, symbol) in NUMERALS {
        while remaining >= value {
            tokens.push(symbol);
            remaining -= value;
        }
    }
    tokens
}

/// Read a numeral string. A smaller letter before a larger one subtracts;
/// unknown letters (including `N`) count as zero.
pub fn roman_to_decimal(numeral: &str) -> u64 {
    let letters: Vec<u64> = numeral.chars().map(letter_value).collect();
    let mut total: u64 = 0;
    let mut i = 0;
    while i < letters.len() {
        let current = letters[i];
        match letters.get(i + 1) {
            Some(&next) if next > current => {
                total = total.saturating_add(next - current);
                i += 2;
            }
            _ => {
                total = total.saturating_add(current);
                i += 1;
            }
        }
    }
    total
}

pub fn to_binary(value: u64) -> String {
    format!("{:b}", value)
}

/// Parse a binary string; anything unreadable reads as zero.
pub fn from_binary(bits: &str) -> u64 {
    u64::from_str_radix(bits, 2).unwrap_or(0)
}

/// Decimal → binary → decimal. Must be the identity.
pub fn binary_round_trip(value: u64) -> u64 {
    from_binary(&to_binary(value))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RomanCodec;

impl Codec for RomanCodec {
    fn id(&self) -> &'static str {
        "roman"
    }

    fn separator(&self) -> &'static str {
        ""
    }

    fn encode(&self, value: i64) -> SymbolSequence {
        let mut tokens = Vec::new();
        if value < 0 {
            tokens.push(NEGATIVE);
        }
        tokens.extend(to_roman(value.unsigned_abs()));
        SymbolSequence::from(tokens)
    }

    /// Grows with the magnitude (one `M` per thousand), so callers size
    /// the numeral with this before encoding large values.
    fn encoded_len(&self, value: i64) -> u64 {
        token_count(value.unsigned_abs()).saturating_add(u64::from(value < 0))
    }

    fn decode(&self, sequence: &SymbolSequence) -> i64 {
        let mut symbols = sequence.iter().peekable();
        let negative = symbols.next_if(|s| *s == NEGATIVE).is_some();
        let numeral: String = symbols.collect();
        let magnitude = binary_round_trip(roman_to_decimal(&numeral));
        let signed = if negative {
            -i128::from(magnitude)
        } else {
            i128::from(magnitude)
        };
        signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Rendered numerals are one string, so split it back into letters.
    fn parse(&self, text: &str) -> SymbolSequence {
        let text = text.trim();
        let (negative, numeral) = match text.strip_prefix(NEGATIVE) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut symbols: Vec<String> = Vec::new();
        if negative {
            symbols.push(NEGATIVE.to_string());
        }
        symbols.extend(numeral.chars().map(String::from));
        SymbolSequence::new(symbols)
    }
}
