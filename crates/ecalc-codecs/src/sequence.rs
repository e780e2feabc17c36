//! Symbol sequences and the shared digit-table machinery
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered symbols produced by an encoder, one per digit plus an optional
/// sign sentinel in front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolSequence(Vec<String>);

impl SymbolSequence {
    pub fn new(symbols: Vec<String>) -> Self {
        Self(symbols)
    }

    /// Split a rendered sequence back into symbols. Empty pieces are skipped.
    pub fn parse(text: &str, separator: &str) -> Self {
        Self(
            text.split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// Apply a symbol-wise rewrite, keeping order.
    pub fn map(&self, f: impl Fn(&str) -> String) -> Self {
        Self(self.0.iter().map(|s| f(s)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<&str>> for SymbolSequence {
    fn from(symbols: Vec<&str>) -> Self {
        Self(symbols.into_iter().map(str::to_string).collect())
    }
}

/// Split an integer into its sign and decimal digits.
pub fn split_digits(value: i64) -> (bool, Vec<u8>) {
    let digits = value
        .unsigned_abs()
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect();
    (value < 0, digits)
}

/// Rebuild an integer from digits, saturating at the i64 bounds.
/// No digits at all decodes to zero.
pub fn assemble(negative: bool, digits: &[u8]) -> i64 {
    let mut magnitude: i128 = 0;
    for &d in digits {
        magnitude = (magnitude * 10 + i128::from(d)).min(i128::from(i64::MAX) + 1);
    }
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Bidirectional table covering the digits 0-9 and one sign sentinel.
pub struct DigitTable {
    digits: [&'static str; 10],
    sign: &'static str,
    reverse: HashMap<&'static str, u8>,
}

impl DigitTable {
    pub fn new(digits: [&'static str; 10], sign: &'static str) -> Self {
        let reverse = digits
            .iter()
            .enumerate()
            .map(|(d, symbol)| (*symbol, d as u8))
            .collect();
        Self { digits, sign, reverse }
    }

    pub fn symbol(&self, digit: u8) -> &'static str {
        self.digits[usize::from(digit % 10)]
    }

    pub fn sign(&self) -> &'static str {
        self.sign
    }

    /// Digit for a symbol; `None` for the sentinel and unknown symbols.
    pub fn digit(&self, symbol: &str) -> Option<u8> {
        self.reverse.get(symbol).copied()
    }

    pub fn encode(&self, value: i64) -> SymbolSequence {
        let (negative, digits) = split_digits(value);
        let mut symbols = Vec::with_capacity(digits.len() + 1);
        if negative {
            symbols.push(self.sign.to_string());
        }
        symbols.extend(digits.into_iter().map(|d| self.symbol(d).to_string()));
        SymbolSequence(symbols)
    }

    /// Inverse of `encode`. A leading sentinel marks a negative value; any
    /// other unmapped symbol, including a misplaced sentinel, reads as `0`.
    pub fn decode(&self, sequence: &SymbolSequence) -> i64 {
        let mut symbols = sequence.iter().peekable();
        let negative = symbols.next_if(|s| *s == self.sign).is_some();
        let digits: Vec<u8> = symbols.map(|s| self.digit(s).unwrap_or(0)).collect();
        assemble(negative, &digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DigitTable {
        DigitTable::new(["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"], "~")
    }

    #[test]
    fn test_split_digits() {
        assert_eq!(split_digits(-305), (true, vec![3, 0, 5]));
        assert_eq!(split_digits(0), (false, vec![0]));
        assert_eq!(split_digits(i64::MIN).1.len(), 19);
    }

    #[test]
    fn test_assemble_saturates() {
        assert_eq!(assemble(false, &[]), 0);
        assert_eq!(assemble(true, &[4, 2]), -42);
        assert_eq!(assemble(false, &[9; 25]), i64::MAX);
        assert_eq!(assemble(true, &[9; 25]), i64::MIN);
    }

    #[test]
    fn test_table_sign_sentinel() {
        let table = table();
        let seq = table.encode(-21);
        assert_eq!(seq.join(""), "~cb");
        assert_eq!(table.decode(&seq), -21);
    }

    #[test]
    fn test_unknown_symbols_fall_back_to_zero() {
        let table = table();
        assert_eq!(table.decode(&SymbolSequence::from(vec!["b", "??", "c"])), 102);
        assert_eq!(table.decode(&SymbolSequence::from(vec!["b", "~"])), 10);
    }

    #[test]
    fn test_i64_min_round_trips() {
        let table = table();
        assert_eq!(table.decode(&table.encode(i64::MIN)), i64::MIN);
    }

    #[test]
    fn test_parse_rendered() {
        let seq = SymbolSequence::parse("AAAT - AAGA-", "-");
        assert_eq!(seq.symbols(), &["AAAT".to_string(), "AAGA".to_string()]);
    }
}
