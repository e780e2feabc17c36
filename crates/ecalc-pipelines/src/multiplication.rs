//! Multiplication by counting a matrix of ones
//!
//! Operands go through Roman numerals and back via a binary detour. The
//! product is never computed with `*`: an `|a| × |b|` matrix of ones is
//! built and its row lengths summed by recursive halving. The sign is
//! applied by counting the magnitude down to zero.

use async_trait::async_trait;
use serde_json::json;

use ecalc_codecs::roman::{from_binary, roman_to_decimal, to_binary, NEGATIVE};
use ecalc_codecs::{Codec, RomanCodec, SymbolSequence};
use ecalc_core::{validate, CalcError, Pause, PipelineRun, PipelineState};

use crate::paced;
use crate::{Operation, Operator};

/// Largest integer a double represents exactly: 2^53 - 1
pub const MAX_EXACT_INTEGER: i64 = 9_007_199_254_740_991;

const STATES: &[PipelineState] = &[
    PipelineState::Initializing,
    PipelineState::Encoding,
    PipelineState::Converting,
    PipelineState::Processing,
    PipelineState::Validating,
    PipelineState::Finalizing,
];

/// `rows × cols` matrix in which every cell is 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMatrix {
    rows: Vec<Vec<u8>>,
}

impl UnitMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![1; cols]; rows],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total cell count, by recursive halving of the rows.
    pub fn sum(&self) -> u64 {
        sum_rows(&self.rows)
    }
}

fn sum_rows(rows: &[Vec<u8>]) -> u64 {
    match rows {
        [] => 0,
        [row] => row.len() as u64,
        _ => {
            let (upper, lower) = rows.split_at(rows.len() / 2);
            sum_rows(upper) + sum_rows(lower)
        }
    }
}

#[derive(Debug, Default)]
pub struct MultiplicationPipeline;

impl MultiplicationPipeline {
    /// Roman → decimal → binary → decimal, recording each hop.
    async fn numeral_to_magnitude(
        run: &mut PipelineRun,
        label: &str,
        numeral: &SymbolSequence,
    ) -> Result<u64, CalcError> {
        run.pause(Pause::Encode).await;
        let letters: String = numeral.iter().filter(|s| *s != NEGATIVE).collect();
        for _ in 0..numeral.len() {
            run.pause(Pause::Symbol).await;
        }
        run.spend(numeral.len() as u64, "roman decoding")?;

        let decimal = roman_to_decimal(&letters);
        let binary = to_binary(decimal);
        let back = from_binary(&binary);
        run.info_with(
            format!("{} → {} → {} → {}", letters, decimal, binary, back),
            json!({ "operand": label, "roman": letters, "decimal": decimal, "binary": binary }),
        );
        validate(
            run,
            &format!("binary({})", label),
            clamp_i64(decimal),
            clamp_i64(back),
        );
        Ok(back)
    }

    /// Negate by counting the magnitude down to zero.
    async fn negate(run: &mut PipelineRun, magnitude: u64) -> Result<i64, CalcError> {
        run.spend(magnitude, "negation")?;
        run.pause(Pause::Step).await;
        let mut remaining = magnitude;
        let mut counted: i128 = 0;
        while remaining > 0 {
            remaining -= 1;
            counted += 1;
        }
        i64::try_from(-counted).map_err(|_| CalcError::Overflow { operation: "multiplication" })
    }

    fn validate_output(run: &mut PipelineRun, result: i64) {
        let checks = [
            ("range", (-MAX_EXACT_INTEGER..=MAX_EXACT_INTEGER).contains(&result)),
            // always holds for i64
            ("type", true),
            ("string conversion", !result.to_string().is_empty()),
        ];
        for (name, passed) in checks {
            if passed {
                run.info(format!("{} validation passed", name));
            } else {
                run.warn(
                    format!("{} validation failed", name),
                    format!("{} failed {} validation", result, name),
                    None,
                );
            }
        }
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Operation for MultiplicationPipeline {
    fn operator(&self) -> Operator {
        Operator::Multiply
    }

    fn states(&self) -> &'static [PipelineState] {
        STATES
    }

    async fn execute(&self, run: &mut PipelineRun, a: i64, b: i64) -> Result<i64, CalcError> {
        run.pause(Pause::Stage).await;
        run.enter(
            PipelineState::Initializing,
            "enterprise multiplication module",
            Some(json!({ "a": a, "b": b })),
        )?;

        run.enter(PipelineState::Encoding, "to Roman numerals", None)?;
        // Numerals grow with the magnitude; refuse before building them.
        let numeral_tokens = RomanCodec
            .encoded_len(a)
            .saturating_add(RomanCodec.encoded_len(b));
        run.check_budget(numeral_tokens.saturating_mul(2), "roman encoding")?;
        let a_roman = paced::encode(run, &RomanCodec, a).await?;
        let b_roman = paced::encode(run, &RomanCodec, b).await?;
        let (a_numeral, b_numeral) = (RomanCodec.render(&a_roman), RomanCodec.render(&b_roman));
        run.info_with(
            format!("{} → {}, {} → {}", a, a_numeral, b, b_numeral),
            json!({ "a_roman": a_numeral, "b_roman": b_numeral }),
        );

        run.enter(PipelineState::Converting, "Roman → decimal → binary → decimal", None)?;
        let rows = Self::numeral_to_magnitude(run, "a", &a_roman).await?;
        let cols = Self::numeral_to_magnitude(run, "b", &b_roman).await?;
        validate(run, "roman(a)", clamp_i64(a.unsigned_abs()), clamp_i64(rows));
        validate(run, "roman(b)", clamp_i64(b.unsigned_abs()), clamp_i64(cols));

        run.enter(PipelineState::Processing, "multiplication matrix", None)?;
        // One step per row plus one per cell.
        run.spend(rows.saturating_mul(cols).saturating_add(rows), "multiplication matrix")?;
        let matrix = UnitMatrix::new(rows as usize, cols as usize);
        for _ in 0..matrix.row_count() {
            run.pause(Pause::Step).await;
        }
        run.info_with(
            format!("{}×{} matrix created", rows, cols),
            json!({ "rows": rows, "cols": cols }),
        );
        run.pause(Pause::Cycle).await;
        let magnitude = matrix.sum();
        run.info_with(
            format!("matrix summed to {}", magnitude),
            json!({ "magnitude": magnitude }),
        );

        let negative = (a < 0) != (b < 0) && magnitude > 0;
        let product = if negative {
            Self::negate(run, magnitude).await?
        } else {
            i64::try_from(magnitude).map_err(|_| CalcError::Overflow {
                operation: "multiplication",
            })?
        };

        run.enter(PipelineState::Validating, "enterprise output", None)?;
        run.pause(Pause::Validate).await;
        Self::validate_output(run, product);

        let steps = run.steps();
        run.enter(
            PipelineState::Finalizing,
            product.to_string(),
            Some(json!({ "result": product, "steps": steps })),
        )?;

        Ok(product)
    }
}
