//! Division by repeated subtraction, transmitted in Morse
//!
//! A zero divisor aborts before any codec work. Otherwise both operands
//! make a Morse round-trip (mismatches are only warned about) and the
//! quotient is counted on the magnitudes of the inputs, one unit
//! decrement at a time, each decrement announced as a beep.

use async_trait::async_trait;
use serde_json::json;

use ecalc_codecs::morse::parity_signal;
use ecalc_codecs::{Codec, MorseCodec};
use ecalc_core::{validate, CalcError, Pause, PipelineRun, PipelineState};

use crate::paced;
use crate::{Operation, Operator};

const STATES: &[PipelineState] = &[
    PipelineState::Initializing,
    PipelineState::Encoding,
    PipelineState::Converting,
    PipelineState::Processing,
    PipelineState::Validating,
    PipelineState::Finalizing,
];

/// Steps a division charges to the budget: one per unit decrement plus
/// the metered Morse round-trips of both operands and of the result.
///
/// The quotient's Morse detour inside each cycle is paced but not charged,
/// so a run whose cost fits the budget always completes.
pub fn division_cost(a: i64, b: i64) -> u64 {
    let dividend = a.unsigned_abs();
    let divisor = b.unsigned_abs().max(1);
    let decrements = dividend - dividend % divisor;

    let quotient = i64::try_from(dividend / divisor).unwrap_or(i64::MAX);
    let result = if (a < 0) != (b < 0) { -quotient } else { quotient };
    let symbols = MorseCodec
        .encoded_len(a)
        .saturating_add(MorseCodec.encoded_len(b))
        .saturating_add(MorseCodec.encoded_len(result));

    decrements.saturating_add(symbols.saturating_mul(2))
}

#[derive(Debug, Default)]
pub struct DivisionPipeline;

impl DivisionPipeline {
    /// Quotient + 1, passed through Morse on the way.
    async fn increment_quotient(run: &PipelineRun, quotient: u64) -> Result<u64, CalcError> {
        run.pause(Pause::Symbol).await;
        let value = i64::try_from(quotient).map_err(|_| overflow())?;
        let morse = MorseCodec.encode(value);
        for _ in 0..morse.len() {
            run.pause(Pause::Symbol).await;
        }
        Ok(MorseCodec.decode(&morse).unsigned_abs() + 1)
    }
}

fn overflow() -> CalcError {
    CalcError::Overflow { operation: "division" }
}

#[async_trait]
impl Operation for DivisionPipeline {
    fn operator(&self) -> Operator {
        Operator::Divide
    }

    fn states(&self) -> &'static [PipelineState] {
        STATES
    }

    async fn execute(&self, run: &mut PipelineRun, a: i64, b: i64) -> Result<i64, CalcError> {
        run.pause(Pause::Stage).await;
        run.enter(
            PipelineState::Initializing,
            "enterprise division module",
            Some(json!({ "a": a, "b": b })),
        )?;

        if b == 0 {
            return Err(CalcError::DivisionByZero { dividend: a });
        }

        let mut dividend = a.unsigned_abs();
        let divisor = b.unsigned_abs();
        // Every unit of the dividend that is subtracted away is one step.
        let steps = dividend - dividend % divisor;
        run.check_budget(division_cost(a, b), "division")?;

        run.enter(PipelineState::Encoding, "numbers to Morse code", None)?;
        let a_morse = paced::encode(run, &MorseCodec, a).await?;
        let b_morse = paced::encode(run, &MorseCodec, b).await?;
        run.info_with(
            "Numbers in Morse code",
            json!({
                "dividend": MorseCodec.render(&a_morse),
                "divisor": MorseCodec.render(&b_morse),
            }),
        );

        run.enter(PipelineState::Converting, "Morse back to numbers", None)?;
        let a_number = paced::decode(run, &MorseCodec, &a_morse).await?;
        let b_number = paced::decode(run, &MorseCodec, &b_morse).await?;
        run.pause(Pause::Validate).await;
        validate(run, "morse(a)", a, a_number);
        validate(run, "morse(b)", b, b_number);

        run.enter(PipelineState::Processing, "repeated subtraction", None)?;
        run.spend(steps, "division")?;
        let mut quotient: u64 = 0;
        let mut transmission = Vec::new();
        while dividend >= divisor {
            run.pause(Pause::Cycle).await;
            let remaining = i64::try_from(dividend).unwrap_or(i64::MAX);
            let current = MorseCodec.render(&MorseCodec.encode(remaining));
            run.info_with(
                format!("Division iteration in Morse: {}", current),
                json!({ "dividend": dividend, "morse": current }),
            );
            transmission.push(current);

            for _ in 0..divisor {
                run.pause(Pause::Step).await;
                dividend -= 1;
                let signal = parity_signal(dividend);
                run.pause(if signal == '.' { Pause::Dot } else { Pause::Dash }).await;
                run.beep(signal, json!({ "remaining": dividend, "signal": signal.to_string() }));
            }
            quotient = Self::increment_quotient(run, quotient).await?;
        }

        let magnitude = i64::try_from(quotient).map_err(|_| overflow())?;
        let negative = (a < 0) != (b < 0);
        let result = if negative { -magnitude } else { magnitude };

        run.enter(PipelineState::Validating, "final Morse", None)?;
        run.pause(Pause::Validate).await;
        let final_morse = paced::encode(run, &MorseCodec, result).await?;
        let back = paced::decode(run, &MorseCodec, &final_morse).await?;
        run.info_with(
            format!("Final result in Morse: {}", MorseCodec.render(&final_morse)),
            json!({ "morse": MorseCodec.render(&final_morse), "validation": back }),
        );
        validate(run, "morse(result)", result, back);

        run.enter(
            PipelineState::Finalizing,
            result.to_string(),
            Some(json!({
                "result": result,
                "transmission": transmission.join(" / "),
            })),
        )?;

        Ok(result)
    }
}
