//! Addition: operands travel through DNA and RNA before being summed
//!
//! ```text
//! a, b ─▶ DNA ─▶ RNA ─▶ protein synthesis ─▶ a', b' ─▶ a' + b'
//!                                                       │
//!       result ◀─ synthesis ◀─ RNA ◀─ DNA ◀─────────────┘
//! ```
//!
//! The sum is taken over the decoded operands, not the inputs, so the
//! returned value depends on the codec round-trips.

use async_trait::async_trait;
use serde_json::json;

use ecalc_codecs::dna::{bracketed, is_valid_dna, transcribe};
use ecalc_codecs::{Codec, DnaCodec, RnaCodec};
use ecalc_core::{validate, CalcError, Pause, PipelineRun, PipelineState};

use crate::paced;
use crate::{Operation, Operator};

const STATES: &[PipelineState] = &[
    PipelineState::Initializing,
    PipelineState::Encoding,
    PipelineState::Transcribing,
    PipelineState::Processing,
    PipelineState::Validating,
    PipelineState::Finalizing,
];

#[derive(Debug, Default)]
pub struct AdditionPipeline;

#[async_trait]
impl Operation for AdditionPipeline {
    fn operator(&self) -> Operator {
        Operator::Add
    }

    fn states(&self) -> &'static [PipelineState] {
        STATES
    }

    async fn execute(&self, run: &mut PipelineRun, a: i64, b: i64) -> Result<i64, CalcError> {
        run.pause(Pause::Stage).await;
        run.enter(
            PipelineState::Initializing,
            "enterprise addition module",
            Some(json!({ "a": a, "b": b })),
        )?;

        run.enter(PipelineState::Encoding, "numbers to DNA", None)?;
        let a_dna = paced::encode(run, &DnaCodec, a).await?;
        let b_dna = paced::encode(run, &DnaCodec, b).await?;
        for (label, value, dna) in [("A", a, &a_dna), ("B", b, &b_dna)] {
            run.info_with(
                format!("DNA Sequence {} → {}", label, DnaCodec.render(dna)),
                json!({ "operand": label, "value": value, "dna": DnaCodec.render(dna) }),
            );
        }

        run.enter(PipelineState::Transcribing, "DNA to RNA", None)?;
        run.pause(Pause::Transcribe).await;
        let a_rna = transcribe(&a_dna);
        run.pause(Pause::Transcribe).await;
        let b_rna = transcribe(&b_dna);
        for (label, rna) in [("A", &a_rna), ("B", &b_rna)] {
            run.info_with(
                format!("RNA Sequence {} → {}", label, RnaCodec.render(rna)),
                json!({ "operand": label, "rna": RnaCodec.render(rna) }),
            );
        }

        let a_synth = paced::decode(run, &RnaCodec, &a_rna).await?;
        let b_synth = paced::decode(run, &RnaCodec, &b_rna).await?;
        for (rna, number) in [(&a_rna, a_synth), (&b_rna, b_synth)] {
            run.info_with(
                format!("RNA {} → Number: {}", bracketed(rna), number),
                json!({ "rna": bracketed(rna), "number": number }),
            );
        }
        validate(run, "dna(a)", a, a_synth);
        validate(run, "dna(b)", b, b_synth);

        run.enter(PipelineState::Processing, "summing synthesized operands", None)?;
        let sum = a_synth
            .checked_add(b_synth)
            .ok_or(CalcError::Overflow { operation: "addition" })?;
        run.info_with(
            format!("{} + {} = {}", a_synth, b_synth, sum),
            json!({ "a": a_synth, "b": b_synth, "sum": sum }),
        );

        run.enter(PipelineState::Validating, "result through DNA", None)?;
        let result_dna = paced::encode(run, &DnaCodec, sum).await?;
        if !is_valid_dna(&result_dna) {
            run.warn("invalid DNA sequence detected", DnaCodec.render(&result_dna), None);
        }
        run.info_with(
            format!("Result DNA → {}", DnaCodec.render(&result_dna)),
            json!({ "dna": DnaCodec.render(&result_dna) }),
        );
        run.pause(Pause::Transcribe).await;
        let result_rna = transcribe(&result_dna);
        run.info_with(
            format!("Result RNA → {}", RnaCodec.render(&result_rna)),
            json!({ "rna": RnaCodec.render(&result_rna) }),
        );
        let result = paced::decode(run, &RnaCodec, &result_rna).await?;
        validate(run, "dna(result)", sum, result);

        run.enter(
            PipelineState::Finalizing,
            result.to_string(),
            Some(json!({
                "result": result,
                "dna": DnaCodec.render(&result_dna),
                "rna": bracketed(&result_rna),
            })),
        )?;

        Ok(result)
    }
}
