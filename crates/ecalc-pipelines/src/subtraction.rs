//! Subtraction: a musical detour that never touches the result
//!
//! Operands become melodies, the first is transposed up two semitones and
//! the second down two, then both are shifted back and decoded. The
//! difference itself is always `a - b` on the inputs.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use ecalc_codecs::melody::{format_melody, transpose};
use ecalc_codecs::{Codec, MelodyCodec, Note};
use ecalc_core::{validate, CalcError, Pause, PipelineRun, PipelineState};

use crate::paced;
use crate::sound::NotePlayer;
use crate::{Operation, Operator};

/// Transposition applied to the minuend
pub const TRANSPOSE_A: i32 = 2;
/// Transposition applied to the subtrahend
pub const TRANSPOSE_B: i32 = -2;

const STATES: &[PipelineState] = &[
    PipelineState::Initializing,
    PipelineState::Encoding,
    PipelineState::Converting,
    PipelineState::Processing,
    PipelineState::Validating,
    PipelineState::Finalizing,
];

#[derive(Default)]
pub struct SubtractionPipeline {
    player: Option<Arc<dyn NotePlayer>>,
}

impl SubtractionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(player: Arc<dyn NotePlayer>) -> Self {
        Self { player: Some(player) }
    }

    /// Announce a value as a note and hand it to the player, if any.
    async fn play(&self, run: &mut PipelineRun, value: i64) {
        run.pause(Pause::Play).await;
        let note = Note::for_value(value);
        run.info_with(
            format!("Playing: {} → ♪{} ({}Hz)", value, note.name, note.frequency_hz),
            json!({
                "value": value,
                "note": note.name,
                "frequency_hz": note.frequency_hz,
                "duration_secs": note.duration_secs,
            }),
        );

        if let Some(player) = &self.player {
            if let Err(e) = player.play(&note) {
                tracing::debug!(run_id = %run.id(), error = %e, "note playback failed");
            }
        }
    }
}

#[async_trait]
impl Operation for SubtractionPipeline {
    fn operator(&self) -> Operator {
        Operator::Subtract
    }

    fn states(&self) -> &'static [PipelineState] {
        STATES
    }

    async fn execute(&self, run: &mut PipelineRun, a: i64, b: i64) -> Result<i64, CalcError> {
        run.pause(Pause::Stage).await;
        run.enter(
            PipelineState::Initializing,
            "enterprise subtraction module",
            Some(json!({ "a": a, "b": b })),
        )?;

        run.enter(PipelineState::Encoding, "numbers to melodies", None)?;
        let a_melody = paced::encode(run, &MelodyCodec, a).await?;
        let b_melody = paced::encode(run, &MelodyCodec, b).await?;
        for (value, melody) in [(a, &a_melody), (b, &b_melody)] {
            run.info_with(
                format!("Number {} → Notes: {}", value, format_melody(melody)),
                json!({ "value": value, "notes": melody }),
            );
        }

        run.enter(PipelineState::Converting, "transposing melodies", None)?;
        run.pause(Pause::Transcribe).await;
        let a_transposed = transpose(&a_melody, TRANSPOSE_A);
        run.pause(Pause::Transcribe).await;
        let b_transposed = transpose(&b_melody, TRANSPOSE_B);
        for (melody, transposed, semitones) in [
            (&a_melody, &a_transposed, TRANSPOSE_A),
            (&b_melody, &b_transposed, TRANSPOSE_B),
        ] {
            run.info_with(
                format!(
                    "Original {} → Transposed: {} ({:+} semitones)",
                    format_melody(melody),
                    format_melody(transposed),
                    semitones
                ),
                json!({ "original": melody, "transposed": transposed, "semitones": semitones }),
            );
        }

        let a_restored = transpose(&a_transposed, -TRANSPOSE_A);
        let b_restored = transpose(&b_transposed, -TRANSPOSE_B);
        let a_number = paced::decode(run, &MelodyCodec, &a_restored).await?;
        let b_number = paced::decode(run, &MelodyCodec, &b_restored).await?;
        for (melody, number) in [(&a_transposed, a_number), (&b_transposed, b_number)] {
            run.info_with(
                format!("Notes {} → Number: {}", format_melody(melody), number),
                json!({ "notes": melody, "number": number }),
            );
        }
        validate(run, "melody(a)", a, a_number);
        validate(run, "melody(b)", b, b_number);

        run.enter(PipelineState::Processing, "subtracting", None)?;
        let difference = a
            .checked_sub(b)
            .ok_or(CalcError::Overflow { operation: "subtraction" })?;
        run.info_with(
            format!("{} - {} = {}", a, b, difference),
            json!({ "a": a, "b": b, "difference": difference }),
        );
        for value in [a_number, b_number, difference] {
            self.play(run, value).await;
        }

        run.enter(PipelineState::Validating, "result through melody", None)?;
        let result_melody = paced::encode(run, &MelodyCodec, difference).await?;
        run.info_with(
            format!("Result to Notes: {} → {}", difference, format_melody(&result_melody)),
            json!({ "notes": result_melody }),
        );
        let final_transposition = transpose(&result_melody, 0);
        run.info_with(
            format!(
                "Final Transposition: {} → {}",
                format_melody(&result_melody),
                format_melody(&final_transposition)
            ),
            json!({ "notes": final_transposition }),
        );
        let decoded = paced::decode(run, &MelodyCodec, &final_transposition).await?;
        validate(run, "melody(result)", difference, decoded);

        run.enter(
            PipelineState::Finalizing,
            difference.to_string(),
            Some(json!({
                "result": difference,
                "notes": MelodyCodec.render(&final_transposition),
            })),
        )?;

        Ok(difference)
    }
}
