//! Codec calls paced by the latency scheduler
//!
//! One pause per call plus one per symbol; each symbol is charged to the
//! run's step budget.

use ecalc_codecs::{Codec, SymbolSequence};
use ecalc_core::{CalcError, Pause, PipelineRun};

pub(crate) async fn encode(
    run: &mut PipelineRun,
    codec: &dyn Codec,
    value: i64,
) -> Result<SymbolSequence, CalcError> {
    run.pause(Pause::Encode).await;
    let sequence = codec.encode(value);
    for _ in 0..sequence.len() {
        run.pause(Pause::Symbol).await;
    }
    run.spend(sequence.len() as u64, "encoding")?;
    Ok(sequence)
}

pub(crate) async fn decode(
    run: &mut PipelineRun,
    codec: &dyn Codec,
    sequence: &SymbolSequence,
) -> Result<i64, CalcError> {
    run.pause(Pause::Encode).await;
    for _ in 0..sequence.len() {
        run.pause(Pause::Symbol).await;
    }
    run.spend(sequence.len() as u64, "decoding")?;
    Ok(codec.decode(sequence))
}
