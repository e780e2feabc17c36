//! Round-trip validation stage
//!
//! Purely observational: a mismatch becomes a warning event and a
//! `tracing` warning, never an error.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::run::PipelineRun;

/// Outcome of one round-trip comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub label: String,
    pub original: i64,
    pub round_tripped: i64,
    pub passed: bool,
}

/// Compare `original` with its decoded counterpart and record the outcome
/// on the run.
pub fn validate(
    run: &mut PipelineRun,
    label: &str,
    original: i64,
    round_tripped: i64,
) -> Validation {
    let passed = original == round_tripped;
    let payload = json!({
        "label": label,
        "original": original,
        "round_tripped": round_tripped,
    });

    if passed {
        run.info_with(format!("{} round-trip ok", label), payload);
    } else {
        tracing::warn!(
            run_id = %run.id(),
            label,
            original,
            round_tripped,
            "round-trip mismatch"
        );
        run.warn(
            format!("{} round-trip mismatch", label),
            format!("{} != {}", original, round_tripped),
            Some(payload),
        );
    }

    Validation {
        label: label.to_string(),
        original,
        round_tripped,
        passed,
    }
}
