//! Unified error model for pipeline runs
use thiserror::Error;

use crate::trace::PipelineState;

/// Conditions that abort a run and cross the pipeline boundary.
///
/// Round-trip mismatches are never represented here; they are reported
/// as warning trace events and the run carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("MATH/DIV0: division by zero ({dividend} / 0)")]
    DivisionByZero { dividend: i64 },

    #[error("MATH/OVERFLOW: {operation} left the i64 range")]
    Overflow { operation: &'static str },

    #[error("BUDGET/EXHAUSTED: {operation} needs more than {limit} steps")]
    StepBudgetExceeded { operation: &'static str, limit: u64 },

    #[error("STATE/ORDER: expected {expected:?}, got {got:?}")]
    StateOrder {
        expected: Option<PipelineState>,
        got: PipelineState,
    },

    #[error("OP/UNKNOWN: {0}")]
    UnknownOperator(String),

    #[error("CONFIG/{0}")]
    Config(String),
}

impl CalcError {
    /// Whether the error is the arithmetic-domain failure the keypad
    /// shows as `ERROR` (as opposed to a resource or programming failure).
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::DivisionByZero { .. } | Self::Overflow { .. })
    }
}
