//! Enterprise Calculator pipelines
//!
//! One orchestrator per operator. Each walks the same stage sequence,
//! routes its operands through an operator-specific codec chain and
//! reports every step to the trace emitter.
//!
//! # Pipeline Flow
//!
//! ```text
//! initializing → encoding → converting/transcribing → processing → validating → finalizing
//!      │             │                │                    │              │
//!   operands      symbols      decoded operands        arithmetic    result round-trip
//! ```

pub mod addition;
pub mod calculator;
pub mod division;
pub mod multiplication;
pub mod operator;
mod paced;
pub mod sound;
pub mod subtraction;

pub use addition::AdditionPipeline;
pub use calculator::{execute, Calculator};
pub use division::DivisionPipeline;
pub use multiplication::MultiplicationPipeline;
pub use operator::Operator;
pub use sound::{NotePlayer, RecordingPlayer, SoundError};
pub use subtraction::SubtractionPipeline;

use async_trait::async_trait;
use ecalc_core::{CalcError, PipelineRun, PipelineState};

/// Contract shared by the four operator pipelines
#[async_trait]
pub trait Operation: Send + Sync {
    fn operator(&self) -> Operator;

    /// Stage sequence this pipeline walks, first to last
    fn states(&self) -> &'static [PipelineState];

    /// Run the pipeline on `run`, returning the value shown on the display.
    async fn execute(&self, run: &mut PipelineRun, a: i64, b: i64) -> Result<i64, CalcError>;
}
