//! Enterprise Calculator core: trace contract, latency, run state machine
//!
//! Every operator pipeline composes these primitives: a [`PipelineRun`]
//! paced by the [`LatencyScheduler`], reporting to a shared
//! [`TraceEmitter`], with [`validation::validate`] after each decode.

pub mod complexity;
pub mod config;
pub mod context;
pub mod error;
pub mod latency;
pub mod run;
pub mod trace;
pub mod validation;

pub use complexity::Complexity;
pub use config::{LatencyProfile, RunConfig};
pub use context::RunContext;
pub use error::CalcError;
pub use latency::{LatencyScheduler, Pause};
pub use run::{PipelineRun, RunReport, StepBudget};
pub use trace::{EventDraft, EventKind, PipelineState, TraceEmitter, TraceEvent};
pub use validation::{validate, Validation};

/// Engine version reported by the API
pub const ECALC_VERSION: &str = "1.0.0";
