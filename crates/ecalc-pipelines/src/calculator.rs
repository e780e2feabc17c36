//! Calculator: dispatches an operator to its pipeline and owns the
//! shared trace emitter
use std::sync::Arc;
use tracing::Instrument;

use ecalc_core::{
    CalcError, PipelineRun, RunConfig, RunContext, RunReport, TraceEmitter, TraceEvent,
};

use crate::sound::NotePlayer;
use crate::{
    AdditionPipeline, DivisionPipeline, MultiplicationPipeline, Operation, Operator,
    SubtractionPipeline,
};

/// Run one pipeline end to end.
///
/// On a fatal error an `error` event is emitted in whatever stage the run
/// reached, and the error is returned with no partial result.
pub async fn execute(
    operation: &dyn Operation,
    ctx: &RunContext,
    a: i64,
    b: i64,
) -> Result<RunReport, CalcError> {
    let op = operation.operator();
    let mut run = PipelineRun::new(op.name(), (a, b), operation.states(), ctx);
    let span = tracing::info_span!("pipeline_run", run_id = %run.id(), op = op.name());

    async move {
        tracing::info!(a, b, "run started");
        match operation.execute(&mut run, a, b).await {
            Ok(result) => {
                let report = run.finish(result)?;
                tracing::info!(
                    result,
                    steps = report.steps,
                    warnings = report.warnings().count(),
                    "run finished"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(error = %err, "run aborted");
                run.error(err.to_string());
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

pub struct Calculator {
    config: RunConfig,
    ctx: RunContext,
    addition: AdditionPipeline,
    subtraction: SubtractionPipeline,
    multiplication: MultiplicationPipeline,
    division: DivisionPipeline,
}

impl Calculator {
    pub fn new(config: RunConfig) -> Self {
        Self::build(config, SubtractionPipeline::new())
    }

    /// Calculator whose subtraction pipeline plays notes through `player`
    pub fn with_player(config: RunConfig, player: Arc<dyn NotePlayer>) -> Self {
        Self::build(config, SubtractionPipeline::with_player(player))
    }

    fn build(config: RunConfig, subtraction: SubtractionPipeline) -> Self {
        let ctx = RunContext::from_config(&config);
        Self {
            config,
            ctx,
            addition: AdditionPipeline,
            subtraction,
            multiplication: MultiplicationPipeline,
            division: DivisionPipeline,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn emitter(&self) -> Arc<TraceEmitter> {
        Arc::clone(&self.ctx.emitter)
    }

    /// Events emitted since the last drain, oldest first
    pub fn drain(&self) -> Vec<TraceEvent> {
        self.ctx.emitter.drain()
    }

    pub fn pipeline(&self, op: Operator) -> &dyn Operation {
        match op {
            Operator::Add => &self.addition,
            Operator::Subtract => &self.subtraction,
            Operator::Multiply => &self.multiplication,
            Operator::Divide => &self.division,
        }
    }

    /// Run `a op b` and keep the full report
    pub async fn run(&self, op: Operator, a: i64, b: i64) -> Result<RunReport, CalcError> {
        execute(self.pipeline(op), &self.ctx, a, b).await
    }

    pub async fn operate(&self, op: Operator, a: i64, b: i64) -> Result<i64, CalcError> {
        self.run(op, a, b).await.map(|report| report.result)
    }

    pub async fn add(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.operate(Operator::Add, a, b).await
    }

    pub async fn subtract(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.operate(Operator::Subtract, a, b).await
    }

    pub async fn multiply(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.operate(Operator::Multiply, a, b).await
    }

    pub async fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.operate(Operator::Divide, a, b).await
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}
