//! Pipeline run: the ephemeral state of one operator invocation
//!
//! A run walks a fixed sequence of [`PipelineState`]s, strictly forward.
//! Every transition emits one `info` event named after the state; any
//! further events are attributed to the state the run is currently in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::complexity::Complexity;
use crate::context::RunContext;
use crate::error::CalcError;
use crate::latency::{LatencyScheduler, Pause};
use crate::trace::{EventDraft, EventKind, PipelineState, TraceEmitter, TraceEvent};

/// Step counter with a hard ceiling
#[derive(Debug, Clone)]
pub struct StepBudget {
    limit: u64,
    spent: u64,
}

impl StepBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, spent: 0 }
    }

    /// Charge `steps`, failing without charging if that would pass the limit.
    pub fn spend(&mut self, steps: u64, operation: &'static str) -> Result<(), CalcError> {
        match self.spent.checked_add(steps) {
            Some(total) if total <= self.limit => {
                self.spent = total;
                Ok(())
            }
            _ => Err(CalcError::StepBudgetExceeded {
                operation,
                limit: self.limit,
            }),
        }
    }

    /// Fail if `steps` more would pass the limit, without charging.
    pub fn check(&self, steps: u64, operation: &'static str) -> Result<(), CalcError> {
        self.clone().spend(steps, operation)
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.spent
    }
}

/// What a finished run hands back to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub operator: String,
    pub operands: (i64, i64),
    pub result: i64,
    pub events: Vec<TraceEvent>,
    pub steps: u64,
    pub complexity: Complexity,
}

impl RunReport {
    pub fn warnings(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(|e| e.is_warning())
    }

    pub fn events_in(&self, stage: PipelineState) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.stage == stage)
    }
}

pub struct PipelineRun {
    id: Uuid,
    operator: &'static str,
    operands: (i64, i64),
    sequence: &'static [PipelineState],
    cursor: Option<usize>,
    events: Vec<TraceEvent>,
    emitter: Arc<TraceEmitter>,
    scheduler: LatencyScheduler,
    budget: StepBudget,
}

impl PipelineRun {
    pub fn new(
        operator: &'static str,
        operands: (i64, i64),
        sequence: &'static [PipelineState],
        ctx: &RunContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            operator,
            operands,
            sequence,
            cursor: None,
            events: Vec::new(),
            emitter: Arc::clone(&ctx.emitter),
            scheduler: ctx.scheduler.clone(),
            budget: StepBudget::new(ctx.max_steps),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operator(&self) -> &'static str {
        self.operator
    }

    /// Current state; `None` before the first transition
    pub fn state(&self) -> Option<PipelineState> {
        self.cursor.map(|i| self.sequence[i])
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn steps(&self) -> u64 {
        self.budget.spent()
    }

    /// Advance to `state`, which must be the next one in the sequence.
    pub fn enter(
        &mut self,
        state: PipelineState,
        detail: impl Into<String>,
        payload: Option<Value>,
    ) -> Result<(), CalcError> {
        let next = self.cursor.map_or(0, |i| i + 1);
        let expected = self.sequence.get(next).copied();
        if expected != Some(state) {
            return Err(CalcError::StateOrder { expected, got: state });
        }
        self.cursor = Some(next);

        let mut payload = payload;
        if next + 1 == self.sequence.len() {
            let complexity = Complexity::from_steps(self.budget.spent());
            let badge = serde_json::to_value(complexity).unwrap_or(Value::Null);
            match payload.as_mut() {
                Some(Value::Object(fields)) => {
                    fields.insert("complexity".to_string(), badge);
                }
                Some(_) => {}
                None => payload = Some(json!({ "complexity": badge })),
            }
        }

        tracing::debug!(run_id = %self.id, op = self.operator, state = %state, "stage transition");
        let detail = detail.into();
        let message = if detail.is_empty() {
            state.as_str().to_string()
        } else {
            format!("{}: {}", state.as_str(), detail)
        };
        self.push(EventKind::Info, message, payload, None);
        Ok(())
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(EventKind::Info, message.into(), None, None);
    }

    pub fn info_with(&mut self, message: impl Into<String>, payload: Value) {
        self.push(EventKind::Info, message.into(), Some(payload), None);
    }

    pub fn warn(
        &mut self,
        message: impl Into<String>,
        warning: impl Into<String>,
        payload: Option<Value>,
    ) {
        self.push(EventKind::Warning, message.into(), payload, Some(warning.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(EventKind::Error, message.into(), None, None);
    }

    pub fn beep(&mut self, signal: char, payload: Value) {
        self.push(EventKind::Beep, format!("BEEP {}", signal), Some(payload), None);
    }

    /// Charge simulated work against the run's step budget.
    pub fn spend(&mut self, steps: u64, operation: &'static str) -> Result<(), CalcError> {
        self.budget.spend(steps, operation)
    }

    pub fn check_budget(&self, steps: u64, operation: &'static str) -> Result<(), CalcError> {
        self.budget.check(steps, operation)
    }

    pub async fn pause(&self, pause: Pause) {
        self.scheduler.pause(pause).await;
    }

    /// Close the run. The final state must have been reached.
    pub fn finish(self, result: i64) -> Result<RunReport, CalcError> {
        let last = self.sequence.len().checked_sub(1);
        if self.cursor != last {
            let expected = self.cursor.map_or(0, |i| i + 1);
            return Err(CalcError::StateOrder {
                expected: self.sequence.get(expected).copied(),
                got: self.state().unwrap_or(PipelineState::Initializing),
            });
        }

        let steps = self.budget.spent();
        Ok(RunReport {
            run_id: self.id,
            operator: self.operator.to_string(),
            operands: self.operands,
            result,
            events: self.events,
            steps,
            complexity: Complexity::from_steps(steps),
        })
    }

    fn push(
        &mut self,
        kind: EventKind,
        message: String,
        payload: Option<Value>,
        warning: Option<String>,
    ) {
        let stage = self
            .state()
            .or_else(|| self.sequence.first().copied())
            .unwrap_or(PipelineState::Initializing);

        let mut draft = EventDraft::new(self.id, stage, kind, message);
        draft.payload = payload;
        draft.warning = warning;

        let event = self.emitter.emit(draft);
        self.events.push(event);
    }
}
