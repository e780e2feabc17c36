//! Run context: what every pipeline run borrows from its calculator
use std::sync::Arc;

use crate::config::RunConfig;
use crate::latency::LatencyScheduler;
use crate::trace::TraceEmitter;

#[derive(Clone)]
pub struct RunContext {
    pub emitter: Arc<TraceEmitter>,
    pub scheduler: LatencyScheduler,
    pub max_steps: u64,
}

impl RunContext {
    pub fn new(config: &RunConfig, emitter: Arc<TraceEmitter>) -> Self {
        Self {
            emitter,
            scheduler: LatencyScheduler::new(config.latency.clone()),
            max_steps: config.max_steps,
        }
    }

    /// Context with its own emitter sized from the config
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config, Arc::new(TraceEmitter::with_capacity(config.trace_capacity)))
    }
}
