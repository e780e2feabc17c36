//! Prometheus counters behind `/metrics`
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use ecalc_pipelines::Operator;

pub struct ApiMetrics {
    registry: Registry,
    runs: IntCounterVec,
    failures: IntCounterVec,
    warnings: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let runs = IntCounterVec::new(
            Opts::new("ecalc_runs_total", "Pipeline runs started, by operator"),
            &["op"],
        )?;
        let failures = IntCounterVec::new(
            Opts::new("ecalc_run_failures_total", "Pipeline runs aborted by a fatal error"),
            &["op"],
        )?;
        let warnings = IntCounter::new(
            "ecalc_trace_warnings_total",
            "Round-trip mismatches reported as warning events",
        )?;

        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(failures.clone()))?;
        registry.register(Box::new(warnings.clone()))?;

        Ok(Self {
            registry,
            runs,
            failures,
            warnings,
        })
    }

    pub fn record_run(&self, op: Operator) {
        self.runs.with_label_values(&[op.name()]).inc();
    }

    pub fn record_failure(&self, op: Operator) {
        self.failures.with_label_values(&[op.name()]).inc();
    }

    pub fn record_warnings(&self, count: usize) {
        self.warnings.inc_by(count as u64);
    }

    /// Text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
