//! Run configuration profiles
//!
//! Controls trace retention, the simulated-iteration step budget and the
//! artificial latency applied between stages.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CalcError;

/// Configuration shared by every pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Profile name (e.g., "realtime", "instant")
    pub name: String,

    /// Number of trace events the emitter retains
    pub trace_capacity: usize,

    /// Maximum simulated steps (beeps, matrix cells, negate steps) per run
    pub max_steps: u64,

    pub latency: LatencyProfile,
}

/// Base delays in milliseconds for each kind of pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    /// When false every wait completes immediately
    pub enabled: bool,

    /// Jitter upper bound as a fraction of the base delay
    pub jitter_fraction: f64,

    // === Stage pacing ===
    pub stage: u64,
    pub encode: u64,
    pub symbol: u64,
    pub transcribe: u64,
    pub validate: u64,

    // === Simulated iteration ===
    pub cycle: u64,
    pub step: u64,
    pub dot: u64,
    pub dash: u64,
    pub play: u64,
}

impl LatencyProfile {
    /// Pacing close to the original keypad
    pub fn realtime() -> Self {
        Self {
            enabled: true,
            jitter_fraction: 0.5,
            stage: 300,
            encode: 100,
            symbol: 25,
            transcribe: 75,
            validate: 50,
            cycle: 50,
            step: 10,
            dot: 50,
            dash: 150,
            play: 50,
        }
    }

    /// No waiting at all
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::realtime()
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::realtime()
    }
}

impl RunConfig {
    pub const DEFAULT_MAX_STEPS: u64 = 100_000;

    /// Animated profile for an interactive presentation layer
    pub fn realtime() -> Self {
        Self {
            name: "realtime".to_string(),
            trace_capacity: 10,
            max_steps: Self::DEFAULT_MAX_STEPS,
            latency: LatencyProfile::realtime(),
        }
    }

    /// Same semantics, no latency. Used by tests and batch callers.
    pub fn instant() -> Self {
        Self {
            name: "instant".to_string(),
            trace_capacity: 10,
            max_steps: Self::DEFAULT_MAX_STEPS,
            latency: LatencyProfile::disabled(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Load config from YAML; missing fields fall back to `realtime`.
    pub fn from_yaml(yaml: &str) -> Result<Self, CalcError> {
        serde_yaml::from_str(yaml).map_err(|e| CalcError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CalcError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CalcError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&raw)
    }

    /// Get profile by name
    pub fn for_profile(name: &str) -> Self {
        match name {
            "instant" => Self::instant(),
            "realtime" => Self::realtime(),
            _ => Self::realtime(), // Default to realtime
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::realtime()
    }
}
