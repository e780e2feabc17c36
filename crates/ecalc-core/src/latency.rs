//! Latency scheduler: randomized pauses that pace every stage
use rand::Rng;
use std::time::Duration;

use crate::config::LatencyProfile;

/// Named pauses, resolved against a [`LatencyProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Stage,
    Encode,
    Symbol,
    Transcribe,
    Validate,
    Cycle,
    Step,
    Dot,
    Dash,
    Play,
}

#[derive(Debug, Clone)]
pub struct LatencyScheduler {
    profile: LatencyProfile,
}

impl LatencyScheduler {
    pub fn new(profile: LatencyProfile) -> Self {
        Self { profile }
    }

    /// Scheduler whose waits complete immediately
    pub fn instant() -> Self {
        Self::new(LatencyProfile::disabled())
    }

    pub fn profile(&self) -> &LatencyProfile {
        &self.profile
    }

    /// Suspend for `base_ms + U(0, base_ms * jitter_fraction)`.
    pub async fn wait(&self, base_ms: u64) {
        let delay = self.delay_for(base_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub async fn pause(&self, pause: Pause) {
        self.wait(self.base_ms(pause)).await;
    }

    /// The randomized delay `wait` would use. Zero when latency is disabled.
    pub fn delay_for(&self, base_ms: u64) -> Duration {
        if !self.profile.enabled {
            return Duration::ZERO;
        }
        let max_jitter = base_ms as f64 * self.profile.jitter_fraction.max(0.0);
        let jitter = if max_jitter > 0.0 {
            rand::rng().random_range(0.0..=max_jitter)
        } else {
            0.0
        };
        Duration::from_millis(base_ms) + Duration::from_secs_f64(jitter / 1000.0)
    }

    pub fn base_ms(&self, pause: Pause) -> u64 {
        let p = &self.profile;
        match pause {
            Pause::Stage => p.stage,
            Pause::Encode => p.encode,
            Pause::Symbol => p.symbol,
            Pause::Transcribe => p.transcribe,
            Pause::Validate => p.validate,
            Pause::Cycle => p.cycle,
            Pause::Step => p.step,
            Pause::Dot => p.dot,
            Pause::Dash => p.dash,
            Pause::Play => p.play,
        }
    }
}

impl Default for LatencyScheduler {
    fn default() -> Self {
        Self::new(LatencyProfile::default())
    }
}
