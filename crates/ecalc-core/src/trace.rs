//! Trace events and the bounded emitter polled by the presentation layer
//!
//! Every pipeline stage transition produces a [`TraceEvent`]. The
//! [`TraceEmitter`] keeps only the most recent events; a slow consumer
//! simply loses the oldest ones.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// Conceptual stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Initializing,
    Encoding,
    Converting,
    Transcribing,
    Processing,
    Validating,
    Finalizing,
}

impl PipelineState {
    /// Wire name, also used as the message of the transition event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Encoding => "encoding",
            Self::Converting => "converting",
            Self::Transcribing => "transcribing",
            Self::Processing => "processing",
            Self::Validating => "validating",
            Self::Finalizing => "finalizing",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Info,
    Warning,
    Error,
    Beep,
}

/// A single structured trace record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Process-wide emission order, assigned by the emitter
    pub seq: u64,

    /// Run this event belongs to
    pub run_id: Uuid,

    /// Emission time, strictly increasing across the emitter
    pub timestamp: DateTime<Utc>,

    /// Stage the run was in when the event was emitted
    pub stage: PipelineState,

    pub kind: EventKind,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TraceEvent {
    pub fn is_warning(&self) -> bool {
        self.kind == EventKind::Warning
    }
}

/// Draft of an event before the emitter stamps it.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub run_id: Uuid,
    pub stage: PipelineState,
    pub kind: EventKind,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    pub warning: Option<String>,
}

impl EventDraft {
    pub fn new(
        run_id: Uuid,
        stage: PipelineState,
        kind: EventKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            stage,
            kind,
            message: message.into(),
            payload: None,
            warning: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

struct Buffer {
    events: VecDeque<TraceEvent>,
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
    dropped: u64,
}

/// Bounded, append-only event log.
///
/// `emit` and `drain` are serialized through one mutex, so the emitter can
/// be shared between the pipeline and a polling consumer.
pub struct TraceEmitter {
    buffer: Mutex<Buffer>,
    capacity: usize,
}

impl TraceEmitter {
    /// Default number of retained events
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create with a custom window size. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Mutex::new(Buffer {
                events: VecDeque::with_capacity(capacity),
                next_seq: 0,
                last_timestamp: None,
                dropped: 0,
            }),
            capacity,
        }
    }

    /// Stamp and append an event, evicting the oldest if over capacity.
    /// Returns the stamped event.
    pub fn emit(&self, draft: EventDraft) -> TraceEvent {
        let mut buffer = self.lock();

        let now = Utc::now();
        let timestamp = match buffer.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        buffer.last_timestamp = Some(timestamp);

        let event = TraceEvent {
            seq: buffer.next_seq,
            run_id: draft.run_id,
            timestamp,
            stage: draft.stage,
            kind: draft.kind,
            message: draft.message,
            payload: draft.payload,
            warning: draft.warning,
        };
        buffer.next_seq += 1;

        buffer.events.push_back(event.clone());
        while buffer.events.len() > self.capacity {
            buffer.events.pop_front();
            buffer.dropped += 1;
        }

        event
    }

    /// Take every retained event, oldest first.
    pub fn drain(&self) -> Vec<TraceEvent> {
        self.lock().events.drain(..).collect()
    }

    /// Copy of the retained events without consuming them
    pub fn snapshot(&self) -> Vec<TraceEvent> {
        self.lock().events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events evicted before anyone drained them
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }

    pub fn clear(&self) {
        self.lock().events.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffer> {
        // The deque is never left half-written, so poisoning is ignored.
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TraceEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(i: usize) -> EventDraft {
        EventDraft::new(
            Uuid::nil(),
            PipelineState::Processing,
            EventKind::Info,
            format!("event {}", i),
        )
    }

    #[test]
    fn test_emitter_keeps_most_recent() {
        let emitter = TraceEmitter::with_capacity(5);
        for i in 0..12 {
            emitter.emit(draft(i));
        }

        let events = emitter.drain();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].message, "event 7");
        assert_eq!(events[4].message, "event 11");
        assert_eq!(emitter.dropped(), 7);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_drain_returns_only_new_events() {
        let emitter = TraceEmitter::new();
        emitter.emit(draft(0));
        assert_eq!(emitter.drain().len(), 1);

        emitter.emit(draft(1));
        let events = emitter.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].seq, 1);
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let emitter = TraceEmitter::with_capacity(100);
        for i in 0..50 {
            emitter.emit(draft(i));
        }

        let events = emitter.snapshot();
        for pair in events.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
            assert!(pair[0].seq < pair[1].seq);
        }
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let emitter = TraceEmitter::new();
        let event = emitter.emit(
            EventDraft::new(Uuid::nil(), PipelineState::Validating, EventKind::Warning, "mismatch")
                .with_warning("3 != 0"),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "validating");
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["warning"], "3 != 0");
        assert!(json.get("payload").is_none());
    }
}
