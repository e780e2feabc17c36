//! Sound port: optional, best-effort note playback
//!
//! The subtraction pipeline announces every value it plays as a trace
//! event. Attaching a [`NotePlayer`] additionally hands the note to a real
//! output; its failures are logged and otherwise ignored.

use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

use ecalc_codecs::Note;

#[derive(Error, Debug)]
pub enum SoundError {
    #[error("SOUND/UNAVAILABLE: {0}")]
    Unavailable(String),
}

pub trait NotePlayer: Send + Sync {
    fn play(&self, note: &Note) -> Result<(), SoundError>;
}

/// Keeps the most recently played notes, like the music sheet does.
pub struct RecordingPlayer {
    notes: Mutex<VecDeque<Note>>,
    capacity: usize,
}

impl RecordingPlayer {
    pub const DEFAULT_CAPACITY: usize = 30;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notes: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes
            .lock()
            .map(|notes| notes.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for RecordingPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl NotePlayer for RecordingPlayer {
    fn play(&self, note: &Note) -> Result<(), SoundError> {
        let mut notes = self
            .notes
            .lock()
            .map_err(|e| SoundError::Unavailable(e.to_string()))?;
        notes.push_back(note.clone());
        while notes.len() > self.capacity {
            notes.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_player_keeps_window() {
        let player = RecordingPlayer::with_capacity(2);
        for value in [1, 2, 3] {
            player.play(&Note::for_value(value)).unwrap();
        }
        let names: Vec<String> = player.notes().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["E4", "F4"]);
    }
}
