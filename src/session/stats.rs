use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a speech session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in seconds
    pub duration_secs: f64,

    /// Logical messages received while draining
    pub messages_received: usize,

    /// Fragments that carried audio and were persisted
    pub audio_chunks: usize,

    /// Decoded audio bytes written to the output file
    pub bytes_written: u64,

    /// Characters covered by alignment metadata
    pub aligned_chars: usize,

    /// Fragments dropped because their payload could not be decoded
    pub skipped_fragments: usize,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_secs: 0.0,
            messages_received: 0,
            audio_chunks: 0,
            bytes_written: 0,
            aligned_chars: 0,
            skipped_fragments: 0,
        }
    }

    pub(crate) fn finish(&mut self) {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        self.duration_secs = elapsed.num_milliseconds() as f64 / 1000.0;
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
