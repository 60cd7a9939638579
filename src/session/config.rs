use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::VoiceSettings;
use crate::transport::DEFAULT_READ_BUFFER_SIZE;

/// Configuration for a speech session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Socket URI with a `{voice_id}` placeholder
    pub endpoint_template: String,

    /// Generation parameters sent in the handshake
    pub voice_settings: VoiceSettings,

    /// Directory for generated audio files
    pub output_dir: PathBuf,

    pub file_prefix: String,

    pub file_extension: String,

    /// Size of each physical socket read
    /// Default: 8192 bytes
    pub read_buffer_size: usize,

    /// Upper bound for the whole session, independent of caller cancellation
    pub deadline: Option<Duration>,

    /// Upper bound for the cleanup close handshake
    pub close_timeout: Duration,
}

impl SessionConfig {
    pub fn endpoint_uri(&self, voice_id: &str) -> String {
        self.endpoint_template.replace("{voice_id}", voice_id)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint_template: "wss://api.elevenlabs.io/v1/text-to-speech/{voice_id}/stream-input"
                .to_string(),
            voice_settings: VoiceSettings::default(),
            output_dir: PathBuf::from("audio_files"),
            file_prefix: "speech".to_string(),
            file_extension: ".mp3".to_string(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            deadline: Some(Duration::from_secs(120)),
            close_timeout: Duration::from_secs(5),
        }
    }
}
