use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::VoiceSettings;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub api: ApiConfig,
    pub voice: VoiceSettings,
    pub output: OutputConfig,
    pub session: SessionTuning,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "speech-stream".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    /// Endpoint path; `{voice_id}` is substituted per session
    pub endpoint: String,
    pub voice_id: String,
    /// Request header carrying the API key
    pub key_header: String,
    /// Environment variable holding the API key
    pub key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "api.elevenlabs.io".to_string(),
            endpoint: "v1/text-to-speech/{voice_id}/stream-input".to_string(),
            voice_id: "9BWtsMINqrJLrRacOk9x".to_string(),
            key_header: "xi-api-key".to_string(),
            key_env: "ELEVENLABS_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub prefix: String,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "audio_files".to_string(),
            prefix: "speech".to_string(),
            extension: ".mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Size of each physical socket read
    pub read_buffer_size: usize,
    /// Whole-session deadline in seconds (0 = none)
    pub deadline_secs: u64,
    /// Upper bound for the cleanup close handshake
    pub close_timeout_secs: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            read_buffer_size: 8192,
            deadline_secs: 120,
            close_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load defaults, then `path` (if present), then `SPEECH_STREAM_*` env overrides
    ///
    /// Nested keys use `__`, e.g. `SPEECH_STREAM_API__VOICE_ID`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SPEECH_STREAM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let cfg: Self = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        cfg.voice.validate().context("Invalid voice settings")?;

        Ok(cfg)
    }

    /// Output directory with `~` expanded
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output.directory).as_ref())
    }

    pub fn endpoint_template(&self) -> String {
        format!(
            "wss://{}/{}",
            self.api.host.trim_end_matches('/'),
            self.api.endpoint.trim_start_matches('/')
        )
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            endpoint_template: self.endpoint_template(),
            voice_settings: self.voice.clone(),
            output_dir: self.output_dir(),
            file_prefix: self.output.prefix.clone(),
            file_extension: self.output.extension.clone(),
            read_buffer_size: self.session.read_buffer_size,
            deadline: match self.session.deadline_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            close_timeout: Duration::from_secs(self.session.close_timeout_secs),
        }
    }
}
