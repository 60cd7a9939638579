use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechError};

/// Generation parameters sent once in the handshake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// 0.0 to 1.0
    pub stability: f64,
    /// 0.0 to 1.0
    pub similarity_boost: f64,
    pub speed: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.8,
            speed: 1.0,
        }
    }
}

impl VoiceSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.stability) {
            return Err(SpeechError::InvalidInput(format!(
                "stability must be within [0, 1], got {}",
                self.stability
            )));
        }
        if !(0.0..=1.0).contains(&self.similarity_boost) {
            return Err(SpeechError::InvalidInput(format!(
                "similarity_boost must be within [0, 1], got {}",
                self.similarity_boost
            )));
        }
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(SpeechError::InvalidInput(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// First outbound message of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitMessage {
    pub text: String,
    pub voice_settings: VoiceSettings,
}

impl InitMessage {
    /// Handshake with a single-space seed, which primes generation without audible output
    pub fn new(voice_settings: VoiceSettings) -> Self {
        Self {
            text: " ".to_string(),
            voice_settings,
        }
    }
}

/// Text pushed to the server during streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunkMessage {
    pub text: String,
    pub try_trigger_generation: bool,
}

impl TextChunkMessage {
    pub fn new(text: impl Into<String>, try_trigger_generation: bool) -> Self {
        Self {
            text: text.into(),
            try_trigger_generation,
        }
    }

    /// Empty-text chunk marking the end of input
    pub fn finalize() -> Self {
        Self::new("", false)
    }

    pub fn is_finalize(&self) -> bool {
        self.text.is_empty()
    }
}

/// Per-character timing attached to an audio fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alignment {
    pub chars: Vec<String>,
    #[serde(alias = "charStartTimesMs")]
    pub char_start_times_ms: Vec<i64>,
    #[serde(alias = "charsDurationsMs", alias = "charDurationsMs")]
    pub chars_durations_ms: Vec<i64>,
}

/// Inbound fragment: base64 audio plus optional alignment metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioChunkMessage {
    /// Base64 audio; empty or null on control messages
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(
        default,
        rename = "normalizedAlignment",
        skip_serializing_if = "Option::is_none"
    )]
    pub normalized_alignment: Option<Alignment>,
    #[serde(default, rename = "isFinal", skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
}

impl AudioChunkMessage {
    pub fn audio(&self) -> &str {
        self.audio.as_deref().unwrap_or_default()
    }

    pub fn has_audio(&self) -> bool {
        !self.audio().is_empty()
    }

    pub fn is_last_chunk(&self) -> bool {
        self.is_final == Some(true)
    }
}
