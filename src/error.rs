//! Error types for streaming speech sessions

use std::time::Duration;
use thiserror::Error;

/// Result type alias for speech session operations
pub type Result<T> = std::result::Result<T, SpeechError>;

/// Errors that can occur while running a speech session
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Connecting failed or was cancelled before the socket opened
    #[error("connection failed: {reason}")]
    Connection { reason: String, cancelled: bool },

    /// Send/receive attempted without an open connection
    #[error("socket is not connected; call connect first")]
    NotConnected,

    /// Send or receive failed after the connection was established
    #[error("transport error: {0}")]
    Transport(String),

    /// Inbound payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// No API credential available
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// File system failure while persisting audio
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// Session ran past its configured deadline
    #[error("session deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// Caller supplied an unusable argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Sessions are one-shot
    #[error("session already started; create a new session per text")]
    AlreadyStarted,
}

impl SpeechError {
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
            cancelled: false,
        }
    }

    /// True when the error was caused by cancellation, including a cancelled connect
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Connection { cancelled: true, .. }
        )
    }
}

impl From<serde_json::Error> for SpeechError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for SpeechError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64 audio: {}", err))
    }
}
