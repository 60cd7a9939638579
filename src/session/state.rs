use std::fmt;

/// Lifecycle of a [`super::SpeechSession`]
///
/// `Idle → Connecting → Handshaking → Streaming → Draining → Closed`.
/// `Closed` is terminal; every exit path ends there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    /// Connected; sending the voice-settings init message
    Handshaking,
    /// Sending caller text and the finalize signal
    Streaming,
    /// Input finished; only receiving
    Draining,
    Closed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Handshaking => "handshaking",
            Self::Streaming => "streaming",
            Self::Draining => "draining",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}
