//! Streaming speech session management
//!
//! This module provides the `SpeechSession` abstraction that drives one
//! text-to-speech exchange:
//! - Connect and send the voice-settings handshake
//! - Stream the caller's text followed by the finalize signal
//! - Drain audio fragments into a single output file
//! - Close the socket on every exit path

mod config;
mod session;
mod state;
mod stats;

pub use config::SessionConfig;
pub use session::{SessionReport, SpeechSession, Termination};
pub use state::SessionState;
pub use stats::SessionStats;
