//! Wire protocol for the streaming text-to-speech socket
//!
//! Outbound messages are JSON text frames: one init message carrying voice
//! settings, any number of text chunks, then an empty-text chunk that tells
//! the server no more input will arrive. Inbound messages carry base64 audio
//! fragments plus optional character alignment.

pub mod codec;
pub mod messages;

pub use codec::{decode_audio_chunk, encode_finalize, encode_init, encode_text_chunk};
pub use messages::{Alignment, AudioChunkMessage, InitMessage, TextChunkMessage, VoiceSettings};
