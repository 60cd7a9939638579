// Stateless JSON encoding/decoding of protocol messages.

use serde::Serialize;
use tracing::debug;

use super::messages::{AudioChunkMessage, InitMessage, TextChunkMessage};
use crate::error::{Result, SpeechError};

fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(message)
        .map_err(|e| SpeechError::InvalidInput(format!("unencodable message: {}", e)))
}

pub fn encode_init(message: &InitMessage) -> Result<Vec<u8>> {
    encode(message)
}

pub fn encode_text_chunk(message: &TextChunkMessage) -> Result<Vec<u8>> {
    encode(message)
}

/// End-of-input signal; same wire shape as an empty text chunk
pub fn encode_finalize() -> Result<Vec<u8>> {
    encode(&TextChunkMessage::finalize())
}

/// Parse an inbound fragment
///
/// Unknown fields are ignored and missing optional fields stay `None`.
/// Anything that is not a JSON object fails with [`SpeechError::Decode`].
pub fn decode_audio_chunk(payload: &[u8]) -> Result<AudioChunkMessage> {
    let chunk: AudioChunkMessage = serde_json::from_slice(payload)?;
    debug!(
        "Decoded fragment: {} base64 chars, final={:?}",
        chunk.audio().len(),
        chunk.is_final
    );
    Ok(chunk)
}
