use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::state::SessionState;
use super::stats::SessionStats;
use crate::audio::{generate_unique_path, AudioSink};
use crate::cancel::CancelToken;
use crate::credentials::CredentialProvider;
use crate::error::{Result, SpeechError};
use crate::protocol::{codec, AudioChunkMessage, InitMessage, TextChunkMessage};
use crate::transport::{Connector, MessageKind, TransportSession};

/// How the draining phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Server sent a fragment with no audio and `isFinal: true`
    FinalMessage,
    /// Server closed the socket before sending a final fragment
    PeerClosed,
}

/// Result of a completed session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub output_path: PathBuf,
    pub termination: Termination,
    pub stats: SessionStats,
}

/// Drives one text-to-speech exchange from connect to close
///
/// A session is one-shot: after `speak_text` returns (successfully or not,
/// once connecting has begun) it is `Closed`.
pub struct SpeechSession {
    config: SessionConfig,
    transport: TransportSession,
    credentials: Arc<dyn CredentialProvider>,
    sink: Arc<dyn AudioSink>,
    state: SessionState,
    stats: SessionStats,
}

impl SpeechSession {
    pub fn new(
        config: SessionConfig,
        connector: Arc<dyn Connector>,
        credentials: Arc<dyn CredentialProvider>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        let transport = TransportSession::with_read_buffer(connector, config.read_buffer_size);

        Self {
            config,
            transport,
            credentials,
            sink,
            state: SessionState::Idle,
            stats: SessionStats::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Synthesize `text` with `voice_id` and return where the audio was saved
    ///
    /// The socket is closed before this returns on every path, including
    /// errors, cancellation and deadline expiry.
    pub async fn speak_text(
        &mut self,
        voice_id: &str,
        text: &str,
        cancel: &CancelToken,
    ) -> Result<SessionReport> {
        if self.state != SessionState::Idle {
            return Err(SpeechError::AlreadyStarted);
        }
        if text.is_empty() {
            return Err(SpeechError::InvalidInput(
                "text must not be empty; an empty chunk is the finalize signal".to_string(),
            ));
        }
        self.config.voice_settings.validate()?;

        let credential = self.credentials.credential()?;
        if credential.trim().is_empty() {
            return Err(SpeechError::MissingCredential("empty API key".to_string()));
        }

        self.stats = SessionStats::new();

        let output_path = generate_unique_path(
            &self.config.output_dir,
            &self.config.file_prefix,
            &self.config.file_extension,
        )
        .await;
        info!("Audio will be saved to: {}", output_path.display());

        let outcome = match self.config.deadline {
            Some(deadline) => tokio::time::timeout(
                deadline,
                self.run(voice_id, text, &credential, &output_path, cancel),
            )
            .await
            .unwrap_or(Err(SpeechError::DeadlineExceeded(deadline))),
            None => {
                self.run(voice_id, text, &credential, &output_path, cancel)
                    .await
            }
        };

        self.release().await;
        self.transition(SessionState::Closed);
        self.stats.finish();

        match outcome {
            Ok(termination) => {
                info!(
                    "Speech complete: {} ({} chunks, {} bytes, {:.1}s)",
                    output_path.display(),
                    self.stats.audio_chunks,
                    self.stats.bytes_written,
                    self.stats.duration_secs
                );
                Ok(SessionReport {
                    output_path,
                    termination,
                    stats: self.stats.clone(),
                })
            }
            Err(e) => {
                error!("Error during speech generation: {}", e);
                Err(e)
            }
        }
    }

    async fn run(
        &mut self,
        voice_id: &str,
        text: &str,
        credential: &str,
        output_path: &Path,
        cancel: &CancelToken,
    ) -> Result<Termination> {
        let endpoint = self.config.endpoint_uri(voice_id);

        self.transition(SessionState::Connecting);
        self.transport.connect(&endpoint, credential, cancel).await?;

        self.transition(SessionState::Handshaking);
        let init = codec::encode_init(&InitMessage::new(self.config.voice_settings.clone()))?;
        info!(
            "Initializing text-to-speech with settings: {}",
            String::from_utf8_lossy(&init)
        );
        self.transport.send(&init, cancel).await?;

        self.transition(SessionState::Streaming);
        let chunk = codec::encode_text_chunk(&TextChunkMessage::new(text, true))?;
        debug!("Sending text chunk: {}", String::from_utf8_lossy(&chunk));
        self.transport.send(&chunk, cancel).await?;

        info!("Finalizing text stream");
        self.transport.send(&codec::encode_finalize()?, cancel).await?;

        self.transition(SessionState::Draining);
        self.drain(output_path, cancel).await
    }

    /// Receive fragments until a final message or peer close
    async fn drain(&mut self, output_path: &Path, cancel: &CancelToken) -> Result<Termination> {
        let mut wrote_audio = false;

        loop {
            let frame = self.transport.receive(cancel).await?;

            let chunk = match frame.kind {
                MessageKind::Close => {
                    warn!("Server closed the stream before sending a final message");
                    cancel.guard(self.sink.finalize(output_path)).await?;
                    return Ok(Termination::PeerClosed);
                }
                MessageKind::Binary => {
                    info!("Received non-text message type ({} bytes)", frame.payload.len());
                    AudioChunkMessage::default()
                }
                MessageKind::Text => match codec::decode_audio_chunk(&frame.payload) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!("Treating undecodable message as having no audio: {}", e);
                        self.stats.skipped_fragments += 1;
                        AudioChunkMessage::default()
                    }
                },
            };
            self.stats.messages_received += 1;

            if chunk.has_audio() {
                debug!("Received audio chunk with {} base64 chars", chunk.audio().len());

                if let Some(alignment) = &chunk.alignment {
                    info!("Audio alignment: {} characters", alignment.chars.len());
                    self.stats.aligned_chars += alignment.chars.len();
                }

                let write = if wrote_audio {
                    self.sink.append(chunk.audio(), output_path)
                } else {
                    self.sink.write_first(chunk.audio(), output_path)
                };

                match cancel.guard(write).await {
                    Ok(bytes) => {
                        wrote_audio = true;
                        self.stats.audio_chunks += 1;
                        self.stats.bytes_written += bytes as u64;
                    }
                    Err(SpeechError::Decode(e)) => {
                        warn!("Skipping audio fragment: {}", e);
                        self.stats.skipped_fragments += 1;
                    }
                    Err(e) => return Err(e),
                }
            } else if chunk.is_last_chunk() {
                info!("Received final message from server");
                cancel.guard(self.sink.finalize(output_path)).await?;
                return Ok(Termination::FinalMessage);
            } else {
                debug!("Received a response without audio data");
            }
        }
    }

    /// Close the socket even if the caller's token is already cancelled
    async fn release(&mut self) {
        let token = CancelToken::new();
        match tokio::time::timeout(self.config.close_timeout, self.transport.close(&token)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close connection cleanly: {}", e),
            Err(_) => warn!(
                "Timed out closing connection after {:?}",
                self.config.close_timeout
            ),
        }
    }
}
