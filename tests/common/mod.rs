// Shared test doubles: a scripted in-memory socket standing in for the
// websocket server, and a sink wrapper that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use speech_stream::{
    AudioSink, Connector, FileAudioSink, FrameSocket, MessageKind, PhysicalRead, SessionConfig,
    SpeechError,
};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted server action, consumed by reads
#[derive(Debug, Clone)]
pub enum Step {
    Text(String),
    Binary(Vec<u8>),
    Close,
    Fail(String),
    /// Stream ends without a close frame
    Eof,
    /// Never produces anything
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Connected(String),
    Sent(String),
    Read(usize),
    Closed,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Outbound messages parsed as JSON, in send order
    pub fn sent(&self) -> Vec<serde_json::Value> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sent(text) => Some(serde_json::from_str(&text).unwrap()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }

    pub fn closes(&self) -> usize {
        self.count(&Event::Closed)
    }

    pub fn connects(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Connected(_)))
            .count()
    }

    pub fn reads(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Read(len) => Some(len),
                _ => None,
            })
            .collect()
    }
}

pub struct ScriptedSocket {
    script: VecDeque<Step>,
    pending: Option<(Vec<u8>, usize, MessageKind)>,
    open: bool,
    recorder: Recorder,
}

#[async_trait]
impl FrameSocket for ScriptedSocket {
    async fn read_frame(&mut self, buf: &mut [u8]) -> speech_stream::Result<PhysicalRead> {
        if self.pending.is_none() {
            match self.script.pop_front() {
                Some(Step::Text(text)) => {
                    self.pending = Some((text.into_bytes(), 0, MessageKind::Text))
                }
                Some(Step::Binary(data)) => self.pending = Some((data, 0, MessageKind::Binary)),
                Some(Step::Close) => {
                    self.open = false;
                    return Ok(PhysicalRead {
                        len: 0,
                        kind: MessageKind::Close,
                        end_of_message: true,
                    });
                }
                Some(Step::Fail(message)) => {
                    self.open = false;
                    return Err(SpeechError::Transport(message));
                }
                Some(Step::Eof) | None => {
                    self.open = false;
                    return Err(SpeechError::Transport(
                        "connection closed without a close frame".to_string(),
                    ));
                }
                Some(Step::Hang) => return std::future::pending().await,
            }
        }

        let (data, offset, kind) = self.pending.as_mut().unwrap();
        let len = (data.len() - *offset).min(buf.len());
        buf[..len].copy_from_slice(&data[*offset..*offset + len]);
        *offset += len;

        let kind = *kind;
        let end_of_message = *offset == data.len();
        if end_of_message {
            self.pending = None;
        }

        self.recorder.push(Event::Read(len));
        Ok(PhysicalRead {
            len,
            kind,
            end_of_message,
        })
    }

    async fn write_text(&mut self, payload: &[u8]) -> speech_stream::Result<()> {
        if !self.open {
            return Err(SpeechError::Transport("socket closed".to_string()));
        }
        self.recorder
            .push(Event::Sent(String::from_utf8(payload.to_vec()).unwrap()));
        Ok(())
    }

    async fn close(&mut self) -> speech_stream::Result<()> {
        self.open = false;
        self.recorder.push(Event::Closed);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Hands out one [`ScriptedSocket`] per `open` call
pub struct ScriptedConnector {
    script: Mutex<Vec<Step>>,
    pub recorder: Recorder,
    pub fail_with: Option<String>,
    pub connect_delay: Option<Duration>,
}

impl ScriptedConnector {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script),
            recorder: Recorder::default(),
            fail_with: None,
            connect_delay: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn open(
        &self,
        endpoint: &str,
        _credential: &str,
    ) -> speech_stream::Result<Box<dyn FrameSocket>> {
        self.recorder.push(Event::Connected(endpoint.to_string()));

        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_with {
            return Err(SpeechError::connection(message.clone()));
        }

        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::new(ScriptedSocket {
            script: script.into(),
            pending: None,
            open: true,
            recorder: self.recorder.clone(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    WriteFirst(usize),
    Append(usize),
    Finalize,
}

/// Delegates to [`FileAudioSink`] and records each call
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: FileAudioSink,
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn write_first(&self, base64_audio: &str, path: &Path) -> speech_stream::Result<usize> {
        let written = self.inner.write_first(base64_audio, path).await?;
        self.calls.lock().unwrap().push(SinkCall::WriteFirst(written));
        Ok(written)
    }

    async fn append(&self, base64_audio: &str, path: &Path) -> speech_stream::Result<usize> {
        let written = self.inner.append(base64_audio, path).await?;
        self.calls.lock().unwrap().push(SinkCall::Append(written));
        Ok(written)
    }

    async fn finalize(&self, path: &Path) -> speech_stream::Result<()> {
        self.inner.finalize(path).await?;
        self.calls.lock().unwrap().push(SinkCall::Finalize);
        Ok(())
    }
}

/// Inbound fragment JSON as the server sends it
pub fn fragment(audio: &str, is_final: Option<bool>) -> Step {
    let mut message = serde_json::json!({ "audio": audio });
    if let Some(is_final) = is_final {
        message["isFinal"] = serde_json::Value::Bool(is_final);
    }
    Step::Text(message.to_string())
}

pub fn session_config(output_dir: &Path) -> SessionConfig {
    SessionConfig {
        endpoint_template: "wss://tts.test/v1/text-to-speech/{voice_id}/stream-input".to_string(),
        output_dir: output_dir.to_path_buf(),
        deadline: Some(Duration::from_secs(10)),
        close_timeout: Duration::from_secs(1),
        ..SessionConfig::default()
    }
}
