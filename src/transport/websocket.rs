use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::socket::{Connector, FrameSocket, MessageKind, PhysicalRead};
use crate::error::{Result, SpeechError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens TLS websocket connections, presenting the API key in a request header
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    key_header: String,
}

impl WebSocketConnector {
    pub fn new(key_header: impl Into<String>) -> Self {
        Self {
            key_header: key_header.into(),
        }
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn open(&self, endpoint: &str, credential: &str) -> Result<Box<dyn FrameSocket>> {
        let mut request = endpoint
            .into_client_request()
            .map_err(|e| SpeechError::connection(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let key = HeaderValue::from_str(credential)
            .map_err(|_| SpeechError::connection("credential is not a valid header value"))?;
        let header = HeaderName::from_bytes(self.key_header.as_bytes())
            .map_err(|e| SpeechError::connection(format!("invalid key header name: {}", e)))?;
        request.headers_mut().insert(header, key);

        info!("Connecting to {}", endpoint);

        let (stream, response) = connect_async(request)
            .await
            .map_err(|e| SpeechError::connection(e.to_string()))?;

        debug!("Websocket handshake complete (status {})", response.status());

        Ok(Box::new(WebSocketFrames::new(stream)))
    }
}

/// A received message being handed out through fixed-size reads
struct Pending {
    data: Vec<u8>,
    offset: usize,
    kind: MessageKind,
}

/// [`FrameSocket`] over a tokio-tungstenite stream
pub struct WebSocketFrames {
    stream: WsStream,
    pending: Option<Pending>,
    open: bool,
}

impl WebSocketFrames {
    fn new(stream: WsStream) -> Self {
        Self {
            stream,
            pending: None,
            open: true,
        }
    }

    /// Pull the next data message off the stream, skipping control frames
    async fn next_message(&mut self) -> Result<Option<Pending>> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    self.open = false;
                    return Err(SpeechError::Transport(e.to_string()));
                }
                None => {
                    self.open = false;
                    return Err(SpeechError::Transport(
                        "connection closed without a close frame".to_string(),
                    ));
                }
            };

            let (data, kind) = match message {
                Message::Text(text) => (text.as_bytes().to_vec(), MessageKind::Text),
                Message::Binary(data) => (data.to_vec(), MessageKind::Binary),
                Message::Close(frame) => {
                    debug!("Peer sent close frame: {:?}", frame);
                    self.open = false;
                    return Ok(None);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            return Ok(Some(Pending {
                data,
                offset: 0,
                kind,
            }));
        }
    }
}

#[async_trait]
impl FrameSocket for WebSocketFrames {
    async fn read_frame(&mut self, buf: &mut [u8]) -> Result<PhysicalRead> {
        if self.pending.is_none() {
            match self.next_message().await? {
                Some(pending) => self.pending = Some(pending),
                None => {
                    return Ok(PhysicalRead {
                        len: 0,
                        kind: MessageKind::Close,
                        end_of_message: true,
                    })
                }
            }
        }

        let Some(pending) = self.pending.as_mut() else {
            return Err(SpeechError::Transport("no message buffered".to_string()));
        };

        let remaining = pending.data.len() - pending.offset;
        let len = remaining.min(buf.len());
        buf[..len].copy_from_slice(&pending.data[pending.offset..pending.offset + len]);
        pending.offset += len;

        let kind = pending.kind;
        let end_of_message = pending.offset == pending.data.len();
        if end_of_message {
            self.pending = None;
        }

        Ok(PhysicalRead {
            len,
            kind,
            end_of_message,
        })
    }

    async fn write_text(&mut self, payload: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| SpeechError::Transport(format!("payload is not UTF-8: {}", e)))?;

        self.stream
            .send(Message::Text(text.to_owned().into()))
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        self.stream
            .close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "Closing".into(),
            }))
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
