use std::sync::Arc;
use tracing::{debug, info, warn};

use super::socket::{Connector, FrameSocket, MessageKind};
use crate::cancel::CancelToken;
use crate::error::{Result, SpeechError};

/// Default size of each physical socket read
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// One reassembled logical message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: MessageKind,
    pub payload: Vec<u8>,
}

/// Owns a single persistent socket and its connection state
pub struct TransportSession {
    connector: Arc<dyn Connector>,
    socket: Option<Box<dyn FrameSocket>>,
    state: ConnectionState,
    read_buffer_size: usize,
}

impl TransportSession {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_read_buffer(connector, DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_read_buffer(connector: Arc<dyn Connector>, read_buffer_size: usize) -> Self {
        Self {
            connector,
            socket: None,
            state: ConnectionState::Disconnected,
            read_buffer_size: read_buffer_size.max(1),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
            && self.socket.as_ref().is_some_and(|s| s.is_open())
    }

    /// Open the socket; a no-op when already connected
    pub async fn connect(
        &mut self,
        endpoint: &str,
        credential: &str,
        cancel: &CancelToken,
    ) -> Result<()> {
        if self.is_connected() {
            info!("Already connected, ignoring connect to {}", endpoint);
            return Ok(());
        }

        let socket = cancel
            .guard(self.connector.open(endpoint, credential))
            .await
            .map_err(|e| match e {
                SpeechError::Cancelled => SpeechError::Connection {
                    reason: "cancelled while connecting".to_string(),
                    cancelled: true,
                },
                e @ SpeechError::Connection { .. } => e,
                other => SpeechError::connection(other.to_string()),
            })?;

        self.socket = Some(socket);
        self.state = ConnectionState::Connected;
        info!("Connected to {}", endpoint);

        Ok(())
    }

    fn socket_mut(&mut self) -> Result<&mut Box<dyn FrameSocket>> {
        if !self.is_connected() {
            return Err(SpeechError::NotConnected);
        }
        self.socket.as_mut().ok_or(SpeechError::NotConnected)
    }

    /// Send one text message
    pub async fn send(&mut self, payload: &[u8], cancel: &CancelToken) -> Result<()> {
        let socket = self.socket_mut()?;
        cancel.guard(socket.write_text(payload)).await?;
        debug!("Sent {} bytes", payload.len());
        Ok(())
    }

    /// Read physical frames until the end of one logical message
    pub async fn receive(&mut self, cancel: &CancelToken) -> Result<Frame> {
        let mut buffer = vec![0u8; self.read_buffer_size];
        let socket = self.socket_mut()?;

        let mut payload = Vec::new();
        let mut first_kind = None;
        let mut reads = 0usize;

        let kind = loop {
            let read = cancel.guard(socket.read_frame(&mut buffer)).await?;
            reads += 1;
            payload.extend_from_slice(&buffer[..read.len]);
            let kind = *first_kind.get_or_insert(read.kind);

            if read.end_of_message {
                break kind;
            }
        };

        if kind == MessageKind::Close {
            info!("Peer closed the connection");
            self.state = ConnectionState::Disconnected;
            self.socket = None;
        }

        debug!(
            "Received {:?} message: {} bytes in {} reads",
            kind,
            payload.len(),
            reads
        );

        Ok(Frame { kind, payload })
    }

    /// Send a normal-closure frame; a no-op when already disconnected
    pub async fn close(&mut self, cancel: &CancelToken) -> Result<()> {
        if self.state == ConnectionState::Disconnected {
            debug!("Close requested but already disconnected");
            return Ok(());
        }

        self.state = ConnectionState::Disconnected;
        let Some(mut socket) = self.socket.take() else {
            return Ok(());
        };

        if !socket.is_open() {
            return Ok(());
        }

        info!("Closing socket connection");
        let result = cancel.guard(socket.close()).await;
        if let Err(e) = &result {
            warn!("Close handshake failed: {}", e);
        }
        result
    }
}
