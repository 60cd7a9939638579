use async_trait::async_trait;

use crate::error::Result;

/// Type of a logical message on the socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Binary,
    /// Peer sent a close frame; carries no payload
    Close,
}

/// Outcome of one physical read into the caller's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalRead {
    /// Bytes written into the buffer
    pub len: usize,
    pub kind: MessageKind,
    /// Last physical read of the current logical message
    pub end_of_message: bool,
}

/// Frame-level socket abstraction
///
/// Implementations:
/// - [`super::WebSocketFrames`]: tokio-tungstenite over TLS
/// - In-memory scripted sockets (tests)
#[async_trait]
pub trait FrameSocket: Send {
    /// Copy the next piece of the current message into `buf`
    async fn read_frame(&mut self, buf: &mut [u8]) -> Result<PhysicalRead>;

    /// Send one complete text message
    async fn write_text(&mut self, payload: &[u8]) -> Result<()>;

    /// Send a normal-closure frame
    async fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;
}

/// Opens sockets for a [`super::TransportSession`]
#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, endpoint: &str, credential: &str) -> Result<Box<dyn FrameSocket>>;
}
