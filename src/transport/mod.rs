//! Persistent socket transport
//!
//! [`TransportSession`] owns one connection and tracks whether it is usable.
//! Its `receive` reads the socket through a fixed-size buffer and stitches
//! physical reads back into one logical message, so large audio payloads
//! never need a single oversized read.

mod session;
mod socket;
mod websocket;

pub use session::{ConnectionState, Frame, TransportSession, DEFAULT_READ_BUFFER_SIZE};
pub use socket::{Connector, FrameSocket, MessageKind, PhysicalRead};
pub use websocket::{WebSocketConnector, WebSocketFrames};
