pub mod audio;
pub mod cancel;
pub mod config;
pub mod credentials;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use audio::{ensure_writable_directory, generate_unique_path, AudioSink, FileAudioSink};
pub use cancel::CancelToken;
pub use config::Config;
pub use credentials::{CredentialProvider, EnvCredentials, StaticCredential};
pub use error::{Result, SpeechError};
pub use protocol::{AudioChunkMessage, InitMessage, TextChunkMessage, VoiceSettings};
pub use session::{SessionConfig, SessionReport, SessionState, SessionStats, SpeechSession, Termination};
pub use transport::{
    ConnectionState, Connector, Frame, FrameSocket, MessageKind, PhysicalRead, TransportSession,
    WebSocketConnector,
};
