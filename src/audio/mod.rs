pub mod naming;
pub mod sink;

pub use naming::{ensure_writable_directory, generate_unique_path};
pub use sink::{AudioSink, FileAudioSink};
