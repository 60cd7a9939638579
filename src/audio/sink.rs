use async_trait::async_trait;
use base64::Engine;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::error::Result;

/// Destination for ordered audio fragments of one session
///
/// The first fragment creates (or truncates) the file, later fragments append,
/// and `finalize` marks the file complete.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Decode `base64_audio` and write it as a fresh file; returns bytes written
    async fn write_first(&self, base64_audio: &str, path: &Path) -> Result<usize>;

    /// Decode `base64_audio` and append it to the existing file; returns bytes written
    async fn append(&self, base64_audio: &str, path: &Path) -> Result<usize>;

    /// Called once when no more fragments will arrive
    async fn finalize(&self, path: &Path) -> Result<()>;
}

fn decode_audio(base64_audio: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(base64_audio)?)
}

/// Writes audio fragments straight to disk
#[derive(Debug, Clone, Default)]
pub struct FileAudioSink;

impl FileAudioSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioSink for FileAudioSink {
    async fn write_first(&self, base64_audio: &str, path: &Path) -> Result<usize> {
        if base64_audio.is_empty() {
            info!("Empty audio chunk received, skipping save");
            return Ok(0);
        }

        let audio = decode_audio(base64_audio)?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !fs::try_exists(dir).await.unwrap_or(false) {
                fs::create_dir_all(dir).await.inspect_err(|e| {
                    error!("Failed to create directory {}: {}", dir.display(), e)
                })?;
                info!("Created directory: {}", dir.display());
            }
        }

        fs::write(path, &audio)
            .await
            .inspect_err(|e| error!("Failed to save audio file {}: {}", path.display(), e))?;

        info!("Saved audio file: {} ({} bytes)", path.display(), audio.len());
        Ok(audio.len())
    }

    async fn append(&self, base64_audio: &str, path: &Path) -> Result<usize> {
        if base64_audio.is_empty() {
            info!("Empty audio chunk received, skipping append");
            return Ok(0);
        }

        let audio = decode_audio(base64_audio)?;

        // Append-only and never create: the first write owns file creation.
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .await
            .inspect_err(|e| error!("Failed to open {} for append: {}", path.display(), e))?;
        file.write_all(&audio).await?;
        file.flush().await?;

        debug!("Appended {} bytes to {}", audio.len(), path.display());
        Ok(audio.len())
    }

    async fn finalize(&self, path: &Path) -> Result<()> {
        info!("Audio file finalized: {}", path.display());
        Ok(())
    }
}
