// Output file naming.
//
// Paths look like `{prefix}_{yyyyMMdd_HHmmss}_{8 hex}{extension}`. When the
// requested directory cannot be created or written, a path in the system
// temp directory is returned instead of failing the session.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::error::Result;

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{}", trimmed)
    }
}

/// Create `path` if needed and confirm files can be written inside it
pub async fn ensure_writable_directory(path: &Path) -> Result<()> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        info!("Creating directory: {}", path.display());
    }
    fs::create_dir_all(path).await?;

    let probe = path.join(format!("test_{}.tmp", uuid::Uuid::new_v4().simple()));
    fs::write(&probe, b"Test").await?;
    fs::remove_file(&probe).await?;

    Ok(())
}

/// Produce a collision-resistant output path
pub async fn generate_unique_path(directory: &Path, prefix: &str, extension: &str) -> PathBuf {
    let extension = normalize_extension(extension);

    match ensure_writable_directory(directory).await {
        Ok(()) => {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let id = uuid::Uuid::new_v4().simple().to_string();
            let path = directory.join(format!("{}_{}_{}{}", prefix, timestamp, &id[..8], extension));
            info!("Generated file path: {}", path.display());
            path
        }
        Err(e) => {
            warn!(
                "Cannot use output directory {}: {}",
                directory.display(),
                e
            );
            let path = std::env::temp_dir().join(format!(
                "{}_{}{}",
                prefix,
                uuid::Uuid::new_v4().simple(),
                extension
            ));
            warn!("Using fallback temp path: {}", path.display());
            path
        }
    }
}
