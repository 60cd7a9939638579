//! API credential sources

use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, SpeechError};

/// Supplies the API key presented when connecting
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Result<String>;
}

/// Reads the key from an environment variable, refreshed from a `.env` file
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
    env_files: Vec<PathBuf>,
}

impl EnvCredentials {
    /// Look up `var`, loading `.env` from the working directory first
    pub fn new(var: impl Into<String>) -> Self {
        let mut env_files = vec![PathBuf::from(".env")];
        if let Ok(cwd) = std::env::current_dir() {
            env_files.push(cwd.join(".env"));
        }

        Self {
            var: var.into(),
            env_files,
        }
    }

    pub fn with_env_files(var: impl Into<String>, env_files: Vec<PathBuf>) -> Self {
        Self {
            var: var.into(),
            env_files,
        }
    }

    /// Load the first `.env` candidate that exists, overwriting variables
    /// already in the environment so edits to the file take effect
    fn reload(&self) {
        let Some(path) = self.env_files.iter().find(|p| p.is_file()) else {
            return;
        };

        let entries = match dotenv::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Ignoring unreadable env file {}: {}", path.display(), e);
                return;
            }
        };

        let mut loaded = 0usize;
        for entry in entries {
            match entry {
                Ok((key, value)) => {
                    std::env::set_var(key, value);
                    loaded += 1;
                }
                Err(e) => debug!("Skipping malformed line in {}: {}", path.display(), e),
            }
        }
        debug!("Loaded {} variables from {}", loaded, path.display());
    }
}

impl CredentialProvider for EnvCredentials {
    fn credential(&self) -> Result<String> {
        self.reload();

        match std::env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SpeechError::MissingCredential(format!(
                "{} not found in environment variables",
                self.var
            ))),
        }
    }
}

/// A key supplied directly, e.g. from the command line
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StaticCredential(<{} chars>)", self.0.len())
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(SpeechError::MissingCredential("empty API key".to_string()));
        }
        Ok(self.0.clone())
    }
}
