//! Storage configuration.

use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON state file in the data directory.
    #[default]
    File,
    /// Process-local state, discarded on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(default)]
    pub backend: StorageBackend,

    /// File storage configuration.
    #[serde(default)]
    pub file: FileStorageConfig,
}

impl StorageConfig {
    /// Validate the storage configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend is selected with unusable settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StorageBackend::File => self.file.validate(),
            StorageBackend::Memory => Ok(()),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FileStorageConfig {
    /// Directory holding the state file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// State file name inside `data_dir`.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Attempts to take the state lock before giving up.
    #[serde(default = "default_lock_attempts")]
    pub lock_attempts: u32,

    /// Delay between lock attempts in milliseconds.
    #[serde(default = "default_lock_retry_ms")]
    pub lock_retry_ms: u64,
}

impl FileStorageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.state_file.trim().is_empty() {
            return Err(ConfigError::Message(
                "storage.file.state_file cannot be empty".to_string(),
            ));
        }
        if self.state_file.contains(['/', '\\']) {
            return Err(ConfigError::Message(
                "storage.file.state_file must be a file name, not a path".to_string(),
            ));
        }
        if self.lock_attempts == 0 {
            return Err(ConfigError::Message(
                "storage.file.lock_attempts cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_state_file() -> String {
    "noid.db".to_string()
}

const fn default_lock_attempts() -> u32 {
    100
}

const fn default_lock_retry_ms() -> u64 {
    50
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_file: default_state_file(),
            lock_attempts: default_lock_attempts(),
            lock_retry_ms: default_lock_retry_ms(),
        }
    }
}
