//! File-based storage backend.
//!
//! Stores the minter state as a JSON file with file locking for atomic
//! read-mint-write cycles. One data directory holds one minter.
//!
//! Directory structure:
//! ```text
//! data_dir/
//! ├── noid.db        {"template": "...", "sequence": N}
//! └── noid.db.lock   held while a process mints
//! ```

mod lock;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FileStorageConfig;
use crate::domain::MinterState;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::{LockGuard, StateLock, StateStorage, Storage};

pub use lock::FileLock;
pub use state::FileStateStorage;

/// File-based storage implementation.
pub struct FileStorage {
    /// State storage.
    state_storage: FileStateStorage,
    /// Lock manager.
    lock_manager: FileLock,
}

impl FileStorage {
    /// Create a new file storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: &FileStorageConfig) -> StorageResult<Self> {
        let base_dir = config.data_dir.clone();

        std::fs::create_dir_all(&base_dir).map_err(|e| {
            StorageError::FileIO(format!(
                "Failed to create directory {}: {e}",
                base_dir.display()
            ))
        })?;

        let state_path = base_dir.join(&config.state_file);
        let lock_path = PathBuf::from(format!("{}.lock", state_path.display()));

        Ok(Self {
            state_storage: FileStateStorage::new(state_path),
            lock_manager: FileLock::new(
                lock_path,
                config.lock_attempts,
                Duration::from_millis(config.lock_retry_ms),
            ),
        })
    }

    /// State file path.
    #[must_use]
    pub const fn state_path(&self) -> &PathBuf {
        self.state_storage.path()
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn create(&self, state: &MinterState) -> StorageResult<()> {
        self.state_storage.create(state).await
    }

    async fn load(&self) -> StorageResult<MinterState> {
        self.state_storage.load().await
    }

    async fn save(&self, state: &MinterState) -> StorageResult<()> {
        self.state_storage.save(state).await
    }

    async fn exists(&self) -> StorageResult<bool> {
        self.state_storage.exists().await
    }
}

#[async_trait]
impl StateLock for FileStorage {
    async fn acquire(&self) -> StorageResult<LockGuard> {
        self.lock_manager.acquire().await
    }

    async fn try_acquire(&self) -> StorageResult<Option<LockGuard>> {
        self.lock_manager.try_acquire().await
    }

    async fn is_locked(&self) -> StorageResult<bool> {
        self.lock_manager.is_locked().await
    }
}

impl Storage for FileStorage {
    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = FileStorageConfig {
            data_dir: temp_dir.path().join("nested"),
            ..Default::default()
        };
        let storage = FileStorage::new(&config).unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_creates_data_dir() {
        let (storage, temp) = create_test_storage();
        assert!(temp.path().join("nested").is_dir());
        assert_eq!(storage.state_path(), &temp.path().join("nested").join("noid.db"));
        assert_eq!(storage.backend_name(), "file");
    }

    #[tokio::test]
    async fn test_lock_guards_state_updates() {
        let (storage, _temp) = create_test_storage();
        storage.create(&MinterState::new("sdd", 0)).await.unwrap();

        let guard = storage.acquire().await.unwrap();
        assert!(storage.is_locked().await.unwrap());

        let mut state = storage.load().await.unwrap();
        state.sequence += 1;
        storage.save(&state).await.unwrap();
        drop(guard);

        assert!(!storage.is_locked().await.unwrap());
        assert_eq!(storage.load().await.unwrap().sequence, 1);
    }
}
