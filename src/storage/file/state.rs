//! File-based minter state storage.

use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use fs2::FileExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::MinterState;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::StateStorage;

/// Stores one minter's state as a JSON document.
pub struct FileStateStorage {
    /// State file path.
    path: PathBuf,
    /// Mutex for coordinating file operations within this process.
    lock: Mutex<()>,
}

impl FileStateStorage {
    /// Create a new file state storage.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// State file path.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    fn not_found(&self) -> StorageError {
        StorageError::NotFound(self.path.display().to_string())
    }

    /// Read state from file with a shared lock.
    fn read_state_locked(&self) -> StorageResult<MinterState> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(self.not_found()),
            Err(e) => return Err(e.into()),
        };

        FileExt::lock_shared(&file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
        let state = serde_json::from_reader(&file);
        FileExt::unlock(&file).map_err(|e| StorageError::LockFailed(e.to_string()))?;

        Ok(state?)
    }

    /// Create the state file, failing if it already exists.
    fn create_locked(&self, state: &MinterState) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;
        write_json(file, state)
    }

    /// Overwrite the existing state file with an exclusive lock.
    fn write_state_locked(&self, state: &MinterState) -> StorageResult<()> {
        let file = match std::fs::OpenOptions::new().write(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(self.not_found()),
            Err(e) => return Err(e.into()),
        };

        file.lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;
        write_json(file, state)
    }
}

/// Truncate `file` and write `state` as pretty JSON, then unlock.
fn write_json(mut file: std::fs::File, state: &MinterState) -> StorageResult<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;

    let mut json = serde_json::to_string_pretty(state)?;
    json.push('\n');
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    FileExt::unlock(&file).map_err(|e| StorageError::LockFailed(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl StateStorage for FileStateStorage {
    async fn create(&self, state: &MinterState) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.create_locked(state)?;
        debug!(path = %self.path.display(), "State file created");
        Ok(())
    }

    async fn load(&self) -> StorageResult<MinterState> {
        let _guard = self.lock.lock().await;
        self.read_state_locked()
    }

    async fn save(&self, state: &MinterState) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.write_state_locked(state)?;
        debug!(
            path = %self.path.display(),
            sequence = state.sequence,
            "State file written"
        );
        Ok(())
    }

    async fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.exists())
    }
}
