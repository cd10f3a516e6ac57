//! In-memory storage backend.
//!
//! Keeps the state for the lifetime of the process only. Used for tests and
//! for throwaway minting sessions.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::MinterState;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::{LockGuard, StateLock, StateStorage, Storage};

const KEY: &str = "memory";

/// In-memory storage implementation.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<Option<MinterState>>,
    locked: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn take_lock(&self) -> Option<LockGuard> {
        let mut locked = self.locked.lock();
        if *locked {
            return None;
        }
        *locked = true;

        let flag = Arc::clone(&self.locked);
        Some(LockGuard::new(KEY.to_string(), move || {
            *flag.lock() = false;
        }))
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn create(&self, state: &MinterState) -> StorageResult<()> {
        let mut slot = self.state.lock();
        if slot.is_some() {
            return Err(StorageError::AlreadyExists(KEY.to_string()));
        }
        *slot = Some(state.clone());
        Ok(())
    }

    async fn load(&self) -> StorageResult<MinterState> {
        self.state
            .lock()
            .clone()
            .ok_or_else(|| StorageError::NotFound(KEY.to_string()))
    }

    async fn save(&self, state: &MinterState) -> StorageResult<()> {
        let mut slot = self.state.lock();
        match slot.as_mut() {
            Some(current) => {
                current.clone_from(state);
                Ok(())
            }
            None => Err(StorageError::NotFound(KEY.to_string())),
        }
    }

    async fn exists(&self) -> StorageResult<bool> {
        Ok(self.state.lock().is_some())
    }
}

#[async_trait]
impl StateLock for MemoryStorage {
    async fn acquire(&self) -> StorageResult<LockGuard> {
        self.take_lock()
            .ok_or_else(|| StorageError::LockTimeout(format!("Lock '{KEY}' is already held")))
    }

    async fn try_acquire(&self) -> StorageResult<Option<LockGuard>> {
        Ok(self.take_lock())
    }

    async fn is_locked(&self) -> StorageResult<bool> {
        Ok(*self.locked.lock())
    }
}

impl Storage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_load_save() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.load().await, Err(StorageError::NotFound(_))));

        storage.create(&MinterState::new("zee", 0)).await.unwrap();
        storage.save(&MinterState::new("zee", 5)).await.unwrap();
        assert_eq!(storage.load().await.unwrap().sequence, 5);

        assert!(matches!(
            storage.create(&MinterState::new("zee", 0)).await,
            Err(StorageError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let storage = MemoryStorage::new();

        let guard = storage.acquire().await.unwrap();
        assert!(storage.try_acquire().await.unwrap().is_none());
        assert!(storage.acquire().await.is_err());

        drop(guard);
        assert!(!storage.is_locked().await.unwrap());
        assert!(storage.try_acquire().await.unwrap().is_some());
    }
}
