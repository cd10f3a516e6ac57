//! Storage trait definitions.
//!
//! These traits define the interface for minter state backends, enabling
//! swapping between implementations without changing the minting service.

use async_trait::async_trait;

use crate::domain::MinterState;
use crate::error::StorageResult;

/// Persisted minter state operations.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Create the state record.
    ///
    /// Fails with `StorageError::AlreadyExists` if a record is already present;
    /// an existing stream is never overwritten.
    async fn create(&self, state: &MinterState) -> StorageResult<()>;

    /// Read the state record.
    async fn load(&self) -> StorageResult<MinterState>;

    /// Replace the state record. The record must already exist.
    async fn save(&self, state: &MinterState) -> StorageResult<()>;

    /// Check whether a state record exists.
    async fn exists(&self) -> StorageResult<bool>;
}

/// Exclusive access to the state record across processes.
#[async_trait]
pub trait StateLock: Send + Sync {
    /// Acquire the lock, retrying until the backend's attempt budget is spent.
    async fn acquire(&self) -> StorageResult<LockGuard>;

    /// Try to acquire the lock without waiting.
    ///
    /// Returns `None` if the lock is already held.
    async fn try_acquire(&self) -> StorageResult<Option<LockGuard>>;

    /// Check if the lock is currently held.
    async fn is_locked(&self) -> StorageResult<bool>;
}

/// RAII guard for the state lock.
///
/// The lock is released when the guard is dropped.
pub struct LockGuard {
    key: String,
    release_fn: Option<Box<dyn FnOnce() + Send>>,
}

impl LockGuard {
    /// Create a new lock guard.
    pub fn new<F>(key: String, release_fn: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            key,
            release_fn: Some(Box::new(release_fn)),
        }
    }

    /// Get the lock key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the lock now.
    pub fn release(mut self) {
        if let Some(release_fn) = self.release_fn.take() {
            release_fn();
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(release_fn) = self.release_fn.take() {
            release_fn();
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("key", &self.key).finish()
    }
}

/// Combined storage trait: state persistence plus the lock around it.
pub trait Storage: StateStorage + StateLock {
    /// Get the storage backend name.
    fn backend_name(&self) -> &'static str;
}
