//! File-based state locking.
//!
//! Uses file locks (flock) for coordination between processes.
//! Note: File locks may not work correctly on all network filesystems.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::storage::traits::{LockGuard, StateLock};

/// File-based lock manager for a single state file.
pub struct FileLock {
    /// Lock file path.
    path: PathBuf,
    /// Attempts before `acquire` gives up.
    attempts: u32,
    /// Delay between attempts.
    retry_delay: Duration,
    /// Lock currently held by this process, if any.
    active: Arc<Mutex<Option<LockInfo>>>,
}

struct LockInfo {
    file: std::fs::File,
    acquired_at: Instant,
}

impl FileLock {
    /// Create a new file lock manager.
    pub fn new(path: PathBuf, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            path,
            attempts,
            retry_delay,
            active: Arc::new(Mutex::new(None)),
        }
    }

    fn key(&self) -> String {
        self.path.display().to_string()
    }

    /// Internal method to acquire lock without blocking.
    fn try_lock(&self) -> StorageResult<bool> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                // Record who holds the lock
                use std::io::Write;
                file.set_len(0).ok();
                let mut file_ref = &file;
                writeln!(
                    file_ref,
                    "{{\"pid\":{},\"acquired_at\":{}}}",
                    std::process::id(),
                    chrono::Utc::now().timestamp_millis(),
                )
                .ok();

                *self.active.lock() = Some(LockInfo {
                    file,
                    acquired_at: Instant::now(),
                });

                Ok(true)
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(false),
            Err(e) => Err(StorageError::LockFailed(e.to_string())),
        }
    }

    fn guard(&self) -> LockGuard {
        let active = Arc::clone(&self.active);
        let key = self.key();

        LockGuard::new(key.clone(), move || {
            if let Some(info) = active.lock().take() {
                let _ = info.file.unlock();
                debug!(
                    lock = %key,
                    held_ms = info.acquired_at.elapsed().as_millis(),
                    "State lock released"
                );
            }
        })
    }
}

#[async_trait]
impl StateLock for FileLock {
    async fn acquire(&self) -> StorageResult<LockGuard> {
        for attempt in 0..self.attempts {
            if self.try_lock()? {
                debug!(lock = %self.key(), attempt, "State lock acquired");
                return Ok(self.guard());
            }

            if attempt + 1 < self.attempts {
                sleep(self.retry_delay).await;
            }
        }

        Err(StorageError::LockTimeout(format!(
            "Failed to acquire lock '{}' after {} attempts",
            self.key(),
            self.attempts
        )))
    }

    async fn try_acquire(&self) -> StorageResult<Option<LockGuard>> {
        if self.try_lock()? {
            Ok(Some(self.guard()))
        } else {
            Ok(None)
        }
    }

    async fn is_locked(&self) -> StorageResult<bool> {
        if self.active.lock().is_some() {
            return Ok(true);
        }

        if !self.path.exists() {
            return Ok(false);
        }

        // Try to acquire lock non-blocking
        let Ok(file) = std::fs::OpenOptions::new().read(true).open(&self.path) else {
            return Ok(false);
        };

        match file.try_lock_exclusive() {
            Ok(()) => {
                // We got the lock, so it wasn't locked
                let _ = file.unlock();
                Ok(false)
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_lock(attempts: u32) -> (FileLock, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let lock = FileLock::new(
            temp_dir.path().join("noid.db.lock"),
            attempts,
            Duration::from_millis(5),
        );
        (lock, temp_dir)
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let (lock, _temp) = create_test_lock(3);

        let guard = lock.acquire().await.unwrap();
        assert!(lock.is_locked().await.unwrap());

        guard.release();
        assert!(!lock.is_locked().await.unwrap());
    }

    #[tokio::test]
    async fn test_try_acquire_fails_when_locked() {
        let (lock, temp) = create_test_lock(3);
        let other = FileLock::new(
            temp.path().join("noid.db.lock"),
            3,
            Duration::from_millis(5),
        );

        let _guard = lock.acquire().await.unwrap();

        assert!(other.try_acquire().await.unwrap().is_none());
        assert!(other.is_locked().await.unwrap());
    }

    #[tokio::test]
    async fn test_acquire_times_out_when_held() {
        let (lock, temp) = create_test_lock(3);
        let other = FileLock::new(
            temp.path().join("noid.db.lock"),
            2,
            Duration::from_millis(5),
        );

        let _guard = lock.acquire().await.unwrap();

        let result = other.acquire().await;
        assert!(matches!(result, Err(StorageError::LockTimeout(_))));
    }

    #[tokio::test]
    async fn test_lock_is_reusable_after_drop() {
        let (lock, _temp) = create_test_lock(3);

        {
            let _guard = lock.acquire().await.unwrap();
        }

        assert!(lock.try_acquire().await.unwrap().is_some());
    }
}
