//! Minting service.
//!
//! Use cases behind the command line: one-shot minting, creating a persisted
//! minter, minting from it, and reporting on it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{MinterState, MinterStatus};
use crate::error::{AppError, Result};
use crate::service::minter::{Minted, Minter};
use crate::storage::traits::{StateLock, StateStorage, Storage};

/// Most identifiers a single `next` call may mint.
pub const MAX_BATCH: u32 = 1000;

/// Identifiers minted by one [`MintService::next`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintBatch {
    /// Identifiers in mint order.
    pub ids: Vec<String>,
    /// Whether the stream ran out while minting this batch.
    pub exhausted: bool,
}

/// Service for persisted noid minting.
pub struct MintService {
    /// Storage backend.
    storage: Arc<dyn Storage>,
}

impl MintService {
    /// Create a new mint service.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Mint the identifier at `sequence` without touching storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid or `sequence` is out of range.
    pub fn immediate(template: &str, sequence: u64) -> Result<Minted> {
        let mut minter = Minter::with_sequence(template, sequence)?;
        Ok(minter.mint()?)
    }

    /// Create a persisted minter for `template` at sequence 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid or state already exists.
    pub async fn init(&self, template: &str) -> Result<MinterState> {
        let minter = Minter::new(template)?;
        let state = minter.state();

        self.storage.create(&state).await?;

        info!(
            template = %state.template,
            max_sequence = minter.max_sequence(),
            backend = self.storage.backend_name(),
            "Minter initialized"
        );

        Ok(state)
    }

    /// Mint `count` identifiers from the persisted minter.
    ///
    /// Holds the state lock across load, mint and save so concurrent callers
    /// never receive the same identifier. If the stream runs out partway the
    /// identifiers minted so far are returned and the state is marked
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is out of bounds, no state exists, the
    /// stream is already exhausted, or storage fails.
    pub async fn next(&self, count: u32) -> Result<MintBatch> {
        if count == 0 {
            return Err(AppError::BadRequest("count must be at least 1".to_string()));
        }
        if count > MAX_BATCH {
            return Err(AppError::BadRequest(format!(
                "count cannot exceed {MAX_BATCH}"
            )));
        }

        let guard = self.storage.acquire().await?;

        let state = self.storage.load().await?;
        let mut minter = Minter::restore(&state)?;
        if minter.is_exhausted() {
            return Err(AppError::Exhausted(state.template));
        }

        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let minted = minter.mint()?;
            let last = minted.is_last();
            ids.push(minted.into_string());
            if last {
                break;
            }
        }

        let next_state = minter.state();
        self.storage.save(&next_state).await?;
        guard.release();

        info!(
            template = %next_state.template,
            minted = ids.len(),
            sequence = next_state.sequence,
            "Minted identifiers"
        );

        if next_state.exhausted {
            warn!(
                template = %next_state.template,
                "Minter exhausted; no identifiers remain"
            );
        }

        Ok(MintBatch {
            ids,
            exhausted: next_state.exhausted,
        })
    }

    /// Report on the persisted minter.
    ///
    /// # Errors
    ///
    /// Returns an error if no state exists or the stored state is invalid.
    pub async fn status(&self) -> Result<MinterStatus> {
        let state = self.storage.load().await?;
        let minter = Minter::restore(&state)?;

        Ok(MinterStatus {
            template: state.template,
            ordering: minter.template().ordering(),
            sequence: minter.sequence(),
            max_sequence: minter.max_sequence(),
            remaining: minter.remaining(),
            next: (!minter.is_exhausted()).then(|| minter.peek()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ordering;
    use crate::error::{NoidError, StorageError};
    use crate::storage::memory::MemoryStorage;

    fn create_test_service() -> (MintService, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let service = MintService::new(Arc::clone(&storage) as Arc<dyn Storage>);
        (service, storage)
    }

    #[test]
    fn test_immediate() {
        let minted = MintService::immediate("reedeek", 27).unwrap();
        assert_eq!(minted.as_str().len(), 5);

        assert_eq!(
            MintService::immediate("foo.seedeek", 1001).unwrap().as_str(),
            "foo.000z9r"
        );
        assert!(matches!(
            MintService::immediate("sdd", 64),
            Err(AppError::Noid(NoidError::SequenceOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_init_and_next() {
        let (service, _storage) = create_test_service();

        let state = service.init("foo.seedee").await.unwrap();
        assert_eq!(state, MinterState::new("foo.seedee", 0));

        let batch = service.next(1).await.unwrap();
        assert_eq!(batch.ids, vec!["foo.00000"]);

        let batch = service.next(3).await.unwrap();
        assert_eq!(batch.ids, vec!["foo.00001", "foo.00002", "foo.00003"]);
        assert!(!batch.exhausted);

        assert_eq!(service.status().await.unwrap().sequence, 4);
    }

    #[tokio::test]
    async fn test_init_rejects_bad_template() {
        let (service, storage) = create_test_service();

        assert!(matches!(
            service.init("foo.xdd").await,
            Err(AppError::Noid(NoidError::InvalidOrdering(_)))
        ));
        assert!(!storage.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let (service, _storage) = create_test_service();

        service.init("sdd").await.unwrap();
        assert!(matches!(
            service.init("reee").await,
            Err(AppError::Storage(StorageError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn test_next_without_state() {
        let (service, _storage) = create_test_service();

        assert!(matches!(
            service.next(1).await,
            Err(AppError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_next_validates_count() {
        let (service, _storage) = create_test_service();
        service.init("sdd").await.unwrap();

        assert!(matches!(service.next(0).await, Err(AppError::BadRequest(_))));
        assert!(matches!(
            service.next(MAX_BATCH + 1).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_next_stops_at_exhaustion() {
        let (service, _storage) = create_test_service();
        service.init("sd").await.unwrap();

        let batch = service.next(10).await.unwrap();
        assert_eq!(batch.ids, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
        assert!(batch.exhausted);

        assert!(matches!(
            service.next(1).await,
            Err(AppError::Exhausted(_))
        ));

        let status = service.status().await.unwrap();
        assert_eq!(status.remaining, Some(0));
        assert_eq!(status.next, None);
    }

    #[tokio::test]
    async fn test_next_releases_lock() {
        let (service, storage) = create_test_service();
        service.init("zee").await.unwrap();

        service.next(2).await.unwrap();
        assert!(!storage.is_locked().await.unwrap());

        // A failed call must not leave the lock behind either.
        service.next(0).await.unwrap_err();
        assert!(!storage.is_locked().await.unwrap());
    }

    #[tokio::test]
    async fn test_next_fails_while_locked() {
        let (service, storage) = create_test_service();
        service.init("zee").await.unwrap();

        let _held = storage.acquire().await.unwrap();
        assert!(matches!(
            service.next(1).await,
            Err(AppError::Storage(StorageError::LockTimeout(_)))
        ));
    }

    #[tokio::test]
    async fn test_status() {
        let (service, _storage) = create_test_service();
        service.init("bar.seedeek").await.unwrap();

        let status = service.status().await.unwrap();
        assert_eq!(status.template, "bar.seedeek");
        assert_eq!(status.ordering, Ordering::SequentialLimited);
        assert_eq!(status.sequence, 0);
        assert_eq!(status.max_sequence, (1 << 23) - 1);
        assert_eq!(status.remaining, Some(1 << 23));
        assert_eq!(status.next.as_deref(), Some("bar.000004"));
    }

    #[tokio::test]
    async fn test_random_stream_matches_in_memory_minter() {
        let (service, _storage) = create_test_service();
        service.init("foo.reedeek").await.unwrap();

        let mut minter = Minter::new("foo.reedeek").unwrap();
        let expected: Vec<String> = (0..20)
            .map(|_| minter.mint().unwrap().into_string())
            .collect();

        let mut ids = service.next(5).await.unwrap().ids;
        ids.extend(service.next(15).await.unwrap().ids);
        assert_eq!(ids, expected);
    }
}
