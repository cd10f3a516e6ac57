//! Error handling module.
//!
//! Three layers of errors live here:
//!
//! - [`NoidError`]: failures of the minting core (template parsing, counter range).
//! - [`StorageError`]: failures of the persisted-state backends.
//! - [`AppError`]: everything the command line can report, each mapped to an
//!   [`ErrorCode`] and a process exit code.

pub mod codes;

use std::fmt::Write as _;

pub use codes::{ErrorCategory, ErrorCode};

/// Minting core error type.
///
/// The core never logs; every failure is returned to the caller as one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoidError {
    /// Ordering character is not one of `r`, `s`, `z`.
    #[error("Invalid ordering {0:?}: expected 'r', 's', or 'z'")]
    InvalidOrdering(String),

    /// Mask is empty or contains characters other than `d` and `e`.
    #[error("Invalid mask {0:?}: expected one or more of 'd' or 'e'")]
    InvalidMask(String),

    /// Starting counter lies outside the template's identifier space.
    #[error("Sequence {sequence} is out of range (maximum {max})")]
    SequenceOutOfRange {
        /// Requested counter value.
        sequence: u64,
        /// Largest counter the template allows.
        max: u64,
    },

    /// Bounded template needs more than 64 bits of counter.
    #[error("Template mask needs {bits} bits, but at most 64 fit in a counter")]
    MaskTooWide {
        /// Total bit width of the mask.
        bits: u32,
    },

    /// Counter is already at its maximum.
    #[error("Sequence overflow: counter reached its maximum of {max}")]
    Overflow {
        /// Largest counter the template allows.
        max: u64,
    },
}

/// Storage-specific error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed.
    #[error("Failed to acquire lock: {0}")]
    LockFailed(String),

    /// Lock timeout.
    #[error("Lock timeout: {0}")]
    LockTimeout(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIO(String),

    /// No persisted state.
    #[error("Minter state not found: {0}")]
    NotFound(String),

    /// Persisted state already present.
    #[error("Minter state already exists: {0}")]
    AlreadyExists(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIO(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Minting core rejected the template or counter.
    #[error(transparent)]
    Noid(#[from] NoidError),

    /// Persisted stream has issued its final identifier.
    #[error("Minter for template {0:?} is exhausted; no identifiers remain")]
    Exhausted(String),

    /// Invalid command arguments.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Noid(err) => match err {
                NoidError::InvalidOrdering(_) => ErrorCode::INVALID_ORDERING,
                NoidError::InvalidMask(_) => ErrorCode::INVALID_MASK,
                NoidError::MaskTooWide { .. } => ErrorCode::MASK_TOO_WIDE,
                NoidError::SequenceOutOfRange { .. } => ErrorCode::SEQUENCE_OUT_OF_RANGE,
                NoidError::Overflow { .. } => ErrorCode::SEQUENCE_OVERFLOW,
            },
            Self::Exhausted(_) => ErrorCode::SEQUENCE_EXHAUSTED,
            Self::BadRequest(_) => ErrorCode::BAD_REQUEST,
            Self::Config(_) => ErrorCode::INVALID_CONFIG,
            Self::Storage(err) => match err {
                StorageError::NotFound(_) => ErrorCode::STATE_NOT_FOUND,
                StorageError::AlreadyExists(_) => ErrorCode::STATE_EXISTS,
                StorageError::LockFailed(_) | StorageError::LockTimeout(_) => {
                    ErrorCode::LOCK_FAILED
                }
                StorageError::Serialization(_) | StorageError::FileIO(_) => {
                    ErrorCode::STORAGE_ERROR
                }
            },
        }
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.error_code().category().exit_code()
    }

    /// Hint printed under the error message, if any.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Storage(StorageError::NotFound(_)) => {
                Some("Run `noid mint init TEMPLATE` to create a minter first.")
            }
            Self::Storage(StorageError::AlreadyExists(_)) => {
                Some("Remove the existing state file or pass a different --data-dir.")
            }
            Self::Noid(NoidError::MaskTooWide { .. }) => {
                Some("Try a shorter template mask, or the unlimited 'z' ordering.")
            }
            _ => None,
        }
    }
}

/// Render an error for the terminal, with its code and an optional hint.
#[must_use]
pub fn render_error(err: &anyhow::Error) -> String {
    let mut out = String::new();

    if let Some(app_err) = err.downcast_ref::<AppError>() {
        let _ = write!(out, "Error [{}]: {app_err}", app_err.error_code());
        if let Some(hint) = app_err.hint() {
            let _ = write!(out, "\n\nHint: {hint}");
        }
    } else {
        let _ = write!(out, "Error: {err:#}");
    }

    out
}

/// Process exit code for an arbitrary error.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>()
        .map_or(1, AppError::exit_code)
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias using `StorageError`.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Noid(NoidError::InvalidOrdering("x".to_string())).error_code(),
            ErrorCode::INVALID_ORDERING
        );
        assert_eq!(
            AppError::Noid(NoidError::Overflow { max: 7 }).error_code(),
            ErrorCode::SEQUENCE_OVERFLOW
        );
        assert_eq!(
            AppError::Storage(StorageError::NotFound("noid.db".to_string())).error_code(),
            ErrorCode::STATE_NOT_FOUND
        );
        assert_eq!(
            AppError::Storage(StorageError::LockTimeout("noid.db".to_string())).error_code(),
            ErrorCode::LOCK_FAILED
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::BadRequest("count".to_string()).exit_code(), 2);
        assert_eq!(
            AppError::Noid(NoidError::MaskTooWide { bits: 65 }).exit_code(),
            3
        );
        assert_eq!(AppError::Exhausted("sd".to_string()).exit_code(), 4);
        assert_eq!(
            AppError::Storage(StorageError::FileIO("disk".to_string())).exit_code(),
            5
        );
    }

    #[test]
    fn test_render_error() {
        let err = anyhow::Error::new(AppError::Storage(StorageError::NotFound(
            "noid.db".to_string(),
        )));
        let rendered = render_error(&err);
        assert!(rendered.starts_with("Error [4001]: Storage error: Minter state not found"));
        assert!(rendered.contains("noid mint init"));
        assert_eq!(exit_code(&err), 5);

        let other = anyhow::anyhow!("plain failure");
        assert_eq!(render_error(&other), "Error: plain failure");
        assert_eq!(exit_code(&other), 1);
    }

    #[test]
    fn test_noid_error_messages() {
        assert_eq!(
            NoidError::SequenceOutOfRange { sequence: 64, max: 63 }.to_string(),
            "Sequence 64 is out of range (maximum 63)"
        );
        assert_eq!(
            NoidError::InvalidMask("dx".to_string()).to_string(),
            "Invalid mask \"dx\": expected one or more of 'd' or 'e'"
        );
    }
}
