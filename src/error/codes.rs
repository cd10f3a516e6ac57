//! Error code constants.
//!
//! Error codes are organized by category:
//! - 1xxx: Template errors
//! - 2xxx: Sequence errors
//! - 3xxx: Validation errors
//! - 4xxx: Storage errors

/// Error code type with semantic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    // ===== Template Errors (1xxx) =====

    /// Ordering character not one of `r`, `s`, `z`.
    pub const INVALID_ORDERING: Self = Self(1001);

    /// Mask empty or malformed.
    pub const INVALID_MASK: Self = Self(1002);

    /// Bounded mask wider than 64 bits.
    pub const MASK_TOO_WIDE: Self = Self(1003);

    // ===== Sequence Errors (2xxx) =====

    /// Starting sequence beyond the template's range.
    pub const SEQUENCE_OUT_OF_RANGE: Self = Self(2001);

    /// Counter already at its maximum.
    pub const SEQUENCE_OVERFLOW: Self = Self(2002);

    /// Persisted stream has issued its final identifier.
    pub const SEQUENCE_EXHAUSTED: Self = Self(2003);

    // ===== Validation Errors (3xxx) =====

    /// Bad request / invalid arguments.
    pub const BAD_REQUEST: Self = Self(3001);

    /// Invalid configuration.
    pub const INVALID_CONFIG: Self = Self(3002);

    // ===== Storage Errors (4xxx) =====

    /// No persisted minter state.
    pub const STATE_NOT_FOUND: Self = Self(4001);

    /// Persisted minter state already exists.
    pub const STATE_EXISTS: Self = Self(4002);

    /// State lock could not be taken.
    pub const LOCK_FAILED: Self = Self(4003);

    /// Any other storage failure.
    pub const STORAGE_ERROR: Self = Self(4004);

    /// Get the error code as an i32.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Get the category of this error code.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.0 {
            1000..=1999 => ErrorCategory::Template,
            2000..=2999 => ErrorCategory::Sequence,
            3000..=3999 => ErrorCategory::Validation,
            4000..=4999 => ErrorCategory::Storage,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

/// Error category based on error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Template errors (1xxx).
    Template,
    /// Sequence errors (2xxx).
    Sequence,
    /// Validation errors (3xxx).
    Validation,
    /// Storage errors (4xxx).
    Storage,
    /// Unknown category.
    Unknown,
}

impl ErrorCategory {
    /// Process exit code used when an error of this category ends the run.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Validation => 2,
            Self::Template => 3,
            Self::Sequence => 4,
            Self::Storage => 5,
            Self::Unknown => 1,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Sequence => write!(f, "sequence"),
            Self::Validation => write!(f, "validation"),
            Self::Storage => write!(f, "storage"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
