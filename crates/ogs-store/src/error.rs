//! Error types for repository operations.

use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No row with this id exists in the table.
    #[error("{table} {id} not found")]
    NotFound { table: &'static str, id: i32 },

    /// The row would violate the table's unique name constraint.
    #[error("duplicate {table} name: {name}")]
    DuplicateName { table: &'static str, name: String },

    /// A kind or property referenced an extension that does not exist.
    #[error("schema extension {0} not found")]
    ExtensionNotFound(i32),

    /// Every id of the table has been allocated.
    #[error("{table} ids exhausted")]
    IdsExhausted { table: &'static str },

    /// Imported rows are inconsistent.
    #[error("invalid snapshot: {0}")]
    Serialization(String),

    /// The graph-side kind maps could not be refreshed.
    #[error("kind refresh failed: {0}")]
    KindRefresh(String),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Returns `true` for missing-row errors of any table.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::ExtensionNotFound(_)
        )
    }
}

/// Convenience type alias for repository operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
