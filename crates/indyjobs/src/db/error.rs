//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// A required parameter was missing or zero. Nothing was written.
    #[error("{operation}: invalid parameters: {reason}: {params}")]
    InvalidParameters {
        operation: &'static str,
        reason: String,
        params: String,
    },

    /// No row matched the requested key.
    #[error("{operation}: not found: {key}")]
    NotFound { operation: &'static str, key: String },

    /// The store rejected or failed an operation.
    #[error("{operation} failed for {context}: {source}")]
    Storage {
        operation: &'static str,
        context: String,
        #[source]
        source: Box<DatabaseError>,
    },
}

/// Coarse classification of a [`DatabaseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameters,
    NotFound,
    StorageFailure,
}

impl DatabaseError {
    pub fn invalid(
        operation: &'static str,
        reason: impl Into<String>,
        params: &impl std::fmt::Debug,
    ) -> Self {
        Self::InvalidParameters {
            operation,
            reason: reason.into(),
            params: format!("{params:?}"),
        }
    }

    /// Annotates a failure with the operation and the keys it touched.
    /// Validation and lookup errors pass through unchanged.
    pub fn storage(operation: &'static str, context: impl Into<String>, err: DatabaseError) -> Self {
        match err {
            err @ (Self::InvalidParameters { .. } | Self::NotFound { .. }) => err,
            other => Self::Storage {
                operation,
                context: context.into(),
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            Self::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::StorageFailure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether the statement was aborted through an interrupt handle.
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::OperationInterrupted
            }
            Self::Storage { source, .. } => source.is_interrupted(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_wraps_sqlite_errors() {
        let err = DatabaseError::storage(
            "delete_all",
            "character 10",
            DatabaseError::Sqlite(rusqlite::Error::InvalidQuery),
        );
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        let msg = err.to_string();
        assert!(msg.starts_with("delete_all failed for character 10"));
    }

    #[test]
    fn test_storage_keeps_not_found_kind() {
        let err = DatabaseError::storage(
            "get",
            "character 10 job 1",
            DatabaseError::NotFound {
                operation: "get",
                key: "character 10 job 1".to_string(),
            },
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_echoes_params() {
        #[derive(Debug)]
        struct Params {
            owner_id: i32,
        }
        let err = DatabaseError::invalid("upsert", "owner_id is zero", &Params { owner_id: 0 });
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        assert!(err.to_string().contains("Params { owner_id: 0 }"));
    }

    #[test]
    fn test_interrupted_is_detected_through_wrapping() {
        let sqlite = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERRUPT),
            None,
        );
        let err = DatabaseError::storage("upsert", "character 1", DatabaseError::Sqlite(sqlite));
        assert!(err.is_interrupted());
        assert!(!DatabaseError::LockPoisoned.is_interrupted());
    }
}
