//! Storage error types
//!
//! Error codes:
//! - FDB_CONTAINER_NOT_FOUND / FDB_DOCUMENT_NOT_FOUND
//! - FDB_CONTAINER_EXISTS / FDB_DOCUMENT_EXISTS
//! - FDB_INVALID_NAME / FDB_INVALID_DOCUMENT
//! - FDB_STORAGE_IO_ERROR / FDB_DATA_CORRUPTION

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the container registry and the document store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Container '{0}' not found")]
    ContainerNotFound(String),

    #[error("Container '{0}' already exists")]
    ContainerAlreadyExists(String),

    #[error("Document '{id}' not found in container '{container}'")]
    DocumentNotFound { container: String, id: String },

    #[error("Document '{id}' already exists in container '{container}'")]
    DocumentAlreadyExists { container: String, id: String },

    #[error("Invalid {what} name '{name}': {reason}")]
    InvalidName {
        what: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt document file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl StorageError {
    /// Wraps an I/O failure with a description of what was attempted
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::ContainerNotFound(_) => "FDB_CONTAINER_NOT_FOUND",
            StorageError::ContainerAlreadyExists(_) => "FDB_CONTAINER_EXISTS",
            StorageError::DocumentNotFound { .. } => "FDB_DOCUMENT_NOT_FOUND",
            StorageError::DocumentAlreadyExists { .. } => "FDB_DOCUMENT_EXISTS",
            StorageError::InvalidName { .. } => "FDB_INVALID_NAME",
            StorageError::InvalidDocument(_) => "FDB_INVALID_DOCUMENT",
            StorageError::Io { .. } => "FDB_STORAGE_IO_ERROR",
            StorageError::Corrupt { .. } => "FDB_DATA_CORRUPTION",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ContainerNotFound(_) | StorageError::DocumentNotFound { .. }
        )
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            StorageError::ContainerAlreadyExists(_) | StorageError::DocumentAlreadyExists { .. }
        )
    }

    /// Caller-side input problems (bad names, non-object bodies)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StorageError::InvalidName { .. } | StorageError::InvalidDocument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StorageError::ContainerNotFound("users".into()).code(),
            "FDB_CONTAINER_NOT_FOUND"
        );
        assert_eq!(
            StorageError::io("read", io::Error::new(io::ErrorKind::Other, "boom")).code(),
            "FDB_STORAGE_IO_ERROR"
        );
    }

    #[test]
    fn test_classification() {
        let missing = StorageError::DocumentNotFound {
            container: "users".into(),
            id: "u1".into(),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_already_exists());
        assert!(StorageError::InvalidDocument("array".into()).is_validation());
    }

    #[test]
    fn test_display_names_target() {
        let err = StorageError::DocumentAlreadyExists {
            container: "users".into(),
            id: "u1".into(),
        };
        let display = err.to_string();
        assert!(display.contains("u1"));
        assert!(display.contains("users"));
    }
}
