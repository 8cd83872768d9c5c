//! Transfer error types
//!
//! Error codes:
//! - FDB_TRANSFER_IO_ERROR: reading or writing export/import/backup files
//! - FDB_TARGET_EXISTS: backup target already present
//! - FDB_SOURCE_NOT_FOUND: import file or folder missing
//! - FDB_INVALID_IMPORT_FILE: import file is not a JSON object or array
//! - FDB_INVALID_TARGET: unusable export/backup path
//! - storage codes pass through unchanged

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid import file {}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid target {}: {reason}", path.display())]
    InvalidTarget { path: PathBuf, reason: &'static str },
}

impl TransferError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        TransferError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransferError::Storage(e) => e.code(),
            TransferError::Io { .. } => "FDB_TRANSFER_IO_ERROR",
            TransferError::TargetExists(_) => "FDB_TARGET_EXISTS",
            TransferError::SourceNotFound(_) => "FDB_SOURCE_NOT_FOUND",
            TransferError::InvalidFile { .. } => "FDB_INVALID_IMPORT_FILE",
            TransferError::InvalidTarget { .. } => "FDB_INVALID_TARGET",
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            TransferError::Storage(e) => e.is_not_found(),
            TransferError::SourceNotFound(_) => true,
            _ => false,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        match self {
            TransferError::Storage(e) => e.is_already_exists(),
            TransferError::TargetExists(_) => true,
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        match self {
            TransferError::Storage(e) => e.is_validation(),
            TransferError::InvalidFile { .. } | TransferError::InvalidTarget { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_kinds() {
        let err = TransferError::TargetExists(PathBuf::from("/tmp/b"));
        assert_eq!(err.code(), "FDB_TARGET_EXISTS");
        assert!(err.is_already_exists());

        let err = TransferError::SourceNotFound(PathBuf::from("in.json"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("in.json"));

        let err = TransferError::from(StorageError::ContainerNotFound("users".into()));
        assert_eq!(err.code(), "FDB_CONTAINER_NOT_FOUND");
        assert!(err.is_not_found());
    }
}
