//! API error types
//!
//! API errors are pass-through: they keep the code and message of the
//! subsystem error they wrap and add the taxonomy kind used in result
//! envelopes.

use std::fmt;

use serde::Serialize;

use crate::executor::ExecutorError;
use crate::parser::ParseError;
use crate::storage::StorageError;
use crate::transfer::TransferError;

/// Error taxonomy reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed statement; never touches storage
    SyntaxError,
    /// Container, document, or import source missing
    NotFound,
    /// Duplicate container, document id, or backup target
    AlreadyExists,
    /// Invalid name, body, literal, or request
    ValidationError,
    /// Persistence medium failure, surfaced as-is
    StorageError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::StorageError => "StorageError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API-level error codes not owned by a subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// A command needs a container and none was given or selected
    FdbNoContainerSelected,
    /// Result could not be rendered
    FdbSerializationError,
    /// Statement bytes were not valid UTF-8
    FdbInvalidEncoding,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::FdbNoContainerSelected => "FDB_NO_CONTAINER_SELECTED",
            ApiErrorCode::FdbSerializationError => "FDB_SERIALIZATION_ERROR",
            ApiErrorCode::FdbInvalidEncoding => "FDB_INVALID_ENCODING",
        }
    }
}

/// API error with preserved subsystem error information
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    kind: ErrorKind,
    /// Original error code string (from subsystem or API)
    code: String,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn no_container_selected() -> Self {
        Self::new(
            ErrorKind::ValidationError,
            ApiErrorCode::FdbNoContainerSelected.code(),
            "No container specified. Use 'use <container>' first",
        )
    }

    pub fn serialization(err: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::StorageError,
            ApiErrorCode::FdbSerializationError.code(),
            format!("Failed to serialize result: {}", err),
        )
    }

    pub fn invalid_encoding(reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::SyntaxError,
            ApiErrorCode::FdbInvalidEncoding.code(),
            format!("Statement is not valid UTF-8: {}", reason),
        )
    }

    /// Create from a parse error (pass-through)
    pub fn from_parse_error(err: ParseError) -> Self {
        Self::new(ErrorKind::SyntaxError, err.code().code(), err.to_string())
    }

    /// Create from a storage error (pass-through)
    pub fn from_storage_error(err: StorageError) -> Self {
        let kind = if err.is_not_found() {
            ErrorKind::NotFound
        } else if err.is_already_exists() {
            ErrorKind::AlreadyExists
        } else if err.is_validation() {
            ErrorKind::ValidationError
        } else {
            ErrorKind::StorageError
        };
        Self::new(kind, err.code(), err.to_string())
    }

    /// Create from an executor error (pass-through)
    pub fn from_executor_error(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Storage(e) => Self::from_storage_error(e),
            other => Self::new(ErrorKind::ValidationError, other.code(), other.to_string()),
        }
    }

    /// Create from a transfer error (pass-through)
    pub fn from_transfer_error(err: TransferError) -> Self {
        match err {
            TransferError::Storage(e) => Self::from_storage_error(e),
            other => {
                let kind = if other.is_not_found() {
                    ErrorKind::NotFound
                } else if other.is_already_exists() {
                    ErrorKind::AlreadyExists
                } else if other.is_validation() {
                    ErrorKind::ValidationError
                } else {
                    ErrorKind::StorageError
                };
                Self::new(kind, other.code(), other.to_string())
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::from_parse_error(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::from_storage_error(err)
    }
}

impl From<ExecutorError> for ApiError {
    fn from(err: ExecutorError) -> Self {
        Self::from_executor_error(err)
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        Self::from_transfer_error(err)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
