//! Executor error types
//!
//! Error codes:
//! - FDB_INVALID_LITERAL: a condition literal has the wrong type for its operator
//! - storage codes pass through unchanged

use thiserror::Error;

use crate::parser::Operator;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Container resolution or scan failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Literal unusable with its operator (e.g. `age > 'old'` built programmatically)
    #[error("Operator {op} on field '{field}' requires {expected}, got {found}")]
    InvalidLiteral {
        field: String,
        op: Operator,
        expected: &'static str,
        found: String,
    },
}

impl ExecutorError {
    pub fn invalid_literal(
        field: impl Into<String>,
        op: Operator,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        ExecutorError::InvalidLiteral {
            field: field.into(),
            op,
            expected,
            found: found.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Storage(e) => e.code(),
            ExecutorError::InvalidLiteral { .. } => "FDB_INVALID_LITERAL",
        }
    }

    /// Returns true for caller mistakes rather than storage failures
    pub fn is_validation(&self) -> bool {
        match self {
            ExecutorError::Storage(e) => e.is_validation(),
            ExecutorError::InvalidLiteral { .. } => true,
        }
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
