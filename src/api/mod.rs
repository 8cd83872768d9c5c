//! API Layer for folderdb
//!
//! Turns statements and programmatic calls into uniform result envelopes.
//!
//! # Design Principles
//!
//! - Session state (selected container, history) is passed explicitly
//! - Error codes pass through unchanged from the subsystem that raised them
//! - Statement entry points never return `Err`; failures are envelopes

mod database;
mod errors;
mod handler;
mod response;
mod session;

pub use database::Database;
pub use errors::{ApiError, ApiErrorCode, ApiResult, ErrorKind};
pub use handler::{CommandHandler, HELP_TEXT};
pub use response::{OperationKind, ResultEnvelope};
pub use session::{HistoryEntry, Session, DEFAULT_HISTORY_LIMIT};
