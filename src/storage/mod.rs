//! Document Storage subsystem for folderdb
//!
//! The filesystem is the database:
//!
//! ```text
//! <root>/
//! ├── users/
//! │   ├── user_1.json
//! │   └── user_2.json
//! └── products/
//!     └── product_1.json
//! ```
//!
//! # Design Principles
//!
//! - One human-readable JSON file per document
//! - Per-document atomic writes (temp file + fsync + rename)
//! - No cross-document atomicity, no caching, no secondary indexes
//! - Last write wins; callers sharing a root must serialize their writes

mod errors;
mod naming;
mod registry;
mod store;

pub use errors::{StorageError, StorageResult};
pub use naming::{is_valid_name, validate_container_name, validate_document_id, MAX_NAME_LEN};
pub use registry::ContainerRegistry;
pub use store::DocumentStore;
