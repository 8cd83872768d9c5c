//! Transfer subsystem for folderdb
//!
//! Moves documents in and out of a database root: JSON export, JSON
//! import, and whole-database backup (directory copy or tar archive).
//! These collaborators use the document store's public contract only;
//! they add no invariants of their own.

mod backup;
mod errors;
mod export;
mod import;
mod target;

pub use backup::{backup, default_backup_path, BackupFormat, BackupSummary};
pub use errors::{TransferError, TransferResult};
pub use export::{export_all, export_container, ExportSummary};
pub use import::{import_file, import_folder, ImportSummary};
