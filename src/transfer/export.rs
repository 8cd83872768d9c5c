//! JSON export
//!
//! An export file is a pretty-printed JSON array of stamped documents,
//! ready to be read back by `import`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::errors::{TransferError, TransferResult};
use super::target::ensure_outside_root;
use crate::document::Document;
use crate::observability::{log_event_with_fields, Event};
use crate::storage::DocumentStore;

const OUTSIDE_ROOT: &str = "export target must be outside the database root";

/// Outcome of an export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportSummary {
    /// Files written, in container order
    pub files: Vec<PathBuf>,
    pub containers: usize,
    pub documents: usize,
}

/// Exports one container.
///
/// A `path` ending in `.json` is the output file; any other path is a
/// directory that receives `<container>.json`. An existing file is replaced.
/// Targets inside the database root are rejected.
pub fn export_container(
    store: &DocumentStore,
    container: &str,
    path: &Path,
) -> TransferResult<ExportSummary> {
    let documents = store.list_all(container)?;

    let file = if has_json_extension(path) {
        path.to_path_buf()
    } else {
        path.join(format!("{}.json", container))
    };
    ensure_outside_root(store.registry().root(), &file, OUTSIDE_ROOT)?;
    write_export(&file, &documents)?;

    let summary = ExportSummary {
        files: vec![file],
        containers: 1,
        documents: documents.len(),
    };
    log_summary(&summary);
    Ok(summary)
}

/// Exports every non-empty container to `<dir>/<container>.json`
pub fn export_all(store: &DocumentStore, dir: &Path) -> TransferResult<ExportSummary> {
    if has_json_extension(dir) {
        return Err(TransferError::InvalidTarget {
            path: dir.to_path_buf(),
            reason: "exporting all containers requires a directory",
        });
    }
    ensure_outside_root(store.registry().root(), dir, OUTSIDE_ROOT)?;

    let mut summary = ExportSummary::default();
    for container in store.registry().list()? {
        let documents = store.list_all(&container)?;
        if documents.is_empty() {
            continue;
        }

        let file = dir.join(format!("{}.json", container));
        write_export(&file, &documents)?;

        summary.files.push(file);
        summary.containers += 1;
        summary.documents += documents.len();
    }

    log_summary(&summary);
    Ok(summary)
}

fn write_export(file: &Path, documents: &[Document]) -> TransferResult<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            TransferError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }

    let json = serde_json::to_string_pretty(documents).map_err(|e| {
        TransferError::io(
            format!("Failed to serialize export for {}", file.display()),
            e.into(),
        )
    })?;

    fs::write(file, json)
        .map_err(|e| TransferError::io(format!("Failed to write {}", file.display()), e))
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn log_summary(summary: &ExportSummary) {
    let containers = summary.containers.to_string();
    let documents = summary.documents.to_string();
    log_event_with_fields(
        Event::ExportComplete,
        &[
            ("containers", containers.as_str()),
            ("documents", documents.as_str()),
        ],
    );
}
