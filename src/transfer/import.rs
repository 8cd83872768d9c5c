//! JSON import
//!
//! A file holds either one JSON object or an array of objects. Each
//! entry's id comes from `_id`, then `id`, and otherwise is generated as
//! `imported_<n>_<YYYYmmdd_HHMMSS>`. Entries that are not objects, carry
//! an invalid id, or collide with an existing document count as failed;
//! they do not abort the import.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use super::errors::{TransferError, TransferResult};
use crate::document::ID_FIELD;
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{is_valid_name, DocumentStore};

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    /// Containers that received at least one entry attempt
    pub containers: Vec<String>,
}

/// Imports every `*.json` file of `dir` into a container named after the
/// file stem. Files are processed in name order.
pub fn import_folder(store: &DocumentStore, dir: &Path) -> TransferResult<ImportSummary> {
    if !dir.is_dir() {
        return Err(TransferError::SourceNotFound(dir.to_path_buf()));
    }

    let mut summary = ImportSummary::default();
    for (container, file) in json_files(dir)? {
        let part = import_entries(store, &container, &file)?;
        summary.imported += part.imported;
        summary.failed += part.failed;
        summary.containers.extend(part.containers);
    }

    log_summary(&summary);
    Ok(summary)
}

/// Imports one file into `container`, creating the container if needed
pub fn import_file(
    store: &DocumentStore,
    container: &str,
    file: &Path,
) -> TransferResult<ImportSummary> {
    if !file.is_file() {
        return Err(TransferError::SourceNotFound(file.to_path_buf()));
    }

    let summary = import_entries(store, container, file)?;
    log_summary(&summary);
    Ok(summary)
}

fn import_entries(
    store: &DocumentStore,
    container: &str,
    file: &Path,
) -> TransferResult<ImportSummary> {
    let entries = read_entries(file)?;

    if !store.registry().exists(container) {
        store.registry().create(container)?;
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut summary = ImportSummary {
        containers: vec![container.to_string()],
        ..ImportSummary::default()
    };

    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            summary.failed += 1;
            continue;
        }

        let id = entry_id(&entry).unwrap_or_else(|| format!("imported_{}_{}", index + 1, stamp));
        match store.insert(container, &id, entry) {
            Ok(_) => summary.imported += 1,
            Err(e) if e.is_already_exists() || e.is_validation() => summary.failed += 1,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

fn read_entries(file: &Path) -> TransferResult<Vec<Value>> {
    let text = fs::read_to_string(file)
        .map_err(|e| TransferError::io(format!("Failed to read {}", file.display()), e))?;

    let value: Value = serde_json::from_str(&text).map_err(|e| TransferError::InvalidFile {
        path: file.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        _ => Err(TransferError::InvalidFile {
            path: file.to_path_buf(),
            reason: "expected a JSON object or an array of objects".to_string(),
        }),
    }
}

fn entry_id(entry: &Value) -> Option<String> {
    [ID_FIELD, "id"]
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// `(stem, path)` of every `*.json` file whose stem is a valid container name
fn json_files(dir: &Path) -> TransferResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| TransferError::io(format!("Failed to list {}", dir.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| TransferError::io("Failed to read directory entry", e))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if is_valid_name(stem) {
                files.push((stem.to_string(), path.clone()));
            }
        }
    }

    files.sort();
    Ok(files)
}

fn log_summary(summary: &ImportSummary) {
    let imported = summary.imported.to_string();
    let failed = summary.failed.to_string();
    log_event_with_fields(
        Event::ImportComplete,
        &[("failed", failed.as_str()), ("imported", imported.as_str())],
    );
}
