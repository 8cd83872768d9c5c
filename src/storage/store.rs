//! Document store
//!
//! Maps `(container, id)` to `<root>/<container>/<id>.json`.
//!
//! Every mutation stamps metadata and persists before returning. Writes go
//! to `<id>.json.tmp`, are fsynced, then renamed over the target, so a
//! reader sees either the previous document or the fully stamped new one.
//! There is no cross-document atomicity and no caching: `list_all` reads
//! the directory on every call.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::errors::{StorageError, StorageResult};
use super::naming::validate_document_id;
use super::registry::ContainerRegistry;
use crate::document::{is_reserved, Document, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::observability::{log_event_with_fields, Event};

const DOCUMENT_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".json.tmp";

/// File-per-document store layered over a [`ContainerRegistry`]
#[derive(Debug, Clone)]
pub struct DocumentStore {
    registry: ContainerRegistry,
}

impl DocumentStore {
    /// Opens the store rooted at `root`, creating the root if missing
    pub fn open(root: &Path) -> StorageResult<Self> {
        Ok(Self {
            registry: ContainerRegistry::open(root)?,
        })
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Inserts a new document.
    ///
    /// Reserved fields in `body` are discarded and re-stamped.
    ///
    /// # Errors
    ///
    /// - `ContainerNotFound` if the container does not exist
    /// - `DocumentAlreadyExists` if `id` is taken
    /// - `InvalidName` / `InvalidDocument` for a bad id or a non-object body
    pub fn insert(&self, container: &str, id: &str, body: Value) -> StorageResult<Document> {
        let dir = self.registry.require(container)?;
        validate_document_id(id)?;
        let fields = caller_fields(body)?;

        let path = document_path(&dir, id);
        if path.exists() {
            return Err(StorageError::DocumentAlreadyExists {
                container: container.to_string(),
                id: id.to_string(),
            });
        }

        let stamp = format_stamp(Utc::now());
        let mut stamped = Map::new();
        stamped.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        stamped.insert(CREATED_AT_FIELD.to_string(), Value::String(stamp.clone()));
        stamped.insert(UPDATED_AT_FIELD.to_string(), Value::String(stamp));
        stamped.extend(fields);

        let document = Document::from_fields(stamped);
        write_document(&path, &document)?;

        log_event_with_fields(
            Event::DocumentInserted,
            &[("container", container), ("id", id)],
        );
        Ok(document)
    }

    /// Reads one document
    pub fn get(&self, container: &str, id: &str) -> StorageResult<Document> {
        let dir = self.registry.require(container)?;
        validate_document_id(id)?;
        let path = document_path(&dir, id);

        match read_document(&path, id)? {
            Some(document) => Ok(document),
            None => Err(not_found(container, id)),
        }
    }

    /// Shallow-merges `partial` into an existing document and refreshes
    /// `_updated_at`. Reserved fields in `partial` are ignored.
    ///
    /// `_updated_at` strictly increases across updates even if the wall
    /// clock does not advance.
    pub fn update(&self, container: &str, id: &str, partial: Value) -> StorageResult<Document> {
        let dir = self.registry.require(container)?;
        validate_document_id(id)?;
        let updates = caller_fields(partial)?;

        let path = document_path(&dir, id);
        let mut document = read_document(&path, id)?.ok_or_else(|| not_found(container, id))?;

        let stamp = next_update_stamp(document.updated_at(), Utc::now());
        let fields = document.fields_mut();
        fields.extend(updates);
        fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(stamp));

        write_document(&path, &document)?;

        log_event_with_fields(
            Event::DocumentUpdated,
            &[("container", container), ("id", id)],
        );
        Ok(document)
    }

    /// Removes a document
    pub fn delete(&self, container: &str, id: &str) -> StorageResult<()> {
        let dir = self.registry.require(container)?;
        validate_document_id(id)?;
        let path = document_path(&dir, id);

        fs::remove_file(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                not_found(container, id)
            } else {
                StorageError::io(format!("Failed to delete {}", path.display()), e)
            }
        })?;

        log_event_with_fields(
            Event::DocumentDeleted,
            &[("container", container), ("id", id)],
        );
        Ok(())
    }

    /// Reads every document in a container, ordered by `_id`.
    ///
    /// This is the scan source of every query: O(container size) reads,
    /// no index. A document deleted between listing and reading is
    /// skipped.
    pub fn list_all(&self, container: &str) -> StorageResult<Vec<Document>> {
        let dir = self.registry.require(container)?;

        let mut documents = Vec::new();
        for (id, path) in document_files(&dir)? {
            if let Some(document) = read_document(&path, &id)? {
                documents.push(document);
            }
        }

        documents.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(documents)
    }

    /// Counts document files without parsing them
    pub fn count_all(&self, container: &str) -> StorageResult<usize> {
        let dir = self.registry.require(container)?;
        Ok(document_files(&dir)?.len())
    }
}

fn not_found(container: &str, id: &str) -> StorageError {
    StorageError::DocumentNotFound {
        container: container.to_string(),
        id: id.to_string(),
    }
}

fn document_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.{}", id, DOCUMENT_EXTENSION))
}

/// Lists `(id, path)` for every persisted document in a container directory
fn document_files(dir: &Path) -> StorageResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::io(format!("Failed to list {}", dir.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io("Failed to read directory entry", e))?;
        let path = entry.path();

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file || path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
            continue;
        }

        let id = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.starts_with('.') => stem.to_string(),
            _ => continue,
        };
        files.push((id, path));
    }

    Ok(files)
}

/// Checks that a caller body is an object and strips reserved fields
fn caller_fields(body: Value) -> StorageResult<Map<String, Value>> {
    match body {
        Value::Object(mut map) => {
            map.retain(|key, _| !is_reserved(key));
            Ok(map)
        }
        other => Err(StorageError::InvalidDocument(format!(
            "document body must be a JSON object, got {}",
            crate::document::ValueKind::of(&other)
        ))),
    }
}

/// Reads and parses a document file. `Ok(None)` if the file does not exist.
fn read_document(path: &Path, id: &str) -> StorageResult<Option<Document>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::io(
                format!("Failed to read {}", path.display()),
                e,
            ))
        }
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(mut fields) => {
            // Hand-edited files may lack the id; the file name is authoritative.
            fields
                .entry(ID_FIELD.to_string())
                .or_insert_with(|| Value::String(id.to_string()));
            Ok(Some(Document::from_fields(fields)))
        }
        other => Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", crate::document::ValueKind::of(&other)),
        }),
    }
}

/// Writes a document atomically: temp file, fsync, rename.
fn write_document(path: &Path, document: &Document) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(document).map_err(|e| {
        StorageError::InvalidDocument(format!("document cannot be serialized: {}", e))
    })?;

    let file_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!("{}{}", file_name, TEMP_SUFFIX));

    let write_temp = || -> io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.write_all(b"\n")?;
        file.sync_all()
    };

    if let Err(e) = write_temp() {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::io(
            format!("Failed to write {}", temp_path.display()),
            e,
        ));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::io(format!("Failed to persist {}", path.display()), e)
    })
}

fn format_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Picks the next `_updated_at`: now, unless that would not move past the
/// previous stamp, in which case previous + 1µs.
fn next_update_stamp(previous: Option<&str>, now: DateTime<Utc>) -> String {
    let previous = previous
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    match previous {
        Some(prev) if now <= prev => format_stamp(prev + Duration::microseconds(1)),
        _ => format_stamp(now),
    }
}
