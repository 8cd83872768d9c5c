//! Filesystem-safe naming rule shared by containers and document ids
//!
//! Both names become path components (`<root>/<container>/<id>.json`),
//! so neither may escape its parent directory or collide with the
//! store's temporary files.

use super::errors::{StorageError, StorageResult};

/// Longest accepted name, in bytes. Leaves room for the `.json.tmp` suffix.
pub const MAX_NAME_LEN: usize = 240;

const FORBIDDEN_CHARS: [char; 9] = ['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Validates a container name
pub fn validate_container_name(name: &str) -> StorageResult<()> {
    validate("container", name)
}

/// Validates a document id
pub fn validate_document_id(id: &str) -> StorageResult<()> {
    validate("document", id)
}

/// Returns true if `name` is usable as a container name or document id
pub fn is_valid_name(name: &str) -> bool {
    check(name).is_none()
}

fn validate(what: &'static str, name: &str) -> StorageResult<()> {
    match check(name) {
        None => Ok(()),
        Some(reason) => Err(StorageError::InvalidName {
            what,
            name: name.to_string(),
            reason,
        }),
    }
}

fn check(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name is empty");
    }
    if name.len() > MAX_NAME_LEN {
        return Some("name is too long");
    }
    if name.starts_with('.') {
        return Some("name must not start with '.'");
    }
    if name.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) {
        return Some("name contains a path separator or reserved character");
    }
    if name.chars().any(char::is_control) {
        return Some("name contains a control character");
    }
    if name.trim() != name {
        return Some("name has leading or trailing whitespace");
    }
    None
}
