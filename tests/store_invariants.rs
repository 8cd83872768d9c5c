//! Document Store Invariant Tests
//!
//! - stamped metadata survives reads and updates
//! - `_updated_at` never goes backward
//! - duplicate creation leaves existing data untouched
//! - delete is final
//! - the on-disk layout is one JSON file per document

use std::fs;

use folderdb::api::{Database, ErrorKind};
use folderdb::storage::{DocumentStore, StorageError};
use serde_json::{json, Value};
use tempfile::TempDir;

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

// =============================================================================
// Stamping
// =============================================================================

#[test]
fn test_get_returns_inserted_document() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();

    let inserted = store
        .insert("users", "u1", json!({"name": "Alice", "tags": ["a", "b"], "nested": {"k": 1}}))
        .unwrap();
    let fetched = store.get("users", "u1").unwrap();

    assert_eq!(fetched, inserted);
    assert_eq!(fetched.id(), "u1");
    assert_eq!(fetched.created_at(), fetched.updated_at());
}

#[test]
fn test_created_at_stable_and_updated_at_monotonic() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();

    let original = store.insert("users", "u1", json!({"v": 0})).unwrap();
    let created = original.created_at().unwrap().to_string();
    let mut previous = original.updated_at().unwrap().to_string();

    for _ in 0..20 {
        let updated = store.update("users", "u1", json!({})).unwrap();
        assert_eq!(updated.created_at(), Some(created.as_str()));
        let stamp = updated.updated_at().unwrap().to_string();
        assert!(stamp > previous, "{} should be after {}", stamp, previous);
        previous = stamp;
    }

    let fetched = store.get("users", "u1").unwrap();
    assert_eq!(fetched.get("v"), Some(&json!(0)));
}

#[test]
fn test_reserved_fields_cannot_be_overwritten() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();

    let doc = store
        .insert("users", "u1", json!({"_id": "fake", "_created_at": "1970", "name": "A"}))
        .unwrap();
    assert_eq!(doc.id(), "u1");
    assert_ne!(doc.created_at(), Some("1970"));

    let updated = store
        .update("users", "u1", json!({"_created_at": "1970", "name": "B"}))
        .unwrap();
    assert_eq!(updated.created_at(), doc.created_at());
    assert_eq!(updated.get("name"), Some(&json!("B")));
}

// =============================================================================
// Existence
// =============================================================================

#[test]
fn test_duplicate_container_leaves_documents() {
    let temp_dir = create_temp_data_dir();
    let mut db = Database::open(temp_dir.path()).unwrap();
    db.create_container("users").unwrap();
    db.insert("users", "u1", json!({"name": "Alice"})).unwrap();

    let env = db.execute("CREATE CONTAINER users");
    assert_eq!(env.error, Some(ErrorKind::AlreadyExists));
    assert_eq!(db.list_all("users").unwrap().len(), 1);
}

#[test]
fn test_delete_is_final() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();

    assert!(matches!(
        store.delete("users", "ghost"),
        Err(StorageError::DocumentNotFound { .. })
    ));

    store.insert("users", "u1", json!({})).unwrap();
    store.delete("users", "u1").unwrap();
    assert!(matches!(
        store.get("users", "u1"),
        Err(StorageError::DocumentNotFound { .. })
    ));
}

#[test]
fn test_drop_removes_all_documents() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();
    store.insert("users", "u1", json!({})).unwrap();

    store.registry().drop("users").unwrap();
    assert!(!temp_dir.path().join("users").exists());
    assert!(matches!(
        store.list_all("users"),
        Err(StorageError::ContainerNotFound(_))
    ));
}

// =============================================================================
// Persisted layout
// =============================================================================

#[test]
fn test_one_json_file_per_document() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();
    store.insert("users", "user_1", json!({"name": "Alice"})).unwrap();

    let path = temp_dir.path().join("users/user_1.json");
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["_id"], json!("user_1"));
    assert_eq!(on_disk["name"], json!("Alice"));

    let entries: Vec<_> = fs::read_dir(temp_dir.path().join("users"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1, "no temp files left behind");
}

#[test]
fn test_reads_reflect_external_changes() {
    let temp_dir = create_temp_data_dir();
    let store = DocumentStore::open(temp_dir.path()).unwrap();
    store.registry().create("users").unwrap();

    fs::write(
        temp_dir.path().join("users/hand_written.json"),
        r#"{"name": "Written by hand"}"#,
    )
    .unwrap();

    let docs = store.list_all("users").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id(), "hand_written");
}

#[test]
fn test_corrupt_document_is_a_storage_error() {
    let temp_dir = create_temp_data_dir();
    let mut db = Database::open(temp_dir.path()).unwrap();
    db.create_container("users").unwrap();
    fs::write(temp_dir.path().join("users/broken.json"), "{not json").unwrap();

    let env = db.execute("SELECT * FROM users");
    assert!(!env.success);
    assert_eq!(env.error, Some(ErrorKind::StorageError));
    assert_eq!(env.code.as_deref(), Some("FDB_DATA_CORRUPTION"));
}
