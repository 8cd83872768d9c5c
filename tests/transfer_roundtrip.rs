//! Export / Import / Backup Tests
//!
//! Collaborators driven through statements, the way the CLI uses them.

use std::fs;

use folderdb::api::{Database, ErrorKind};
use serde_json::json;
use tempfile::TempDir;

fn seeded() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut db = Database::open(&temp_dir.path().join("db")).unwrap();
    db.execute("create container users");
    db.execute("create container products");
    db.execute(r#"insert users u1 {"name": "Alice"}"#);
    db.execute(r#"insert users u2 {"name": "Bob"}"#);
    db.execute(r#"insert products p1 {"price": 10}"#);
    (temp_dir, db)
}

#[test]
fn test_export_all_then_import_into_fresh_database() {
    let (temp_dir, mut db) = seeded();
    let export_dir = temp_dir.path().join("export");

    let env = db.execute(&format!("export all '{}'", export_dir.display()));
    assert!(env.success, "{}", env.message);
    assert_eq!(env.data.as_ref().unwrap()["documents"], json!(3));

    let mut fresh = Database::open(&temp_dir.path().join("fresh")).unwrap();
    let env = fresh.execute(&format!("import '{}'", export_dir.display()));
    assert!(env.success, "{}", env.message);
    assert_eq!(env.data.as_ref().unwrap()["imported"], json!(3));

    assert_eq!(fresh.list_containers().unwrap(), vec!["products", "users"]);
    assert_eq!(
        fresh.get("users", "u2").unwrap().get("name"),
        Some(&json!("Bob"))
    );

    let env = fresh.execute(&format!("import '{}'", export_dir.display()));
    assert_eq!(env.data.unwrap()["failed"], json!(3));
}

#[test]
fn test_export_single_container_to_file() {
    let (temp_dir, mut db) = seeded();
    let file = temp_dir.path().join("users_export.json");

    assert!(db.execute(&format!("export users '{}'", file.display())).success);
    let exported: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(exported.len(), 2);

    let env = db.execute(&format!("import copies '{}'", file.display()));
    assert!(env.success);
    assert_eq!(db.list_all("copies").unwrap().len(), 2);
}

#[test]
fn test_backup_directory_and_tar() {
    let (temp_dir, mut db) = seeded();

    let dir_target = temp_dir.path().join("backup_dir");
    assert!(db.execute(&format!("backup '{}'", dir_target.display())).success);
    let copy = Database::open(&dir_target).unwrap();
    assert_eq!(copy.list_all("users").unwrap().len(), 2);

    let env = db.execute(&format!("backup '{}'", dir_target.display()));
    assert_eq!(env.error, Some(ErrorKind::AlreadyExists));

    let tar_target = temp_dir.path().join("db.tar");
    let env = db.execute(&format!("backup '{}'", tar_target.display()));
    assert!(env.success, "{}", env.message);
    assert_eq!(env.data.unwrap()["format"], json!("tar"));
    assert!(tar_target.is_file());
}

#[test]
fn test_import_missing_source() {
    let (temp_dir, mut db) = seeded();
    let env = db.execute(&format!(
        "import users '{}'",
        temp_dir.path().join("nope.json").display()
    ));
    assert_eq!(env.error, Some(ErrorKind::NotFound));
}

#[test]
fn test_rejected_backup_inside_root_creates_no_container() {
    let (temp_dir, mut db) = seeded();
    let before = db.execute("show containers").results;

    let target = temp_dir.path().join("db/stray/b.tar");
    let env = db.execute(&format!("backup '{}'", target.display()));
    assert!(!env.success);
    assert_eq!(env.code.as_deref(), Some("FDB_INVALID_TARGET"));

    assert_eq!(db.execute("show containers").results, before);
}

#[test]
fn test_export_into_container_directory_rejected() {
    let (temp_dir, mut db) = seeded();

    let env = db.execute(&format!(
        "export users '{}'",
        temp_dir.path().join("db/users").display()
    ));
    assert_eq!(env.error, Some(ErrorKind::ValidationError));

    let env = db.execute("SELECT * FROM users");
    assert!(env.success, "{}", env.message);
    assert_eq!(env.count, Some(2));
}
