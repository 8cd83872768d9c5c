//! folderdb - a file-per-document store with a small SQL-like query language
//!
//! Each container is a directory and each document a JSON file inside it.
//! Queries are full scans: filter, sort, limit, project.
//!
//! ```ignore
//! use folderdb::api::Database;
//!
//! let mut db = Database::open(Path::new("./data"))?;
//! db.execute("CREATE CONTAINER users");
//! db.execute(r#"INSERT INTO users VALUES ('user_1', '{"name": "Alice", "age": 30}')"#);
//! let envelope = db.execute("SELECT name FROM users WHERE age > 25");
//! ```

pub mod api;
pub mod cli;
pub mod document;
pub mod executor;
pub mod observability;
pub mod parser;
pub mod schema;
pub mod storage;
pub mod transfer;
