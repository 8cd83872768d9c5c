//! Programmatic facade
//!
//! `Database` bundles a document store with a session. Typed methods
//! return [`ApiResult`]; [`Database::execute`] and [`Database::run_query`]
//! return envelopes, like the statement front-end.

use std::path::Path;

use serde_json::Value;

use super::errors::ApiResult;
use super::handler::CommandHandler;
use super::response::{OperationKind, ResultEnvelope};
use super::session::{Session, DEFAULT_HISTORY_LIMIT};
use crate::document::Document;
use crate::executor::{ExecutionResult, QueryExecutor};
use crate::observability::{log_event_with_fields, Event};
use crate::parser::{Query, Statement};
use crate::schema::{SchemaAnalyzer, SchemaReport};
use crate::storage::DocumentStore;

#[derive(Debug)]
pub struct Database {
    store: DocumentStore,
    session: Session,
}

impl Database {
    /// Opens (creating if missing) the database rooted at `root`
    pub fn open(root: &Path) -> ApiResult<Self> {
        Self::open_with_history_limit(root, DEFAULT_HISTORY_LIMIT)
    }

    pub fn open_with_history_limit(root: &Path, history_limit: usize) -> ApiResult<Self> {
        let store = DocumentStore::open(root)?;
        let path = root.display().to_string();
        log_event_with_fields(Event::DatabaseOpened, &[("path", path.as_str())]);

        Ok(Self {
            store,
            session: Session::new(history_limit),
        })
    }

    pub fn root(&self) -> &Path {
        self.store.registry().root()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn create_container(&self, name: &str) -> ApiResult<()> {
        Ok(self.store.registry().create(name)?)
    }

    /// Removes a container and all its documents
    pub fn drop_container(&mut self, name: &str) -> ApiResult<()> {
        self.store.registry().drop(name)?;
        if self.session.current_container() == Some(name) {
            self.session.clear_container();
        }
        Ok(())
    }

    pub fn list_containers(&self) -> ApiResult<Vec<String>> {
        Ok(self.store.registry().list()?)
    }

    pub fn container_exists(&self, name: &str) -> bool {
        self.store.registry().exists(name)
    }

    pub fn insert(&self, container: &str, id: &str, body: Value) -> ApiResult<Document> {
        Ok(self.store.insert(container, id, body)?)
    }

    pub fn get(&self, container: &str, id: &str) -> ApiResult<Document> {
        Ok(self.store.get(container, id)?)
    }

    pub fn update(&self, container: &str, id: &str, partial: Value) -> ApiResult<Document> {
        Ok(self.store.update(container, id, partial)?)
    }

    pub fn delete(&self, container: &str, id: &str) -> ApiResult<()> {
        Ok(self.store.delete(container, id)?)
    }

    pub fn list_all(&self, container: &str) -> ApiResult<Vec<Document>> {
        Ok(self.store.list_all(container)?)
    }

    pub fn select(&self, query: &Query) -> ApiResult<ExecutionResult> {
        Ok(QueryExecutor::new(&self.store).execute(query)?)
    }

    pub fn count(&self, query: &Query) -> ApiResult<usize> {
        Ok(QueryExecutor::new(&self.store).count(query)?)
    }

    pub fn describe(&self, container: &str) -> ApiResult<SchemaReport> {
        Ok(SchemaAnalyzer::describe(&self.store, container)?)
    }

    /// Runs a programmatically built query through the statement pipeline,
    /// returning the same envelope a `SELECT` would
    pub fn run_query(&mut self, query: Query) -> ResultEnvelope {
        let handler = CommandHandler::new(&self.store);
        handler
            .dispatch(&mut self.session, Statement::Select(query))
            .unwrap_or_else(|e| ResultEnvelope::failure(OperationKind::Select, &e))
    }

    /// Executes one statement in this database's session
    pub fn execute(&mut self, statement: &str) -> ResultEnvelope {
        CommandHandler::new(&self.store).execute(&mut self.session, statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::parser::{Condition, SortSpec};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_typed_operations() {
        let temp = TempDir::new().unwrap();
        let db = Database::open(&temp.path().join("db")).unwrap();

        db.create_container("users").unwrap();
        assert!(db.container_exists("users"));
        assert_eq!(db.list_containers().unwrap(), vec!["users"]);

        let inserted = db.insert("users", "u1", json!({"name": "Alice"})).unwrap();
        assert_eq!(db.get("users", "u1").unwrap(), inserted);

        let err = db.insert("users", "u1", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        db.delete("users", "u1").unwrap();
        assert_eq!(db.get("users", "u1").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_run_query_matches_statement() {
        let temp = TempDir::new().unwrap();
        let mut db = Database::open(&temp.path().join("db")).unwrap();
        db.create_container("users").unwrap();
        db.insert("users", "user_1", json!({"name": "Alice", "age": 30})).unwrap();
        db.insert("users", "user_2", json!({"name": "Bob", "age": 25})).unwrap();

        let programmatic = db.run_query(
            Query::new("users")
                .select(["name"])
                .order_by(SortSpec::asc("age"))
                .limit(1),
        );
        let parsed = db.execute("SELECT name FROM users ORDER BY age LIMIT 1");
        assert_eq!(programmatic, parsed);
        assert_eq!(
            parsed.results,
            Some(vec![json!({"_id": "user_2", "name": "Bob"})])
        );

        let env = db.run_query(Query::new("users").filter(Condition::gt("age", json!("old"))));
        assert!(!env.success);
        assert_eq!(env.error, Some(ErrorKind::ValidationError));
    }

    #[test]
    fn test_drop_clears_selected_container() {
        let temp = TempDir::new().unwrap();
        let mut db = Database::open(&temp.path().join("db")).unwrap();
        db.create_container("users").unwrap();
        assert!(db.execute("use users").success);
        db.drop_container("users").unwrap();
        assert_eq!(db.session().current_container(), None);
    }
}
