//! Query executor for folderdb
//!
//! Execution flow (strict order):
//! 1. Resolve the container (missing container fails before anything else)
//! 2. Compile the conditions
//! 3. Read every document of the container (full scan, no index)
//! 4. Filter
//! 5. Sort (if specified)
//! 6. Apply limit
//! 7. Project (requested fields plus `_id`)
//!
//! Parsed statements and programmatically built queries share this
//! pipeline. A scan reads documents one by one, so a concurrent writer may
//! leave it with a mix of old and new state.

use super::errors::ExecutorResult;
use super::filters::PredicateFilter;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;
use crate::document::Document;
use crate::observability::{log_event_with_fields, Event};
use crate::parser::Query;
use crate::storage::DocumentStore;

/// Runs queries against a document store
pub struct QueryExecutor<'a> {
    store: &'a DocumentStore,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Executes a query and returns projected results.
    ///
    /// Deterministic for a fixed document set: the scan is ordered by
    /// `_id` and the sort is stable.
    pub fn execute(&self, query: &Query) -> ExecutorResult<ExecutionResult> {
        let (mut candidates, scanned_count) = self.scan(query)?;

        if let Some(sort_spec) = &query.order_by {
            ResultSorter::sort(&mut candidates, sort_spec);
        }

        let mut limit_applied = false;
        if let Some(limit) = query.limit {
            limit_applied = candidates.len() > limit;
            candidates.truncate(limit);
        }

        let documents: Vec<Document> = if query.selects_all() {
            candidates
        } else {
            candidates
                .iter()
                .map(|document| document.project(&query.fields))
                .collect()
        };

        let returned = documents.len().to_string();
        let scanned = scanned_count.to_string();
        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("container", query.container.as_str()),
                ("mode", "select"),
                ("returned", returned.as_str()),
                ("scanned", scanned.as_str()),
            ],
        );

        Ok(ExecutionResult {
            returned_count: documents.len(),
            scanned_count,
            limit_applied,
            documents,
        })
    }

    /// Counts matching documents. Only the container and conditions of
    /// `query` are used; nothing is sorted or projected.
    pub fn count(&self, query: &Query) -> ExecutorResult<usize> {
        let (matched, scanned_count) = self.scan(query)?;

        let returned = matched.len().to_string();
        let scanned = scanned_count.to_string();
        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("container", query.container.as_str()),
                ("mode", "count"),
                ("returned", returned.as_str()),
                ("scanned", scanned.as_str()),
            ],
        );

        Ok(matched.len())
    }

    /// Steps 1-4: returns the matching documents and the number scanned
    fn scan(&self, query: &Query) -> ExecutorResult<(Vec<Document>, usize)> {
        self.store.registry().require(&query.container)?;
        let filter = PredicateFilter::compile(&query.conditions)?;

        let mut documents = self.store.list_all(&query.container)?;
        let scanned_count = documents.len();
        if !filter.is_empty() {
            documents.retain(|document| filter.matches(document));
        }
        Ok((documents, scanned_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorError;
    use crate::parser::{Condition, SortSpec};
    use crate::storage::StorageError;
    use serde_json::json;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, DocumentStore) {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        store.registry().create("users").unwrap();
        store
            .insert("users", "user_1", json!({"name": "Alice", "age": 30, "city": "New York"}))
            .unwrap();
        store
            .insert("users", "user_2", json!({"name": "Bob", "age": 25, "city": "Boston"}))
            .unwrap();
        store
            .insert("users", "user_3", json!({"name": "Carol", "city": "Newark"}))
            .unwrap();
        (temp, store)
    }

    #[test]
    fn test_select_all_returns_every_document_in_id_order() {
        let (_temp, store) = seeded_store();
        let result = QueryExecutor::new(&store).execute(&Query::new("users")).unwrap();

        assert_eq!(result.ids(), vec!["user_1", "user_2", "user_3"]);
        assert_eq!(result.scanned_count, 3);
        assert_eq!(result.returned_count, 3);
        assert!(!result.limit_applied);
        assert!(result.documents[0].created_at().is_some());
    }

    #[test]
    fn test_filter_sort_limit_project() {
        let (_temp, store) = seeded_store();
        let query = Query::new("users")
            .select(["name"])
            .filter(Condition::like("city", "new"))
            .order_by(SortSpec::desc("age"))
            .limit(1);

        let result = QueryExecutor::new(&store).execute(&query).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.limit_applied);
        assert_eq!(
            result.documents[0].clone().into_value(),
            json!({"_id": "user_1", "name": "Alice"})
        );
    }

    #[test]
    fn test_limit_zero() {
        let (_temp, store) = seeded_store();
        let result = QueryExecutor::new(&store)
            .execute(&Query::new("users").limit(0))
            .unwrap();
        assert!(result.is_empty());
        assert!(result.limit_applied);
    }

    #[test]
    fn test_count_matches_select_length() {
        let (_temp, store) = seeded_store();
        let executor = QueryExecutor::new(&store);

        for conditions in [
            vec![],
            vec![Condition::gt("age", json!(25))],
            vec![Condition::ne("age", json!(30))],
            vec![Condition::like("name", "o")],
        ] {
            let mut query = Query::new("users");
            query.conditions = conditions;
            let selected = executor.execute(&query).unwrap().len();
            assert_eq!(executor.count(&query).unwrap(), selected);
        }
    }

    #[test]
    fn test_missing_container() {
        let (_temp, store) = seeded_store();
        let err = QueryExecutor::new(&store)
            .execute(&Query::new("ghosts"))
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::Storage(StorageError::ContainerNotFound(_))
        ));
    }

    #[test]
    fn test_missing_container_reported_before_bad_literal() {
        let (_temp, store) = seeded_store();
        let query = Query::new("ghosts").filter(Condition::gt("age", json!("old")));
        let err = QueryExecutor::new(&store).count(&query).unwrap_err();
        assert_eq!(err.code(), "FDB_CONTAINER_NOT_FOUND");
    }
}
