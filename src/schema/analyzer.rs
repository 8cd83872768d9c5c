//! Best-effort schema inference
//!
//! Scans every document of a container and records, per field name, the
//! type tags seen and how many documents contain the field.

use std::collections::BTreeMap;

use super::types::{FieldReport, SchemaReport, TypeCount};
use crate::document::ValueKind;
use crate::storage::{DocumentStore, StorageResult};

#[derive(Default)]
struct FieldStats {
    present: usize,
    kinds: BTreeMap<ValueKind, usize>,
}

pub struct SchemaAnalyzer;

impl SchemaAnalyzer {
    /// Describes a container.
    ///
    /// Fails with `ContainerNotFound` if the container does not exist;
    /// an empty container yields a report with no fields.
    pub fn describe(store: &DocumentStore, container: &str) -> StorageResult<SchemaReport> {
        let documents = store.list_all(container)?;
        let total = documents.len();

        let mut stats: BTreeMap<String, FieldStats> = BTreeMap::new();
        for document in &documents {
            for (name, value) in document.fields() {
                let entry = stats.entry(name.clone()).or_default();
                entry.present += 1;
                *entry.kinds.entry(ValueKind::of(value)).or_insert(0) += 1;
            }
        }

        let fields = stats
            .into_iter()
            .map(|(name, stats)| build_field_report(name, stats, total))
            .collect();

        Ok(SchemaReport {
            container: container.to_string(),
            total_documents: total,
            fields,
            sample: documents.into_iter().next(),
        })
    }
}

fn build_field_report(name: String, stats: FieldStats, total: usize) -> FieldReport {
    let mut types: Vec<TypeCount> = stats
        .kinds
        .into_iter()
        .map(|(kind, count)| TypeCount { kind, count })
        .collect();
    // stable: ties keep tag order
    types.sort_by(|a, b| b.count.cmp(&a.count));

    let dominant_type = types.first().map(|t| t.kind).unwrap_or(ValueKind::Null);

    FieldReport {
        name,
        types,
        dominant_type,
        present_count: stats.present,
        coverage: stats.present as f64 / total as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with(docs: &[(&str, serde_json::Value)]) -> (TempDir, DocumentStore) {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        store.registry().create("users").unwrap();
        for (id, body) in docs {
            store.insert("users", id, body.clone()).unwrap();
        }
        (temp, store)
    }

    #[test]
    fn test_coverage() {
        let (_temp, store) = store_with(&[
            ("u1", json!({"name": "Alice", "email": "a@example.com"})),
            ("u2", json!({"name": "Bob"})),
        ]);

        let report = SchemaAnalyzer::describe(&store, "users").unwrap();
        assert_eq!(report.total_documents, 2);

        let email = report.field("email").unwrap();
        assert_eq!(email.coverage, 0.5);
        assert_eq!(email.present_count, 1);
        assert_eq!(email.dominant_type, ValueKind::String);

        assert_eq!(report.field("name").unwrap().coverage, 1.0);
        assert_eq!(report.field("_id").unwrap().coverage, 1.0);
    }

    #[test]
    fn test_sample_is_first_document() {
        let (_temp, store) = store_with(&[
            ("u2", json!({"name": "Bob"})),
            ("u1", json!({"name": "Alice"})),
        ]);

        let report = SchemaAnalyzer::describe(&store, "users").unwrap();
        let sample = report.sample.unwrap();
        assert_eq!(sample.id(), "u1");
        assert_eq!(sample.get("name"), Some(&json!("Alice")));
    }

    #[test]
    fn test_mixed_types_sorted_by_frequency() {
        let (_temp, store) = store_with(&[
            ("a", json!({"age": "unknown"})),
            ("b", json!({"age": 30})),
            ("c", json!({"age": 41})),
        ]);

        let report = SchemaAnalyzer::describe(&store, "users").unwrap();
        let age = report.field("age").unwrap();
        assert!(age.is_mixed());
        assert_eq!(age.dominant_type, ValueKind::Number);
        assert_eq!(
            age.types,
            vec![
                TypeCount { kind: ValueKind::Number, count: 2 },
                TypeCount { kind: ValueKind::String, count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_container_has_no_fields() {
        let (_temp, store) = store_with(&[]);
        let report = SchemaAnalyzer::describe(&store, "users").unwrap();
        assert_eq!(report.total_documents, 0);
        assert!(report.fields.is_empty());
        assert!(report.sample.is_none());
    }

    #[test]
    fn test_missing_container() {
        let (_temp, store) = store_with(&[]);
        let err = SchemaAnalyzer::describe(&store, "nope").unwrap_err();
        assert!(err.is_not_found());
    }
}
