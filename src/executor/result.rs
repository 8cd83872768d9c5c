//! Result types for query execution

use crate::document::Document;

/// Result of query execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Documents in result order, already projected
    pub documents: Vec<Document>,
    /// Number of documents scanned
    pub scanned_count: usize,
    /// Number of documents returned
    pub returned_count: usize,
    /// Whether limit removed any matching document
    pub limit_applied: bool,
}

impl ExecutionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Returns the document ids in result order
    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(Document::id).collect()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}
