//! Schema report types
//!
//! Reports are descriptive only: nothing in folderdb enforces them.

use serde::{Deserialize, Serialize};

use crate::document::{Document, ValueKind};

/// How often one type tag was seen for a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub count: usize,
}

/// Observed shape of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub name: String,
    /// Observed type tags, most frequent first
    pub types: Vec<TypeCount>,
    /// Most frequent type tag
    pub dominant_type: ValueKind,
    /// Number of documents containing the field
    pub present_count: usize,
    /// `present_count / total_documents`
    pub coverage: f64,
}

impl FieldReport {
    /// Returns true if more than one type tag was observed
    pub fn is_mixed(&self) -> bool {
        self.types.len() > 1
    }
}

/// Inferred schema of a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub container: String,
    pub total_documents: usize,
    /// One entry per observed field, ordered by name
    pub fields: Vec<FieldReport>,
    /// First document by `_id`; `None` for an empty container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Document>,
}

impl SchemaReport {
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|f| f.name == name)
    }
}
