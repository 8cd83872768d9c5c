//! Document model for folderdb
//!
//! A document is a JSON object whose reserved metadata fields are owned by
//! the store:
//!
//! - `_id`: unique within its container, immutable after insert
//! - `_created_at`: set once at insert
//! - `_updated_at`: refreshed on every successful update
//!
//! Field values are `serde_json::Value`, a tagged union of
//! null / bool / number / string / array / object. Code that needs to
//! branch on the type of a value dispatches on [`ValueKind`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding the document id
pub const ID_FIELD: &str = "_id";

/// Reserved field holding the insert timestamp
pub const CREATED_AT_FIELD: &str = "_created_at";

/// Reserved field holding the last update timestamp
pub const UPDATED_AT_FIELD: &str = "_updated_at";

/// All reserved metadata fields
pub const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Returns true if `field` is stamped by the store and never taken from callers
pub fn is_reserved(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

/// Type tag of a document value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Returns the tag of a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stamped document as persisted in a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Wraps a field map without validation
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the document id, or an empty string if the document is unstamped
    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the insert timestamp
    pub fn created_at(&self) -> Option<&str> {
        self.fields.get(CREATED_AT_FIELD).and_then(Value::as_str)
    }

    /// Returns the last update timestamp
    pub fn updated_at(&self) -> Option<&str> {
        self.fields.get(UPDATED_AT_FIELD).and_then(Value::as_str)
    }

    /// Returns a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns true if the field is present (even if null)
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Number of fields including metadata
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a copy holding only `fields` plus `_id`
    pub fn project(&self, fields: &[String]) -> Document {
        let mut projected = Map::new();
        if let Some(id) = self.fields.get(ID_FIELD) {
            projected.insert(ID_FIELD.to_string(), id.clone());
        }
        for field in fields {
            if let Some(value) = self.fields.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
        Document::from_fields(projected)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

/// Renders a value the way string comparison and LIKE see it.
///
/// Strings are used verbatim (no quotes); everything else uses its
/// compact JSON form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Returns the numeric reading of a value if it has one.
///
/// Numbers are numeric; strings are numeric when they parse as a finite
/// float. Everything else is not numeric-comparable.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
