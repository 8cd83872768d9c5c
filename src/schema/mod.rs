//! Schema Analyzer subsystem for folderdb
//!
//! Containers are schemaless. `describe` infers a per-field type and
//! presence report by scanning every document; it never rejects data.

mod analyzer;
mod types;

pub use analyzer::SchemaAnalyzer;
pub use types::{FieldReport, SchemaReport, TypeCount};
