//! Result envelope
//!
//! Every statement produces exactly one envelope:
//!
//! ```text
//! { "success": bool, "type": <operation>, "message": string,
//!   "results"?: [...], "count"?: n, "data"?: {...},
//!   "error"?: <ErrorKind>, "code"?: string }
//! ```

use serde::Serialize;
use serde_json::Value;

use super::errors::{ApiError, ErrorKind};
use crate::parser::Statement;

/// Operation tag of an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
    CreateContainer,
    DropContainer,
    ShowContainers,
    ShowDocuments,
    Use,
    Describe,
    Export,
    Import,
    Backup,
    History,
    Help,
    Exit,
    /// Statement could not be parsed
    Error,
}

impl OperationKind {
    pub fn of(statement: &Statement) -> Self {
        match statement {
            Statement::Select(_) => OperationKind::Select,
            Statement::Count(_) => OperationKind::Count,
            Statement::Insert { .. } => OperationKind::Insert,
            Statement::Update { .. } => OperationKind::Update,
            Statement::Delete { .. } => OperationKind::Delete,
            Statement::CreateContainer { .. } => OperationKind::CreateContainer,
            Statement::DropContainer { .. } => OperationKind::DropContainer,
            Statement::ShowContainers => OperationKind::ShowContainers,
            Statement::ShowDocuments { .. } => OperationKind::ShowDocuments,
            Statement::Use { .. } => OperationKind::Use,
            Statement::Describe { .. } => OperationKind::Describe,
            Statement::Export { .. } => OperationKind::Export,
            Statement::Import { .. } => OperationKind::Import,
            Statement::Backup { .. } => OperationKind::Backup,
            Statement::History => OperationKind::History,
            Statement::Help => OperationKind::Help,
            Statement::Exit => OperationKind::Exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Structured payload of non-document results (describe, export, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ResultEnvelope {
    pub fn ok(kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            success: true,
            kind,
            message: message.into(),
            results: None,
            count: None,
            data: None,
            error: None,
            code: None,
        }
    }

    pub fn failure(kind: OperationKind, err: &ApiError) -> Self {
        Self {
            success: false,
            kind,
            message: err.message().to_string(),
            results: None,
            count: None,
            data: None,
            error: Some(err.kind()),
            code: Some(err.code().to_string()),
        }
    }

    /// Attaches results; `count` becomes their number
    pub fn with_results(mut self, results: Vec<Value>) -> Self {
        self.count = Some(results.len());
        self.results = Some(results);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_exit(&self) -> bool {
        self.success && self.kind == OperationKind::Exit
    }

    /// Renders the envelope as one JSON document
    pub fn to_json(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"type":"error","message":{},"error":"StorageError","code":"FDB_SERIALIZATION_ERROR"}}"#,
                Value::String(e.to_string())
            )
        })
    }
}
