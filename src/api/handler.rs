//! Statement handling
//!
//! Parses one statement, dispatches it to the store, executor, analyzer, or
//! a transfer collaborator, and wraps the outcome in a [`ResultEnvelope`].
//! No error escapes [`CommandHandler::execute`].

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};
use super::response::{OperationKind, ResultEnvelope};
use super::session::Session;
use crate::document::Document;
use crate::executor::QueryExecutor;
use crate::observability::{log_event_with_fields, Event};
use crate::parser::{parse_statement, ExportTarget, Statement};
use crate::schema::SchemaAnalyzer;
use crate::storage::DocumentStore;
use crate::transfer;

pub const HELP_TEXT: &str = "\
Queries:
  SELECT <fields|*> FROM <container> [WHERE <field> <op> <value> [AND ...]]
         [ORDER BY <field> [ASC|DESC]] [LIMIT <n>]
  INSERT INTO <container> VALUES ('<id>', '<json>')
  CREATE CONTAINER <name> | DROP CONTAINER <name>
  operators: = != > < >= <= LIKE IN ['a', 'b']
Commands:
  show containers | show documents [container] | use <container>
  describe [container] | count <container> [WHERE ...]
  insert <container> <id> <json> | update <container> <id> <json>
  delete <container> <id>
  export [all|<container>] <path> | import [<container>] <path>
  backup [path] | history | help | exit";

/// Executes statements against one document store
pub struct CommandHandler<'a> {
    store: &'a DocumentStore,
}

impl<'a> CommandHandler<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Records, parses, and runs one statement
    pub fn execute(&self, session: &mut Session, input: &str) -> ResultEnvelope {
        let text = input.trim();
        session.record(text);

        let envelope = match parse_statement(text) {
            Ok(statement) => {
                let kind = OperationKind::of(&statement);
                self.dispatch(session, statement)
                    .unwrap_or_else(|e| ResultEnvelope::failure(kind, &e))
            }
            Err(e) => ResultEnvelope::failure(OperationKind::Error, &ApiError::from_parse_error(e)),
        };

        if !envelope.success {
            let code = envelope.code.as_deref().unwrap_or_default();
            log_event_with_fields(Event::StatementFailed, &[("code", code), ("statement", text)]);
        }
        envelope
    }

    /// Runs an already parsed statement
    pub fn dispatch(&self, session: &mut Session, statement: Statement) -> ApiResult<ResultEnvelope> {
        let kind = OperationKind::of(&statement);

        match statement {
            Statement::Select(query) => {
                let result = QueryExecutor::new(self.store).execute(&query)?;
                let message = format!("Found {} document(s)", result.len());
                Ok(ResultEnvelope::ok(kind, message).with_results(documents_to_values(result.documents)))
            }
            Statement::Count(query) => {
                let count = QueryExecutor::new(self.store).count(&query)?;
                Ok(ResultEnvelope::ok(kind, format!("Count: {}", count)).with_count(count))
            }
            Statement::Insert { container, id, body } => {
                let document = self.store.insert(&container, &id, body)?;
                let message = format!("Document '{}' inserted into '{}'", id, container);
                Ok(ResultEnvelope::ok(kind, message).with_results(vec![document.into_value()]))
            }
            Statement::Update { container, id, body } => {
                let document = self.store.update(&container, &id, body)?;
                let message = format!("Document '{}' updated in '{}'", id, container);
                Ok(ResultEnvelope::ok(kind, message).with_results(vec![document.into_value()]))
            }
            Statement::Delete { container, id } => {
                self.store.delete(&container, &id)?;
                Ok(ResultEnvelope::ok(
                    kind,
                    format!("Document '{}' deleted from '{}'", id, container),
                ))
            }
            Statement::CreateContainer { name } => {
                self.store.registry().create(&name)?;
                Ok(ResultEnvelope::ok(kind, format!("Container '{}' created", name)))
            }
            Statement::DropContainer { name } => {
                self.store.registry().drop(&name)?;
                if session.current_container() == Some(name.as_str()) {
                    session.clear_container();
                }
                Ok(ResultEnvelope::ok(kind, format!("Container '{}' dropped", name)))
            }
            Statement::ShowContainers => {
                let mut results = Vec::new();
                for name in self.store.registry().list()? {
                    let documents = self.store.count_all(&name)?;
                    results.push(json!({"name": name, "documents": documents}));
                }
                let message = format!("{} container(s)", results.len());
                Ok(ResultEnvelope::ok(kind, message).with_results(results))
            }
            Statement::ShowDocuments { container } => {
                let container = session
                    .resolve_container(container)
                    .ok_or_else(ApiError::no_container_selected)?;
                let documents = self.store.list_all(&container)?;
                let message = format!("{} document(s) in '{}'", documents.len(), container);
                Ok(ResultEnvelope::ok(kind, message).with_results(documents_to_values(documents)))
            }
            Statement::Use { container } => {
                self.store.registry().require(&container)?;
                let message = format!("Using container '{}'", container);
                session.use_container(container);
                Ok(ResultEnvelope::ok(kind, message))
            }
            Statement::Describe { container } => {
                let container = session
                    .resolve_container(container)
                    .ok_or_else(ApiError::no_container_selected)?;
                let report = SchemaAnalyzer::describe(self.store, &container)?;
                let message = format!(
                    "Container '{}': {} document(s), {} field(s)",
                    container,
                    report.total_documents,
                    report.fields.len()
                );
                Ok(ResultEnvelope::ok(kind, message).with_data(to_data(&report)?))
            }
            Statement::Export { target, path } => {
                let summary = match target {
                    ExportTarget::All => transfer::export_all(self.store, &path)?,
                    ExportTarget::Container(name) => {
                        transfer::export_container(self.store, &name, &path)?
                    }
                };
                let message = format!(
                    "Exported {} document(s) from {} container(s)",
                    summary.documents, summary.containers
                );
                Ok(ResultEnvelope::ok(kind, message).with_data(to_data(&summary)?))
            }
            Statement::Import { container, path } => {
                let summary = match container {
                    Some(name) => transfer::import_file(self.store, &name, &path)?,
                    None => transfer::import_folder(self.store, &path)?,
                };
                let message = format!(
                    "Imported {} document(s), {} failed",
                    summary.imported, summary.failed
                );
                Ok(ResultEnvelope::ok(kind, message).with_data(to_data(&summary)?))
            }
            Statement::Backup { path } => {
                let path = path.unwrap_or_else(transfer::default_backup_path);
                let summary = transfer::backup(self.store, &path)?;
                let message = format!("Backup written to {}", summary.path.display());
                Ok(ResultEnvelope::ok(kind, message).with_data(to_data(&summary)?))
            }
            Statement::History => {
                let entries = session
                    .history()
                    .map(to_data)
                    .collect::<ApiResult<Vec<_>>>()?;
                let message = format!("{} statement(s) in history", entries.len());
                Ok(ResultEnvelope::ok(kind, message).with_results(entries))
            }
            Statement::Help => Ok(ResultEnvelope::ok(kind, HELP_TEXT)),
            Statement::Exit => Ok(ResultEnvelope::ok(kind, "Goodbye")),
        }
    }
}

fn documents_to_values(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(Document::into_value).collect()
}

fn to_data<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(ApiError::serialization)
}
