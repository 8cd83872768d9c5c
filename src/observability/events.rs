//! Observable lifecycle events for folderdb
//!
//! Events are explicit and typed; each one maps to a stable
//! upper-case name used as the `event` key of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events in folderdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Database root opened
    DatabaseOpened,
    /// Configuration file loaded
    ConfigLoaded,
    /// Startup failed (FATAL)
    StartupFailed,

    // Containers
    ContainerCreated,
    ContainerDropped,

    // Documents
    DocumentInserted,
    DocumentUpdated,
    DocumentDeleted,

    // Statements and queries
    /// A query pipeline finished
    QueryExecuted,
    /// A statement produced a failure envelope
    StatementFailed,

    // Collaborators
    ExportComplete,
    ImportComplete,
    BackupComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatabaseOpened => "DATABASE_OPENED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StartupFailed => "STARTUP_FAILED",

            Event::ContainerCreated => "CONTAINER_CREATED",
            Event::ContainerDropped => "CONTAINER_DROPPED",

            Event::DocumentInserted => "DOCUMENT_INSERTED",
            Event::DocumentUpdated => "DOCUMENT_UPDATED",
            Event::DocumentDeleted => "DOCUMENT_DELETED",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::StatementFailed => "STATEMENT_FAILED",

            Event::ExportComplete => "EXPORT_COMPLETE",
            Event::ImportComplete => "IMPORT_COMPLETE",
            Event::BackupComplete => "BACKUP_COMPLETE",
        }
    }

    /// Severity a log line for this event is written at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StartupFailed => Severity::Fatal,
            Event::StatementFailed => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::DatabaseOpened,
            Event::ConfigLoaded,
            Event::StartupFailed,
            Event::ContainerCreated,
            Event::ContainerDropped,
            Event::DocumentInserted,
            Event::DocumentUpdated,
            Event::DocumentDeleted,
            Event::QueryExecuted,
            Event::StatementFailed,
            Event::ExportComplete,
            Event::ImportComplete,
            Event::BackupComplete,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::StartupFailed.severity(), Severity::Fatal);
        assert_eq!(Event::StatementFailed.severity(), Severity::Warn);
        assert_eq!(Event::DatabaseOpened.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ContainerCreated), "CONTAINER_CREATED");
    }
}
