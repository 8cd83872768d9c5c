//! Observability subsystem for folderdb
//!
//! Structured JSON logging of lifecycle events. Observability is
//! read-only: a failing log sink never changes the outcome of an
//! operation.
//!
//! ```ignore
//! use folderdb::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ContainerCreated, &[("container", "users")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
