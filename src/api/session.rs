//! Session context
//!
//! Per-caller state threaded through command handling: the selected
//! container and a bounded statement history. Nothing here is global.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub statement: String,
    pub timestamp: DateTime<Utc>,
    /// Container selected when the statement was submitted
    pub container: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    current_container: Option<String>,
    history: VecDeque<HistoryEntry>,
    history_limit: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl Session {
    /// Creates a session keeping at most `history_limit` entries (minimum 1)
    pub fn new(history_limit: usize) -> Self {
        let history_limit = history_limit.max(1);
        Self {
            current_container: None,
            history: VecDeque::with_capacity(history_limit),
            history_limit,
        }
    }

    pub fn current_container(&self) -> Option<&str> {
        self.current_container.as_deref()
    }

    pub fn use_container(&mut self, name: impl Into<String>) {
        self.current_container = Some(name.into());
    }

    pub fn clear_container(&mut self) {
        self.current_container = None;
    }

    /// Picks the explicit container, falling back to the selected one
    pub fn resolve_container(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.current_container.clone())
    }

    /// Appends a statement, evicting the oldest entry when full
    pub fn record(&mut self, statement: &str) {
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            statement: statement.to_string(),
            timestamp: Utc::now(),
            container: self.current_container.clone(),
        });
    }

    /// History, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_ring_buffer() {
        let mut session = Session::new(2);
        session.record("a");
        session.record("b");
        session.record("c");

        let statements: Vec<&str> = session.history().map(|e| e.statement.as_str()).collect();
        assert_eq!(statements, vec!["b", "c"]);
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_history_records_current_container() {
        let mut session = Session::default();
        session.record("show containers");
        session.use_container("users");
        session.record("show documents");

        let containers: Vec<Option<&str>> =
            session.history().map(|e| e.container.as_deref()).collect();
        assert_eq!(containers, vec![None, Some("users")]);
    }

    #[test]
    fn test_resolve_container() {
        let mut session = Session::default();
        assert_eq!(session.resolve_container(None), None);
        session.use_container("users");
        assert_eq!(session.resolve_container(None), Some("users".to_string()));
        assert_eq!(
            session.resolve_container(Some("products".into())),
            Some("products".to_string())
        );
        session.clear_container();
        assert_eq!(session.current_container(), None);
    }

    #[test]
    fn test_zero_limit_clamped() {
        assert_eq!(Session::new(0).history_limit(), 1);
    }
}
