//! Session: the per-user context owning the draft case and run history.
//!
//! Every front-end creates one `Session` per user session; histories are
//! never shared between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{History, HistoryEntry};
use crate::task::TaskId;

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-scoped state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    /// Currently selected task.
    pub task: TaskId,
    /// Case text being edited; validated only when a run is triggered.
    pub case: String,
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            task: TaskId::Treatment,
            case: String::new(),
            history: History::new(),
        }
    }

    pub fn set_case(&mut self, text: impl Into<String>) {
        self.case = text.into();
    }

    pub fn select_task(&mut self, task: TaskId) {
        self.task = task;
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.append(entry);
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Clear the run log. The draft case and selected task are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{RunMode, TaskOutcome};
    use std::collections::BTreeMap;

    #[test]
    fn sessions_have_isolated_histories() {
        let mut a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);

        let mut results = BTreeMap::new();
        results.insert(TaskId::Differential, TaskOutcome::NoContent);
        a.record(HistoryEntry::new(RunMode::SingleTask, "case", results));

        assert_eq!(a.history().len(), 1);
        assert!(b.history().is_empty());
    }

    #[test]
    fn clear_history_keeps_draft() {
        let mut s = Session::new();
        s.set_case("68yo M with COPD");
        s.select_task(TaskId::ConfirmatoryTest);
        s.record(HistoryEntry::new(RunMode::AllTasks, "x", BTreeMap::new()));
        s.clear_history();
        assert!(s.history().is_empty());
        assert_eq!(s.case, "68yo M with COPD");
        assert_eq!(s.task, TaskId::ConfirmatoryTest);
    }
}
