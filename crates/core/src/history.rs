//! Session history: an append-only log of runs, listed most-recent-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::format::{self, Completion, FormattedResult};
use crate::task::TaskId;

/// Whether a run covered one task or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    SingleTask,
    AllTasks,
}

/// The outcome of one task's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Raw model text.
    Answer { text: String },
    /// Both attempts came back empty.
    NoContent,
    /// The provider call failed.
    Failed { kind: String, message: String },
}

impl TaskOutcome {
    /// Formatted view of the answer; `None` for failures.
    pub fn formatted(&self) -> Option<FormattedResult> {
        match self {
            TaskOutcome::Answer { text } => Some(format::format(&Completion::Content(text.clone()))),
            TaskOutcome::NoContent => Some(format::format(&Completion::NoContent)),
            TaskOutcome::Failed { .. } => None,
        }
    }

    /// Raw text as recorded in history: the answer, the no-content marker,
    /// or a labeled error string.
    pub fn raw_text(&self) -> String {
        match self {
            TaskOutcome::Answer { text } => text.clone(),
            TaskOutcome::NoContent => "[no response]".into(),
            TaskOutcome::Failed { message, .. } => format!("Error: {message}"),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }
}

impl From<Result<Completion, ProviderError>> for TaskOutcome {
    fn from(result: Result<Completion, ProviderError>) -> Self {
        match result {
            Ok(Completion::Content(text)) => TaskOutcome::Answer { text },
            Ok(Completion::NoContent) => TaskOutcome::NoContent,
            Err(e) => TaskOutcome::Failed {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }
}

/// One recorded run. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub mode: RunMode,
    pub case: String,
    pub results: BTreeMap<TaskId, TaskOutcome>,
}

impl HistoryEntry {
    pub fn new(mode: RunMode, case: impl Into<String>, results: BTreeMap<TaskId, TaskOutcome>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            mode,
            case: case.into(),
            results,
        }
    }
}

/// Append-only run log for a single session. No size cap.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries, most recent first.
    pub fn list(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(case: &str) -> HistoryEntry {
        let mut results = BTreeMap::new();
        results.insert(TaskId::Treatment, TaskOutcome::Answer { text: "ok".into() });
        HistoryEntry::new(RunMode::SingleTask, case, results)
    }

    #[test]
    fn list_is_most_recent_first() {
        let mut history = History::new();
        for i in 1..=5 {
            history.append(entry(&format!("case {i}")));
        }
        let cases: Vec<&str> = history.list().iter().map(|e| e.case.as_str()).collect();
        assert_eq!(cases, vec!["case 5", "case 4", "case 3", "case 2", "case 1"]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut history = History::new();
        history.append(entry("a"));
        history.append(entry("b"));
        history.clear();
        assert!(history.list().is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn outcome_from_provider_error_keeps_message() {
        let outcome: TaskOutcome = Err(ProviderError::Network("connection refused".into())).into();
        assert!(outcome.is_failed());
        assert!(outcome.formatted().is_none());
        assert!(outcome.raw_text().starts_with("Error: "));
        assert!(outcome.raw_text().contains("connection refused"));
    }

    #[test]
    fn no_content_outcome_is_not_empty_text() {
        let outcome: TaskOutcome = Ok(Completion::NoContent).into();
        assert_eq!(outcome, TaskOutcome::NoContent);
        assert!(!outcome.raw_text().is_empty());
    }

    #[test]
    fn entry_serializes_task_keys() {
        let json = serde_json::to_value(entry("chest pain")).unwrap();
        assert_eq!(json["mode"], "single_task");
        assert_eq!(json["results"]["treatment"]["status"], "answer");
        assert_eq!(json["results"]["treatment"]["text"], "ok");
    }
}
