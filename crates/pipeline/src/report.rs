//! Render-ready view of a task outcome.

use serde::Serialize;

use quickmd_core::format::{FormattedBody, GuidelineTag};
use quickmd_core::history::{HistoryEntry, TaskOutcome};
use quickmd_core::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Ok,
    NoContent,
    Error,
}

/// One task's result as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task: TaskId,
    pub label: &'static str,
    pub status: ReportStatus,
    /// Bulleted answer, "no response" text, or the error message.
    pub text: String,
    pub guideline_tag: GuidelineTag,
    /// Unformatted text as recorded in history.
    pub raw: String,
}

impl TaskReport {
    pub fn new(task: TaskId, outcome: &TaskOutcome) -> Self {
        let raw = outcome.raw_text();
        let (status, text, guideline_tag) = match outcome.formatted() {
            Some(formatted) => {
                let status = match formatted.body {
                    FormattedBody::Bullets(_) => ReportStatus::Ok,
                    FormattedBody::NoResponse => ReportStatus::NoContent,
                };
                (status, formatted.display_text().to_string(), formatted.guideline_tag)
            }
            None => (ReportStatus::Error, raw.clone(), GuidelineTag::None),
        };

        Self {
            task,
            label: task.task().label,
            status,
            text,
            guideline_tag,
            raw,
        }
    }

    /// Reports for every task in `entry`, in task order.
    pub fn from_entry(entry: &HistoryEntry) -> Vec<Self> {
        entry
            .results
            .iter()
            .map(|(task, outcome)| Self::new(*task, outcome))
            .collect()
    }
}
