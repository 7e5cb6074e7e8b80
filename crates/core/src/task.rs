//! The fixed set of clinical query types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Identifier of one of the three supported tasks.
///
/// Ordering follows declaration order, which is also display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    Treatment,
    ConfirmatoryTest,
    Differential,
}

impl TaskId {
    /// All tasks, in display order.
    pub const ALL: [TaskId; 3] = [
        TaskId::Treatment,
        TaskId::ConfirmatoryTest,
        TaskId::Differential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::Treatment => "treatment",
            TaskId::ConfirmatoryTest => "confirmatory_test",
            TaskId::Differential => "differential",
        }
    }

    /// The registered task definition for this id.
    pub fn task(&self) -> &'static Task {
        match self {
            TaskId::Treatment => &TASKS[0],
            TaskId::ConfirmatoryTest => &TASKS[1],
            TaskId::Differential => &TASKS[2],
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskId {
    type Err = Error;

    /// Accepts the snake_case id or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TaskId::ALL
            .into_iter()
            .find(|id| {
                id.as_str().eq_ignore_ascii_case(needle)
                    || id.task().label.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::UnknownTask(needle.to_string()))
    }
}

/// A task definition: display label plus the instruction fragment that is
/// substituted into the system prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub label: &'static str,
    pub instruction: &'static str,
}

static TASKS: [Task; 3] = [
    Task {
        id: TaskId::Treatment,
        label: "Treatment",
        instruction: "Summarise first-line therapy including dose, route, frequency, and duration.",
    },
    Task {
        id: TaskId::ConfirmatoryTest,
        label: "Confirmatory test",
        instruction: "State single best confirmatory test with one-line rationale for selection.",
    },
    Task {
        id: TaskId::Differential,
        label: "Differential & next steps",
        instruction: "List top 5 differential diagnoses then specify best next management step.",
    },
];

impl Task {
    /// All registered tasks, in display order.
    pub fn all() -> &'static [Task] {
        &TASKS
    }
}
