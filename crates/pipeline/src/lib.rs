//! The request pipeline: the heart of Quick MD Helper.
//!
//! Every run follows the same steps per task:
//!
//! 1. **Validate** the case text (trimmed, non-empty)
//! 2. **Build** the task's system instruction
//! 3. **Complete** via the configured provider at the primary token ceiling
//! 4. **Retry** once at the enlarged ceiling if the answer is empty
//! 5. **Record** the outcome (answer, no-content marker, or error) and
//!    format it for display
//!
//! An all-tasks run executes the three task pipelines concurrently; a
//! failure in one never affects the others.

pub mod report;
pub mod runner;

pub use report::{ReportStatus, TaskReport};
pub use runner::{Pipeline, Selection};
