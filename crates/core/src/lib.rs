//! # Quick MD Helper Core
//!
//! Domain types, traits, and error definitions for the Quick MD Helper
//! clinical decision-support front-end. This crate has **no HTTP or
//! runtime dependencies**: it defines the task set, the prompt builder,
//! the response formatter and the session history that the other crates
//! build on.
//!
//! ## Design Philosophy
//!
//! The remote model is a trait ([`Provider`]) defined here. Implementations
//! live in `quickmd-providers`, which keeps the pipeline testable with
//! scripted providers.

pub mod case;
pub mod error;
pub mod format;
pub mod history;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod task;

// Re-export key types at crate root for ergonomics
pub use case::Case;
pub use error::{Error, ProviderError, Result};
pub use format::{Completion, FormattedBody, FormattedResult, GuidelineTag};
pub use history::{History, HistoryEntry, RunMode, TaskOutcome};
pub use message::{Message, Role};
pub use prompt::build_prompt;
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Session, SessionId};
pub use task::{Task, TaskId};
