//! Completion endpoint plumbing for Quick MD Helper.
//!
//! - [`openai_compat`]: HTTP provider for OpenAI-compatible endpoints
//! - [`router`]: builds the configured provider
//! - [`completion`]: single-shot (system, user, max_tokens) client
//! - [`retry`]: empty-answer retry policy

pub mod completion;
pub mod openai_compat;
pub mod retry;
pub mod router;

pub use completion::CompletionClient;
pub use openai_compat::OpenAiCompatProvider;
pub use retry::RetryPolicy;
