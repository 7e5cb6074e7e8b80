//! Retry policy: one extra attempt, with a larger token ceiling, when the
//! primary call comes back empty.
//!
//! Provider failures are not retried here: they propagate to the caller on
//! either attempt. At most two calls are made per run.

use quickmd_config::AppConfig;
use quickmd_core::error::ProviderError;
use quickmd_core::format::Completion;
use tracing::{info, warn};

use crate::completion::CompletionClient;

/// Token ceilings for the primary and retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub primary_max_tokens: u32,
    pub retry_max_tokens: u32,
}

impl RetryPolicy {
    pub fn new(primary_max_tokens: u32, retry_max_tokens: u32) -> Self {
        Self {
            primary_max_tokens,
            retry_max_tokens,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_tokens, config.retry_max_tokens)
    }

    /// Run the prompt pair through `client`.
    ///
    /// Returns [`Completion::NoContent`] only after both attempts returned
    /// blank text; never an empty `Content`.
    pub async fn run(
        &self,
        client: &CompletionClient,
        system: &str,
        user: &str,
    ) -> Result<Completion, ProviderError> {
        let primary = client.complete(system, user, self.primary_max_tokens).await?;
        if !primary.trim().is_empty() {
            return Ok(Completion::Content(primary));
        }

        info!(
            provider = %client.provider_name(),
            attempt = 2,
            max_tokens = self.retry_max_tokens,
            "Empty completion, retrying with larger token budget"
        );

        let retry = client.complete(system, user, self.retry_max_tokens).await?;
        if !retry.trim().is_empty() {
            return Ok(Completion::Content(retry));
        }

        warn!(
            provider = %client.provider_name(),
            "Completion empty after retry"
        );
        Ok(Completion::NoContent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(400, 800)
    }
}
