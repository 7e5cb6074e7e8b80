//! Completion client: one (system, user) call with a token ceiling.

use quickmd_config::AppConfig;
use quickmd_core::error::ProviderError;
use quickmd_core::message::Message;
use quickmd_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// Single-shot client around a [`Provider`].
///
/// Returns the response text, or `""` when the provider sent no content.
/// Failures are returned as-is; this client never retries.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    reasoning_effort: Option<String>,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            reasoning_effort: None,
        }
    }

    /// Build a client using the model settings from `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.model, config.temperature)
            .with_reasoning_effort(config.reasoning_effort.clone())
    }

    pub fn with_reasoning_effort(mut self, effort: Option<String>) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: self.temperature,
            max_tokens: Some(max_tokens),
            reasoning_effort: self.reasoning_effort.clone(),
        };

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                provider = %self.provider.name(),
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion finished"
            );
        }

        Ok(response.message.content)
    }
}
