//! Configuration loading, validation, and management for Quick MD Helper.
//!
//! Loads configuration from `~/.quickmd/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod templates;

pub use templates::{CaseTemplate, TemplateStore};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Providers that run locally and accept any API key.
const KEYLESS_PROVIDERS: [&str; 3] = ["ollama", "vllm", "llamacpp"];

/// The root configuration structure.
///
/// Maps directly to `~/.quickmd/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name; selects the default base URL
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Explicit base URL, overriding the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Reasoning effort for reasoning models; replaces temperature when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,

    /// Token ceiling for the primary attempt
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Token ceiling for the single retry after an empty answer
    #[serde(default = "default_retry_max_tokens")]
    pub retry_max_tokens: u32,

    /// HTTP client timeout for one completion call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path to the JSON case-template file
    #[serde(default = "default_templates_path")]
    pub templates_path: PathBuf,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "o3".into()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_max_tokens() -> u32 {
    400
}
fn default_retry_max_tokens() -> u32 {
    800
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_templates_path() -> PathBuf {
    PathBuf::from("common_cases.json")
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("reasoning_effort", &self.reasoning_effort)
            .field("max_tokens", &self.max_tokens)
            .field("retry_max_tokens", &self.retry_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("templates_path", &self.templates_path)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Maximum live sessions before the oldest is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Allowed CORS origin for the API
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_sessions() -> usize {
    1_000
}
fn default_cors_origin() -> String {
    "http://localhost:8501".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_sessions: default_max_sessions(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.quickmd/config.toml).
    ///
    /// Environment overrides:
    /// - `QUICKMD_API_KEY`, then `OPENAI_API_KEY` (only when no key is configured)
    /// - `QUICKMD_PROVIDER`
    /// - `QUICKMD_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("QUICKMD_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("QUICKMD_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("QUICKMD_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".quickmd")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError("max_tokens must be > 0".into()));
        }

        if self.retry_max_tokens < self.max_tokens {
            return Err(ConfigError::ValidationError(
                "retry_max_tokens must be >= max_tokens".into(),
            ));
        }

        if let Some(effort) = &self.reasoning_effort
            && !matches!(effort.as_str(), "low" | "medium" | "high")
        {
            return Err(ConfigError::ValidationError(format!(
                "reasoning_effort must be low, medium or high (got '{effort}')"
            )));
        }

        if self.gateway.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_sessions must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Whether the configured provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        !KEYLESS_PROVIDERS.contains(&self.provider.as_str())
    }

    /// The API key, or an error if the provider needs one and none is set.
    pub fn require_api_key(&self) -> Result<String, ConfigError> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => Ok(key.clone()),
            _ if !self.requires_api_key() => Ok(String::new()),
            _ => Err(ConfigError::MissingApiKey {
                provider: self.provider.clone(),
            }),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            temperature: default_temperature(),
            reasoning_effort: None,
            max_tokens: default_max_tokens(),
            retry_max_tokens: default_retry_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            templates_path: default_templates_path(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured for provider '{provider}' (set QUICKMD_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey { provider: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "o3");
        assert_eq!(config.max_tokens, 400);
        assert_eq!(config.gateway.port, 8501);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.retry_max_tokens, config.retry_max_tokens);
    }

    #[test]
    fn default_temperature_is_written_exactly() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("temperature = 0.3\n"));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn retry_budget_must_not_shrink() {
        let config = AppConfig {
            max_tokens: 500,
            retry_max_tokens: 300,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_reasoning_effort_rejected() {
        let config = AppConfig {
            reasoning_effort: Some("extreme".into()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "model = \"gpt-4o\"\nreasoning_effort = \"low\"\n[gateway]\nport = 9000\n",
        )
        .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.reasoning_effort.as_deref(), Some("low"));
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_tokens = \"many\"").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply_in_priority_order() {
        let vars: HashMap<&str, &str> = [
            ("QUICKMD_API_KEY", "sk-quick"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("QUICKMD_MODEL", "gpt-4o-mini"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-quick"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn configured_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|k| (k == "OPENAI_API_KEY").then(|| "sk-env".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn missing_key_is_fatal_for_hosted_providers() {
        let config = AppConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingApiKey { .. })
        ));

        let local = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert_eq!(local.require_api_key().unwrap(), "");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("o3"));
        assert!(toml_str.contains("8501"));
    }
}
