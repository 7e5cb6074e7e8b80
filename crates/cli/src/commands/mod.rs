//! Subcommand implementations and the helpers they share.

pub mod ask;
pub mod chat;
pub mod onboard;
pub mod serve;
pub mod tasks;
pub mod templates;

use quickmd_config::{AppConfig, ConfigError};
use quickmd_core::history::HistoryEntry;
use quickmd_pipeline::{Pipeline, ReportStatus, TaskReport};

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build the pipeline, explaining how to set a key when one is missing.
pub(crate) fn build_pipeline(config: &AppConfig) -> Result<Pipeline, Box<dyn std::error::Error>> {
    match quickmd_providers::router::build_from_config(config) {
        Ok(provider) => Ok(Pipeline::from_config(provider, config)),
        Err(ConfigError::MissingApiKey { provider }) => {
            eprintln!();
            eprintln!("  ERROR: No API key configured for provider '{provider}'!");
            eprintln!();
            eprintln!("  Set one of these environment variables:");
            eprintln!("    QUICKMD_API_KEY=sk-...");
            eprintln!("    OPENAI_API_KEY=sk-...");
            eprintln!();
            eprintln!("  Or add it to your config file:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            Err("No API key found. See above for setup instructions.".into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print every task result of `entry`.
pub(crate) fn print_entry(entry: &HistoryEntry) {
    for report in TaskReport::from_entry(entry) {
        println!("  ── {} ──", report.label);
        for line in report.text.lines() {
            println!("  {line}");
        }
        if report.status == ReportStatus::Ok {
            println!("  Guideline match: {}", report.guideline_tag);
        }
        println!();
    }
}
