use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_RICH_CONVERTER: &str = "docling";

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent key selects the offline generation backend.
    pub anthropic_api_key: Option<String>,
    pub generation_timeout: Duration,
    pub rich_converter_command: String,
    /// Deadline after which a running converter is killed.
    pub rich_converter_timeout: Duration,
    pub use_rich_converter: bool,
    pub enhanced_extraction: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = secs_var(&lookup, "GENERATION_TIMEOUT_SECS", 30)?;
        let converter_timeout_secs = secs_var(&lookup, "RICH_CONVERTER_TIMEOUT_SECS", 120)?;

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|key| !key.trim().is_empty()),
            generation_timeout: Duration::from_secs(timeout_secs),
            rich_converter_command: lookup("RICH_CONVERTER_COMMAND")
                .filter(|cmd| !cmd.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RICH_CONVERTER.to_string()),
            rich_converter_timeout: Duration::from_secs(converter_timeout_secs),
            use_rich_converter: bool_var(&lookup, "USE_RICH_CONVERTER", true)?,
            enhanced_extraction: bool_var(&lookup, "ENHANCED_EXTRACTION", false)?,
        })
    }
}

fn secs_var<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
    }
}

fn bool_var<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => parse_bool(&raw).with_context(|| format!("{key} must be true or false, got '{raw}'")),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
