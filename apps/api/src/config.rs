use anyhow::{ensure, Context, Result};

use crate::llm_client::prompts::SUPPORTED_LANGUAGES;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the in-process store is used (local development, demos).
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Output language for tailored content when a request does not name one.
    pub default_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_language: default_language(optional_env("DEFAULT_LANGUAGE"))
                .context("DEFAULT_LANGUAGE must be one of en, es, zh, ja")?,
        })
    }
}

fn default_language(value: Option<String>) -> Result<String> {
    let code = value.unwrap_or_else(|| "en".to_string()).to_ascii_lowercase();
    ensure!(
        SUPPORTED_LANGUAGES.contains(&code.as_str()),
        "unsupported language code '{code}'"
    );
    Ok(code)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
