use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{BackoffSchedule, RetryPolicy};
use crate::screening::batch::BatchOptions;

/// Application configuration loaded from environment variables.
/// Start-up fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_max_attempts: u32,
    pub llm_backoff_base_ms: u64,
    pub llm_backoff_max_ms: u64,
    pub shortlist_size: usize,
    pub batch_concurrency: usize,
    pub reorganize_sections: bool,
    pub max_upload_mb: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_max_attempts: env_or("LLM_MAX_ATTEMPTS", 10)?,
            llm_backoff_base_ms: env_or("LLM_BACKOFF_BASE_MS", 2_000)?,
            llm_backoff_max_ms: env_or("LLM_BACKOFF_MAX_MS", 10_000)?,
            shortlist_size: env_or("SHORTLIST_SIZE", 3)?,
            batch_concurrency: env_or("BATCH_CONCURRENCY", 4)?,
            reorganize_sections: env_or("REORGANIZE_SECTIONS", true)?,
            max_upload_mb: env_or("MAX_UPLOAD_MB", 25)?,
        };

        anyhow::ensure!(config.llm_max_attempts >= 1, "LLM_MAX_ATTEMPTS must be at least 1");
        anyhow::ensure!(config.batch_concurrency >= 1, "BATCH_CONCURRENCY must be at least 1");
        anyhow::ensure!(
            config.llm_backoff_base_ms <= config.llm_backoff_max_ms,
            "LLM_BACKOFF_BASE_MS must not exceed LLM_BACKOFF_MAX_MS"
        );

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.llm_max_attempts,
            BackoffSchedule {
                base: Duration::from_millis(self.llm_backoff_base_ms),
                max: Duration::from_millis(self.llm_backoff_max_ms),
            },
        )
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            shortlist_size: self.shortlist_size,
            concurrency: self.batch_concurrency,
            reorganize_sections: self.reorganize_sections,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
