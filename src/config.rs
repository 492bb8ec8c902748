//! Application configuration parsed from environment variables.
//!
//! LLM provider settings live in [`crate::llm::config`]; this module covers
//! the HTTP listener, history storage and the generation pipeline knobs.

use std::path::PathBuf;
use std::time::Duration;

use crate::services::generate::{GenerateOptions, RetryPolicy};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HISTORY_PATH: &str = "data/history.json";
pub const DEFAULT_HISTORY_FLUSH_INTERVAL_MS: u64 = 500;
pub const DEFAULT_GENERATE_DEADLINE_SECS: u64 = 55;
pub const DEFAULT_GENERATE_RETRIES: u32 = 2;
pub const DEFAULT_GENERATE_RETRY_BACKOFF_MS: u64 = 2000;
pub const DEFAULT_GENERATE_MAX_TOKENS: u32 = 2500;
pub const DEFAULT_GENERATE_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub history_path: PathBuf,
    pub history_flush_interval: Duration,
    pub generate: GenerateOptions,
}

impl AppConfig {
    /// Build typed app config from environment variables.
    ///
    /// All keys are optional:
    /// - `PORT`: default 3000
    /// - `HISTORY_PATH`: default `data/history.json`
    /// - `HISTORY_FLUSH_INTERVAL_MS`: default 500
    /// - `GENERATE_DEADLINE_SECS`: default 55
    /// - `GENERATE_RETRIES`: default 2
    /// - `GENERATE_RETRY_BACKOFF_MS`: default 2000
    /// - `GENERATE_MAX_TOKENS`: default 2500
    /// - `GENERATE_TEMPERATURE`: default 0.7
    #[must_use]
    pub fn from_env() -> Self {
        let history_path = std::env::var("HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_PATH));

        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            history_path,
            history_flush_interval: Duration::from_millis(env_parse(
                "HISTORY_FLUSH_INTERVAL_MS",
                DEFAULT_HISTORY_FLUSH_INTERVAL_MS,
            )),
            generate: GenerateOptions {
                max_tokens: env_parse("GENERATE_MAX_TOKENS", DEFAULT_GENERATE_MAX_TOKENS),
                temperature: env_parse("GENERATE_TEMPERATURE", DEFAULT_GENERATE_TEMPERATURE),
                retry: RetryPolicy {
                    retries: env_parse("GENERATE_RETRIES", DEFAULT_GENERATE_RETRIES),
                    backoff: Duration::from_millis(env_parse(
                        "GENERATE_RETRY_BACKOFF_MS",
                        DEFAULT_GENERATE_RETRY_BACKOFF_MS,
                    )),
                },
                deadline: Duration::from_secs(env_parse("GENERATE_DEADLINE_SECS", DEFAULT_GENERATE_DEADLINE_SECS)),
            },
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
