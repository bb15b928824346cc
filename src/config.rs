use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::pipeline::retry::{RetryPolicy, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS};

/// Default per-call timeout for the generation service, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Gemini model name (GEMINI_MODEL, default gemini-2.0-flash).
    pub gemini_model: String,
    /// Base URL of the Gemini REST API (GEMINI_API_URL).
    pub gemini_api_url: String,
    /// Attempts per topic, including the first (TAILFINDER_MAX_ATTEMPTS).
    pub max_attempts: u32,
    /// Base backoff between attempts (TAILFINDER_BACKOFF_MS).
    pub backoff_unit: Duration,
    /// Upper bound on a single generation call (TAILFINDER_REQUEST_TIMEOUT_SECS).
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API key, which is only checked
    /// when a command actually needs to call the model.
    pub fn load() -> Result<Self> {
        let max_attempts = parse_var("TAILFINDER_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let backoff_ms = parse_var(
            "TAILFINDER_BACKOFF_MS",
            DEFAULT_BACKOFF_UNIT.as_millis() as u64,
        )?;
        let timeout_secs = parse_var(
            "TAILFINDER_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            max_attempts,
            backoff_unit: Duration::from_millis(backoff_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Check that the Gemini API key is configured.
    /// Call this before any operation that generates keywords.
    pub fn require_gemini(&self) -> Result<()> {
        if self.gemini_api_key.is_empty() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_unit: self.backoff_unit,
        }
    }
}

/// Read and parse an optional numeric env var, falling back to `default`
/// when unset. A value that is set but unparseable is an error.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
