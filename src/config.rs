//! Configuration management for tool_rounds.
//!
//! Configuration is read from environment variables:
//! - `ANTHROPIC_API_KEY` - Required. API key for the Messages API.
//! - `ANTHROPIC_MODEL` - Optional. Model identifier. Defaults to `claude-sonnet-4-5`.
//! - `ANTHROPIC_BASE_URL` - Optional. API base URL. Defaults to `https://api.anthropic.com`.
//! - `MAX_TOOL_ROUNDS` - Optional. Tool rounds before the forced synthesis call. Defaults to `2`.
//! - `MAX_TOKENS` - Optional. Output-length ceiling per model call. Defaults to `800`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Per-request HTTP timeout. Defaults to `300`.
//! - `SYSTEM_PROMPT` - Optional. Replaces the built-in base instructions.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::agent::DEFAULT_MAX_ROUNDS;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Messages API key
    pub api_key: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Messages API base URL
    pub base_url: url::Url,

    /// Tool rounds allowed before the tool-free synthesis call
    pub max_tool_rounds: usize,

    /// Output-length ceiling for each model call
    pub max_tokens: u32,

    /// HTTP timeout applied to each backend request
    pub request_timeout: Duration,

    /// Replacement for the built-in base instructions
    pub system_prompt: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `ANTHROPIC_API_KEY` is not set,
    /// and `ConfigError::InvalidValue` for unparsable optional values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;

        let model = lookup("ANTHROPIC_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url_raw =
            lookup("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = url::Url::parse(&base_url_raw).map_err(|e| {
            ConfigError::InvalidValue("ANTHROPIC_BASE_URL".to_string(), format!("{}", e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue(
                "ANTHROPIC_BASE_URL".to_string(),
                format!("unsupported scheme: {}", base_url.scheme()),
            ));
        }

        let max_tool_rounds = parse_or(&lookup, "MAX_TOOL_ROUNDS", DEFAULT_MAX_ROUNDS)?;

        let max_tokens: u32 = parse_or(&lookup, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_TOKENS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let request_timeout = Duration::from_secs(parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let system_prompt = lookup("SYSTEM_PROMPT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key,
            model,
            base_url,
            max_tool_rounds,
            max_tokens,
            request_timeout,
            system_prompt,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
