use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SEARXNG_URL: &str = "http://localhost:8080/search";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173,http://127.0.0.1:5173";

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub searxng_url: String,
    pub allowed_origins: Vec<String>,
    pub search_timeout: Duration,
    pub completion_timeout: Duration,
    /// How many results at most go into the grounding context.
    pub context_cap: usize,
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    /// A missing `OPENAI_API_KEY` is fatal.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Used by `from_env` and by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = get_env(&lookup, "OPENAI_API_KEY")?;

        let allowed_origins = get_env_or_default(&lookup, "ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            openai_api_key,
            openai_base_url: get_env_or_default(&lookup, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            completion_model: get_env_or_default(
                &lookup,
                "COMPLETION_MODEL",
                DEFAULT_COMPLETION_MODEL,
            ),
            searxng_url: get_env_or_default(&lookup, "SEARXNG_URL", DEFAULT_SEARXNG_URL),
            allowed_origins,
            search_timeout: Duration::from_secs(get_parsed(&lookup, "SEARCH_TIMEOUT_SECS", 10)?),
            completion_timeout: Duration::from_secs(get_parsed(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                30,
            )?),
            context_cap: get_positive(&lookup, "CONTEXT_CAP", 5)?,
        })
    }
}

fn get_env<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw })
        }
        _ => Ok(default),
    }
}

/// Like `get_parsed`, but zero is rejected.
fn get_positive<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get_parsed(lookup, key, default)? {
        0 => Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        }),
        n => Ok(n),
    }
}
