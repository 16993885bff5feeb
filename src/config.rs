use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::api_connection::endpoints::{find_model, GEMINI_MODELS};

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// Sampling parameters forwarded to the model as `generationConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model_name: String,
    pub base_url: String,
    /// Total budget for the primary (async) model call.
    pub request_timeout: Duration,
    /// Budget for the secondary (blocking) call.
    pub fallback_timeout: Duration,
    pub max_concurrent_calls: usize,
    pub fallback_workers: usize,
    pub sampling: SamplingConfig,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            fallback_timeout: Duration::from_secs(60),
            max_concurrent_calls: 3,
            fallback_workers: 5,
            sampling: SamplingConfig::default(),
        }
    }
}

fn positive_from_env<T: std::str::FromStr + PartialOrd + Default>(
    name: &str,
) -> Result<Option<T>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(Some(value)),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
            reason: "expected a positive integer".to_string(),
        }),
    }
}

fn known_model(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim();
    match find_model(name) {
        Some(model) => Ok(model.model_name.to_string()),
        None => Err(ConfigError::InvalidValue {
            name: "GEMINI_MODEL".to_string(),
            value: raw.to_string(),
            reason: format!(
                "expected one of: {}",
                GEMINI_MODELS
                    .iter()
                    .map(|m| m.model_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
    }
}

impl GenerationSettings {
    /// Defaults overridden by `GEMINI_MODEL`, `GEMINI_BASE_URL`,
    /// `RECIPE_REQUEST_TIMEOUT_SECS`, `RECIPE_FALLBACK_TIMEOUT_SECS`,
    /// `RECIPE_MAX_CONCURRENT_CALLS` and `RECIPE_FALLBACK_WORKERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut settings = Self::default();

        if let Ok(model) = env::var("GEMINI_MODEL") {
            settings.model_name = known_model(&model)?;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            settings.base_url = base_url;
        }
        if let Some(secs) = positive_from_env::<u64>("RECIPE_REQUEST_TIMEOUT_SECS")? {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = positive_from_env::<u64>("RECIPE_FALLBACK_TIMEOUT_SECS")? {
            settings.fallback_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = positive_from_env::<usize>("RECIPE_MAX_CONCURRENT_CALLS")? {
            settings.max_concurrent_calls = n;
        }
        if let Some(n) = positive_from_env::<usize>("RECIPE_FALLBACK_WORKERS")? {
            settings.fallback_workers = n;
        }

        Ok(settings)
    }
}
