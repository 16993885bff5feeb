use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::endpoints::{GenerateContentRequest, GenerateContentResponse};
use crate::config::GenerationSettings;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: StatusCode,
        error_body: String,
    },
    #[error("API response contained no generated text")]
    EmptyResponse,
    #[error("Blocking worker failed: {0}")]
    WorkerFailed(String),
}

impl ApiConnectionError {
    fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiConnectionError::Timeout(timeout)
        } else {
            ApiConnectionError::NetworkError(err)
        }
    }
}

fn extract_text(body: &str) -> Result<String, ApiConnectionError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)?;
    if let Some(reason) = envelope.abnormal_finish() {
        warn!(reason, "Model stopped before finishing its reply");
    }
    envelope
        .first_text()
        .map(str::to_string)
        .ok_or(ApiConnectionError::EmptyResponse)
}

/// Client for the `generateContent` endpoint of the generative-language API.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, settings: &GenerationSettings) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: settings.model_name.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Reads the API key from `api_key_env_var` (after loading `.env`).
    /// A missing or blank key is fatal: the provider cannot exist without it.
    pub fn from_env(
        api_key_env_var: &str,
        settings: &GenerationSettings,
    ) -> Result<Self, ApiConnectionError> {
        dotenv::dotenv().ok();
        let api_key = env::var(api_key_env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiConnectionError::MissingApiKey(api_key_env_var.to_string()))?;
        Ok(Self::new(api_key, settings))
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }

    /// Primary path: async POST with the key in a header, bounded by `timeout`.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
        timeout: Duration,
    ) -> Result<String, ApiConnectionError> {
        debug!(model = %self.model_name, "Sending async generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiConnectionError::from_transport(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiConnectionError::from_transport(e, timeout))?;

        if status != StatusCode::OK {
            error!("Gemini API error: {} - {}", status, body);
            return Err(ApiConnectionError::ApiError {
                status,
                error_body: body,
            });
        }
        extract_text(&body)
    }

    /// Secondary path: the same request through a blocking client, with the
    /// key as a query parameter. Must run off the async executor.
    pub fn generate_content_blocking(
        &self,
        request: &GenerateContentRequest,
        timeout: Duration,
    ) -> Result<String, ApiConnectionError> {
        debug!(model = %self.model_name, "Sending blocking generateContent request");
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiConnectionError::NetworkError)?;

        let response = client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .map_err(|e| ApiConnectionError::from_transport(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiConnectionError::from_transport(e, timeout))?;

        if status != StatusCode::OK {
            error!("Gemini API error (blocking): {} - {}", status, body);
            return Err(ApiConnectionError::ApiError {
                status,
                error_body: body,
            });
        }
        extract_text(&body)
    }
}
