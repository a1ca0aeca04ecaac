//! HTTP transport for the Gemini generative language API.

use super::client::{
    GenerateRequest, ImagePredictRequest, ImagePredictResponse, ModelResponse, ModelTransport,
};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Talks to `{base_url}/models/{model}:{method}` with the key in the
/// `x-goog-api-key` header.
pub struct GeminiTransport {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiTransport {
    /// A missing key is only logged here; each call then fails with
    /// [`AppError::Auth`].
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("No Gemini API key configured; every model call will fail");
        }
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Auth("Gemini API key is not set".to_string()))?;

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;
        debug!(url, bytes = text.len(), "Model response received");

        serde_json::from_str(&text)
            .map_err(|e| AppError::LLM(format!("Unexpected response shape: {}", e)))
    }
}

fn map_send_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(format!("HTTP request timed out: {}", err))
    } else {
        AppError::Network(format!("HTTP request failed: {}", err))
    }
}

/// Builds an [`AppError::Api`] from a non-2xx reply, preferring the
/// structured `{"error": {...}}` message when present.
fn api_error(status: u16, body: &str) -> AppError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{}: {}", code, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => "empty error body".to_string(),
        Err(_) => body.trim().to_string(),
    };
    AppError::Api { status, message }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate_content(&self, request: &GenerateRequest) -> Result<ModelResponse> {
        let url = self.endpoint(&request.model, "generateContent");
        self.post(&url, request).await
    }

    async fn predict_images(
        &self,
        request: &ImagePredictRequest,
    ) -> Result<ImagePredictResponse> {
        let url = self.endpoint(&request.model, "predict");
        self.post(&url, request).await
    }
}
