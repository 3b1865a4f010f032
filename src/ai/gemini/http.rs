use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result};
use reqwest::{Client, Response};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const STREAM_TIMEOUT: Duration = Duration::from_secs(300);

/// Lightweight Gemini REST transport shared by every model handle of a client.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn post(
        &self,
        url: String,
        request: &GenerateContentRequest,
        timeout: Duration,
    ) -> Result<Response> {
        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    /// Calls Gemini's `generateContent` endpoint.
    ///
    /// `model` is the bare model ID, without the `models/` prefix.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!("Sending generateContent request to Gemini (model: {})", model);

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let response = self.post(url, request, REQUEST_TIMEOUT).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Calls Gemini's `streamGenerateContent` endpoint in server-sent-event mode and
    /// hands back the open response for incremental decoding.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Response> {
        tracing::debug!(
            "Sending streamGenerateContent request to Gemini (model: {})",
            model
        );

        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        );
        self.post(url, request, STREAM_TIMEOUT).await
    }
}
