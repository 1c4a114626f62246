//! Gemini Client
//!
//! Thin REST client for Google AI Studio's `generateContent` and
//! `countTokens` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::GenerativeModel;

use super::config::GeminiConfig;
use super::error::{
    GeminiErrorMapper, PROVIDER, gemini_config_error, gemini_network_error, gemini_parse_error,
};
use super::models::{CountTokensResponse, GenerateContentRequest, GenerateContentResponse, Generation};

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    /// Create a client; fails when no API key is configured
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(gemini_config_error("API key is required for Google AI Studio"));
        }

        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| gemini_network_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn post<B, T>(&self, operation: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.get_endpoint(operation);
        debug!(operation, model = %self.config.model, "Sending Gemini request");

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.config.api_key.as_deref().unwrap_or_default())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(PROVIDER, format!("Request timeout: {}", e))
                } else {
                    gemini_network_error(format!("Network error: {}", e))
                }
            })?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| gemini_network_error(format!("Failed to read response: {}", e)))?;

        debug!(status = status.as_u16(), bytes = response_text.len(), "Gemini response received");

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let json: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| gemini_parse_error(format!("Failed to parse response JSON: {}", e)))?;

        if json.get("error").is_some() {
            return Err(GeminiErrorMapper::from_api_response(&json));
        }

        serde_json::from_value(json)
            .map_err(|e| gemini_parse_error(format!("Unexpected response shape: {}", e)))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn model_name(&self) -> String {
        self.config.model.clone()
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError> {
        let body = GenerateContentRequest::user_text(prompt);
        let response: GenerateContentResponse = self.post("generateContent", &body).await?;

        let Some(text) = response.first_candidate_text() else {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| {
                    response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.clone())
                })
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(ProviderError::invalid_request(
                PROVIDER,
                format!("Response contained no text: {}", reason),
            ));
        };

        Ok(Generation {
            text,
            usage: response.usage_metadata,
        })
    }

    async fn count_tokens(&self, text: &str) -> Result<u32, ProviderError> {
        let body = GenerateContentRequest::user_text(text);
        let response: CountTokensResponse = self.post("countTokens", &body).await?;
        Ok(response.total_tokens)
    }
}
