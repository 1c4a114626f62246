//! Gemini Error Handling
//!
//! Maps HTTP statuses and Google API error bodies onto [`ProviderError`].

use crate::core::providers::unified_provider::ProviderError;
use serde_json::Value;

pub(crate) const PROVIDER: &str = "gemini";

/// Error mapper for the Generative Language API
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Map a non-success HTTP status and its body
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        // A structured error body is more precise than the bare status
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if json.get("error").is_some() {
                return Self::from_api_response(&json);
            }
        }

        match status {
            400 => ProviderError::invalid_request(PROVIDER, format!("Bad request: {}", body)),
            401 => ProviderError::authentication(PROVIDER, "Invalid or missing API key"),
            403 => ProviderError::authentication(PROVIDER, "Forbidden: insufficient permissions"),
            404 => ProviderError::model_not_found(PROVIDER, "Model or endpoint not found"),
            429 => ProviderError::rate_limit(PROVIDER, Self::extract_retry_after(body)),
            503 => ProviderError::provider_unavailable(PROVIDER, format!("Service unavailable: {}", body)),
            500..=599 => ProviderError::api_error(PROVIDER, status, format!("Server error: {}", body)),
            _ => ProviderError::api_error(PROVIDER, status, body),
        }
    }

    /// Map a Google API error body (`{"error": {"code", "message", "status"}}`)
    pub fn from_api_response(response: &Value) -> ProviderError {
        let Some(error) = response.get("error") else {
            return ProviderError::api_error(PROVIDER, 500, "Unknown API error");
        };

        let code = error
            .get("code")
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(500);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        let status = error.get("status").and_then(|s| s.as_str()).unwrap_or("");

        match (code, status) {
            (429, _) | (_, "RESOURCE_EXHAUSTED") => ProviderError::rate_limit_with_message(
                PROVIDER,
                message,
                Self::extract_retry_after_from_error(error),
            ),
            (401, _) | (_, "UNAUTHENTICATED") => ProviderError::authentication(PROVIDER, message),
            (403, _) | (_, "PERMISSION_DENIED") => ProviderError::authentication(PROVIDER, message),
            (404, _) | (_, "NOT_FOUND") => ProviderError::model_not_found(PROVIDER, message),
            (400, _) | (_, "INVALID_ARGUMENT") | (_, "FAILED_PRECONDITION") => {
                ProviderError::invalid_request(PROVIDER, message)
            }
            (503, _) | (_, "UNAVAILABLE") => ProviderError::provider_unavailable(PROVIDER, message),
            (_, "INTERNAL") => ProviderError::api_error(PROVIDER, 500, message),
            _ => ProviderError::api_error(PROVIDER, code, message),
        }
    }

    fn extract_retry_after(body: &str) -> Option<u64> {
        let json = serde_json::from_str::<Value>(body).ok()?;
        json.get("retry_after").and_then(|r| r.as_u64())
    }

    fn extract_retry_after_from_error(error: &Value) -> Option<u64> {
        if let Some(retry_after) = error.get("retry_after").and_then(|r| r.as_u64()) {
            return Some(retry_after);
        }

        // google.rpc.RetryInfo carries the delay as a string like "17s"
        error
            .get("details")
            .and_then(|d| d.as_array())?
            .iter()
            .find_map(|detail| {
                detail
                    .get("retry_after")
                    .and_then(|r| r.as_u64())
                    .or_else(|| {
                        detail
                            .get("retryDelay")
                            .and_then(|r| r.as_str())
                            .and_then(|s| s.trim_end_matches('s').parse::<f64>().ok())
                            .map(|secs| secs.ceil() as u64)
                    })
            })
    }
}

pub fn gemini_network_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::network(PROVIDER, msg.into())
}

pub fn gemini_parse_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::response_parsing(PROVIDER, msg.into())
}

pub fn gemini_config_error(msg: impl Into<String>) -> ProviderError {
    ProviderError::configuration(PROVIDER, msg.into())
}
