//! Configuration validation
//!
//! Every configuration section is checked once at startup. A limit that can
//! never admit a request is rejected here rather than discovered as an endless
//! wait on the first call.

use super::models::*;
use crate::core::providers::GeminiConfig;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn validate_per_minute_limit(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", name));
    }
    if value <= 0.0 {
        return Err(format!(
            "{} must be greater than 0 (got {}); no request could ever be admitted",
            name, value
        ));
    }
    Ok(())
}

impl Validate for SchedulerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating scheduler configuration");

        validate_per_minute_limit("requests_per_minute", self.requests_per_minute)?;
        validate_per_minute_limit("input_tokens_per_minute", self.input_tokens_per_minute)?;
        validate_per_minute_limit("output_tokens_per_minute", self.output_tokens_per_minute)?;

        // A single request consumes one whole unit from the request bucket
        if self.requests_per_minute < 1.0 {
            return Err(format!(
                "requests_per_minute must be at least 1 (got {})",
                self.requests_per_minute
            ));
        }

        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }

        if self.output_estimate_cap == 0 {
            return Err("output_estimate_cap must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch configuration");

        if !self.target_cycle_seconds.is_finite() || self.target_cycle_seconds < 0.0 {
            return Err(format!(
                "target_cycle_seconds must be a non-negative number (got {})",
                self.target_cycle_seconds
            ));
        }

        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for GeminiConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gemini configuration");

        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(
                "API key is required (set GOOGLE_API_KEY or gemini.api_key)".to_string(),
            );
        }

        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "Base URL must use http:// or https:// scheme, got: {}",
                self.base_url
            ));
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.connect_timeout == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.connect_timeout > self.request_timeout {
            return Err("Connect timeout cannot be greater than request timeout".to_string());
        }

        Ok(())
    }
}
