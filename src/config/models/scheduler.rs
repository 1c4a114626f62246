//! Request scheduler configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Rate limits and retry budget for the request scheduler
///
/// All limits are expressed per minute; each one becomes a token bucket whose
/// capacity is the limit and whose fill rate is `limit / 60` per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Requests per minute
    #[serde(default = "default_rpm")]
    pub requests_per_minute: f64,
    /// Input (prompt) tokens per minute
    #[serde(default = "default_input_tpm")]
    pub input_tokens_per_minute: f64,
    /// Output (candidate) tokens per minute
    #[serde(default = "default_output_tpm")]
    pub output_tokens_per_minute: f64,
    /// Total attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Ceiling on the pre-flight output token estimate
    #[serde(default = "default_output_estimate_cap")]
    pub output_estimate_cap: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_rpm(),
            input_tokens_per_minute: default_input_tpm(),
            output_tokens_per_minute: default_output_tpm(),
            max_retries: default_max_retries(),
            output_estimate_cap: default_output_estimate_cap(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_requests_per_minute(mut self, rpm: f64) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    pub fn with_input_tokens_per_minute(mut self, tpm: f64) -> Self {
        self.input_tokens_per_minute = tpm;
        self
    }

    pub fn with_output_tokens_per_minute(mut self, tpm: f64) -> Self {
        self.output_tokens_per_minute = tpm;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
