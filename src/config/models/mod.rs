//! Configuration data models
//!
//! This module defines all configuration structures used by the analyzer.

pub mod batch;
pub mod scheduler;

pub use batch::*;
pub use scheduler::*;

/// Default requests per minute
pub fn default_rpm() -> f64 {
    15.0
}

/// Default input tokens per minute
pub fn default_input_tpm() -> f64 {
    1_000_000.0
}

/// Default output tokens per minute
pub fn default_output_tpm() -> f64 {
    32_000.0
}

/// Default maximum attempts per request
pub fn default_max_retries() -> u32 {
    3
}

/// Default ceiling on the pre-flight output token estimate
pub fn default_output_estimate_cap() -> u32 {
    2048
}

/// Default minimum seconds per document
pub fn default_target_cycle_seconds() -> f64 {
    5.0
}

/// Default number of document characters sent to the model
pub fn default_max_text_length() -> usize {
    80_000
}
