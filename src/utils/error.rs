//! Error handling for the analyzer
//!
//! This module defines the crate-level error type. Errors from the remote model
//! live in [`ProviderError`]; everything that can go wrong around it (loading
//! configuration, reading documents, writing reports) is an [`AnalyzerError`].

use crate::core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for the analyzer
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Main error type for the analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Configuration errors, including limits that can never admit a request
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Remote model errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A request that no amount of waiting can admit
    #[error("Admission impossible: {0}")]
    Admission(String),

    /// The startup API check did not get an answer from the model
    #[error("Preflight API check failed: {0}")]
    Preflight(String),

    /// Bad user input (unknown document index, missing path)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalyzerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an admission error
    pub fn admission(message: impl Into<String>) -> Self {
        Self::Admission(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
