//! Configuration management for the analyzer
//!
//! This module handles loading and validation of all analyzer configuration.
//! Values come from defaults, then an optional YAML file, then CLI overrides
//! applied by the binary. The library never reads the environment itself.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::providers::GeminiConfig;
use crate::utils::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote model connection
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Rate limits and retry budget
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Per-document pacing
    #[serde(default)]
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    ///
    /// The file is parsed but not validated: the API key usually arrives later
    /// from the command line or environment. Call [`AppConfig::validate`] once
    /// all overrides are applied.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AnalyzerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| AnalyzerError::Config(format!("Failed to parse config: {}", e)))?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gemini
            .validate()
            .map_err(|e| AnalyzerError::Config(format!("Gemini config error: {}", e)))?;

        self.scheduler
            .validate()
            .map_err(|e| AnalyzerError::Config(format!("Scheduler config error: {}", e)))?;

        self.batch
            .validate()
            .map_err(|e| AnalyzerError::Config(format!("Batch config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }
}
