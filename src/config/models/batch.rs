//! Batch driver configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-document pacing and prompt settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Minimum wall time per document; shorter round trips sleep the remainder
    #[serde(default = "default_target_cycle_seconds")]
    pub target_cycle_seconds: f64,
    /// Document characters included in the prompt
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    /// Where identified document sections are appended, if anywhere
    #[serde(default)]
    pub sections_log_file: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            target_cycle_seconds: default_target_cycle_seconds(),
            max_text_length: default_max_text_length(),
            sections_log_file: None,
        }
    }
}
