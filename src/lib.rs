//! # RFI Analyzer
//!
//! Batch analysis of public-comment documents with a generative model, behind
//! a scheduler that honors requests-per-minute and tokens-per-minute limits.
//!
//! ## Features
//!
//! - **Multi-limiter admission**: request, input-token and output-token buckets
//!   must all allow a call before it is made
//! - **Retry with backoff**: rate-limit and server errors are retried, anything
//!   else fails fast
//! - **Never throws**: every document yields a complete analysis record, with
//!   sentinel values on failure
//! - **Usage accounting**: requests, tokens and errors for the whole run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rfi_analyzer::{AnalysisPrompt, GeminiClient, GeminiConfig, RequestExecutor, SchedulerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new(GeminiConfig::new_google_ai("your-api-key"))?;
//!     let executor = RequestExecutor::new(Arc::new(client), &SchedulerConfig::default())?;
//!
//!     let prompt = AnalysisPrompt::render("response-001.md", "We recommend ...", 80_000);
//!     let analysis = executor.execute(&prompt).await;
//!     println!("{}", serde_json::to_string_pretty(&analysis)?);
//!
//!     println!("{:?}", executor.usage_summary());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{AppConfig, BatchConfig, SchedulerConfig};
pub use utils::error::{AnalyzerError, Result};

pub use core::analysis::{AnalysisPrompt, FailureKind, SubmissionAnalysis, decode_analysis};
pub use core::batch::{BatchRunner, BatchSummary, DocumentResult};
pub use core::providers::{GeminiClient, GeminiConfig, Generation, ProviderError, UsageMetadata};
pub use core::rate_limiter::{MultiLimiterGate, TokenBucket};
pub use core::scheduler::{ErrorClass, ExecutionOutcome, RequestExecutor, UsageSummary};
pub use core::traits::GenerativeModel;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build information for this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
