//! Remote model providers

pub mod gemini;
pub mod unified_provider;

pub use gemini::{GeminiClient, GeminiConfig, Generation, UsageMetadata};
pub use unified_provider::ProviderError;
