//! Generative model trait
//!
//! The only remote collaborator the scheduler depends on.

use async_trait::async_trait;

use crate::core::providers::gemini::models::Generation;
use crate::core::providers::unified_provider::ProviderError;

/// A remote text-generation service
///
/// Implementations perform exactly one network call per method invocation and
/// never retry on their own; retry and rate limiting belong to the
/// [`RequestExecutor`](crate::core::scheduler::RequestExecutor).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, used in logs and usage summaries
    fn model_name(&self) -> String;

    /// Generate a completion for a single user prompt
    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError>;

    /// Exact token count of `text` as the model would bill it
    async fn count_tokens(&self, text: &str) -> Result<u32, ProviderError>;
}
