//! Request scheduling
//!
//! Everything between a prompt and its analysis: token estimation, admission
//! through the rate-limit gate, the remote call, retry with backoff, and usage
//! accounting.

mod estimate;
mod executor;
mod retry;
mod usage;


pub use estimate::{
    HEURISTIC_TOKENS_PER_WORD, TokenEstimate, estimate_tokens, heuristic_token_count,
    output_estimate,
};
pub use executor::{ExecutionOutcome, PREFLIGHT_PROMPT, RequestExecutor};
pub use retry::ErrorClass;
pub use usage::{UsageAccountant, UsageSummary};
