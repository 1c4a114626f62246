//! Pre-flight token estimates

use tracing::{debug, warn};

use crate::core::traits::GenerativeModel;

/// Tokens assumed per whitespace-separated word when the model cannot count
pub const HEURISTIC_TOKENS_PER_WORD: u32 = 2;

/// Sizes used for admission before the call is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEstimate {
    /// Input tokens of the prompt
    pub input_tokens: u32,
    /// Projected output tokens, checked but not charged at admission
    pub output_estimate: u32,
    /// Whether `input_tokens` came from the word-count heuristic
    pub is_approximate: bool,
}

/// Word-count estimate of a prompt's tokens
pub fn heuristic_token_count(text: &str) -> u32 {
    let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
    words.saturating_mul(HEURISTIC_TOKENS_PER_WORD)
}

/// Output projection: twice the input, never above `cap`
pub fn output_estimate(input_tokens: u32, cap: u32) -> u32 {
    input_tokens.saturating_mul(2).min(cap)
}

/// Estimate a prompt's size, asking the model for an exact count first
pub async fn estimate_tokens(
    model: &dyn GenerativeModel,
    prompt: &str,
    output_estimate_cap: u32,
) -> TokenEstimate {
    let (input_tokens, is_approximate) = match model.count_tokens(prompt).await {
        Ok(count) => {
            debug!(input_tokens = count, "Counted prompt tokens");
            (count, false)
        }
        Err(e) => {
            let count = heuristic_token_count(prompt);
            warn!(
                error = %e,
                input_tokens = count,
                approximate = true,
                "Token counting failed; using word-count estimate"
            );
            (count, true)
        }
    };

    TokenEstimate {
        input_tokens,
        output_estimate: output_estimate(input_tokens, output_estimate_cap),
        is_approximate,
    }
}
