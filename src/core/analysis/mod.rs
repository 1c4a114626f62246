//! Submission analysis
//!
//! The structured record extracted from each document, the strict decoder that
//! turns model output into it, and the prompt that asks for it.

pub mod parse;
pub mod prompt;
pub mod record;

pub use parse::{decode_analysis, strip_code_fence};
pub use prompt::AnalysisPrompt;
pub use record::{FailureKind, SubmissionAnalysis};
