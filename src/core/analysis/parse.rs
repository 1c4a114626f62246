//! Strict decoding of model output into [`SubmissionAnalysis`]

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::record::SubmissionAnalysis;
use crate::utils::error::{AnalyzerError, Result};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(?:json|JSON)?\s*(.*?)\s*(?:```)?$").expect("Invalid code fence regex")
});

/// Remove a surrounding Markdown code fence, if any
///
/// Accepts ```` ```json ```` or a bare ```` ``` ```` opener; the closing fence
/// is optional. Text without an opening fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    CODE_FENCE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |body| body.as_str().trim())
}

/// Decode model output as a submission analysis
///
/// The text must hold exactly one JSON object. Missing fields take their
/// sentinel values and unknown fields are ignored; a field of the wrong type
/// fails the whole decode.
pub fn decode_analysis(text: &str) -> Result<SubmissionAnalysis> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;

    if !value.is_object() {
        return Err(AnalyzerError::invalid_input(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }

    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// First `max_chars` characters of `text`, for log snippets
pub fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
