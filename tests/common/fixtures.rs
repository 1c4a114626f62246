//! Test fixtures

use serde_json::{Value, json};

/// Well-formed analysis JSON for a named submitter
pub fn analysis_json(submitter: &str) -> String {
    json!({
        "submitter_name": submitter,
        "inferred_submitter_type": "Industry-Association",
        "mission_interest_summary": "Represents member companies on AI policy.",
        "key_concerns": ["Regulatory fragmentation", "Export controls"],
        "policy_recommendations": ["Federal preemption"],
        "identified_sections": ["Summary", "Recommendations"]
    })
    .to_string()
}

/// `generateContent` response body carrying `text`
pub fn gemini_response_body(text: &str, output_tokens: Option<u32>) -> Value {
    let mut body = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    });
    if let Some(tokens) = output_tokens {
        body["usageMetadata"] = json!({
            "promptTokenCount": 120,
            "candidatesTokenCount": tokens,
            "totalTokenCount": 120 + tokens
        });
    }
    body
}

/// Google API error body
pub fn gemini_error_body(code: u16, status: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "status": status
        }
    })
}
