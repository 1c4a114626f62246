//! Submission analysis record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Submitter name used on every record the scheduler produces on failure
pub const API_HANDLER_ERROR: &str = "API Handler Error";
/// Submitter name for a document that could not be read
pub const READ_ERROR: &str = "Read Error";
/// Submitter name for a document with no text
pub const EMPTY_CONTENT: &str = "Empty Content";

const NOT_STATED: &str = "Not Stated";
const UNCLEAR: &str = "Unclear";
const NOT_APPLICABLE: &str = "N/A";

fn not_stated() -> String {
    NOT_STATED.to_string()
}

fn unclear() -> String {
    UNCLEAR.to_string()
}

/// Structured metadata extracted from one submission
///
/// Every field is always present. When the model leaves a field out the
/// decoder fills in a sentinel, so downstream consumers never see a missing
/// key. Fields of the wrong JSON type are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAnalysis {
    #[serde(default = "not_stated")]
    pub submitter_name: String,
    #[serde(default = "unclear")]
    pub inferred_submitter_type: String,
    #[serde(default = "not_stated")]
    pub mission_interest_summary: String,
    #[serde(default)]
    pub key_concerns: Vec<String>,
    #[serde(default)]
    pub policy_recommendations: Vec<String>,
    #[serde(default)]
    pub identified_sections: Vec<String>,
}

impl Default for SubmissionAnalysis {
    fn default() -> Self {
        Self {
            submitter_name: not_stated(),
            inferred_submitter_type: unclear(),
            mission_interest_summary: not_stated(),
            key_concerns: Vec::new(),
            policy_recommendations: Vec::new(),
            identified_sections: Vec::new(),
        }
    }
}

/// Why the scheduler could not produce an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// Rate limited on every attempt
    RateLimited,
    /// Server unavailable on every attempt
    ServerUnavailable,
    /// Rejected without retry (auth, bad request, network, ...)
    RequestRejected,
    /// The model answered but not with analysis JSON
    ParseError,
    /// The configured limits can never admit the request
    AdmissionImpossible,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RateLimited => "Rate Limited",
            Self::ServerUnavailable => "Server Unavailable",
            Self::RequestRejected => "Request Rejected",
            Self::ParseError => "Parse Error",
            Self::AdmissionImpossible => "Admission Impossible",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::RateLimited | Self::ServerUnavailable => {
                "Failed to get analysis after multiple retries."
            }
            Self::RequestRejected => "Request was rejected by the model service.",
            Self::ParseError => "Model response was not valid analysis JSON.",
            Self::AdmissionImpossible => "Configured rate limits can never admit this request.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SubmissionAnalysis {
    /// Record returned in place of an analysis when the scheduler gives up
    pub fn failure(kind: FailureKind) -> Self {
        Self {
            submitter_name: API_HANDLER_ERROR.to_string(),
            inferred_submitter_type: kind.label().to_string(),
            mission_interest_summary: kind.summary().to_string(),
            ..Self::empty_lists()
        }
    }

    /// Record for a document that could not be read
    pub fn read_error() -> Self {
        Self::sentinel(READ_ERROR)
    }

    /// Record for a document with nothing to analyze
    pub fn empty_content() -> Self {
        Self::sentinel(EMPTY_CONTENT)
    }

    fn sentinel(name: &str) -> Self {
        Self {
            submitter_name: name.to_string(),
            inferred_submitter_type: NOT_APPLICABLE.to_string(),
            mission_interest_summary: NOT_APPLICABLE.to_string(),
            ..Self::empty_lists()
        }
    }

    fn empty_lists() -> Self {
        Self {
            submitter_name: String::new(),
            inferred_submitter_type: String::new(),
            mission_interest_summary: String::new(),
            key_concerns: Vec::new(),
            policy_recommendations: Vec::new(),
            identified_sections: Vec::new(),
        }
    }

    /// Whether this record stands in for a failed analysis
    pub fn is_failure(&self) -> bool {
        matches!(
            self.submitter_name.as_str(),
            API_HANDLER_ERROR | READ_ERROR | EMPTY_CONTENT
        )
    }

    /// Failure category of a scheduler failure record
    pub fn failure_kind(&self) -> Option<FailureKind> {
        if self.submitter_name != API_HANDLER_ERROR {
            return None;
        }
        [
            FailureKind::RateLimited,
            FailureKind::ServerUnavailable,
            FailureKind::RequestRejected,
            FailureKind::ParseError,
            FailureKind::AdmissionImpossible,
        ]
        .into_iter()
        .find(|kind| kind.label() == self.inferred_submitter_type)
    }
}
