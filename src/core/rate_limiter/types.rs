//! Rate limiter types and data structures

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One of the three limits a call must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitDimension {
    Requests,
    InputTokens,
    OutputTokens,
}

impl fmt::Display for LimitDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requests => write!(f, "requests"),
            Self::InputTokens => write!(f, "input_tokens"),
            Self::OutputTokens => write!(f, "output_tokens"),
        }
    }
}

/// Seconds each dimension needs before a call fits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateWaits {
    pub requests: f64,
    pub input_tokens: f64,
    pub output_tokens: f64,
}

impl GateWaits {
    /// The gate's wait: the largest of the three
    pub fn max(&self) -> f64 {
        self.requests.max(self.input_tokens).max(self.output_tokens)
    }

    /// Dimension responsible for the longest wait
    pub fn limiting(&self) -> LimitDimension {
        let max = self.max();
        if self.requests == max {
            LimitDimension::Requests
        } else if self.input_tokens == max {
            LimitDimension::InputTokens
        } else {
            LimitDimension::OutputTokens
        }
    }

    pub fn is_ready(&self) -> bool {
        self.max() <= 0.0
    }
}

/// Proof of admission: one per call
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionTicket {
    /// Input tokens charged against the input bucket
    pub input_tokens: f64,
    /// Output estimate checked (not charged) against the output bucket
    pub output_estimate: f64,
    /// Total time spent suspended before admission
    pub waited: Duration,
    /// Availability checks performed, including the successful one
    pub checks: u32,
}

/// Current bucket levels, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateSnapshot {
    pub requests: f64,
    pub input_tokens: f64,
    pub output_tokens: f64,
}
