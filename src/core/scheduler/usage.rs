//! Usage accounting

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime counters for one executor
///
/// Counters only grow. They are atomics so the owning executor can be shared
/// across tasks.
#[derive(Debug)]
pub struct UsageAccountant {
    model_name: String,
    requests: AtomicU64,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    errors: AtomicU64,
}

/// Snapshot of the usage counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub model_name: String,
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub errors: u64,
}

impl UsageAccountant {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            requests: AtomicU64::new(0),
            input_tokens: AtomicU64::new(0),
            output_tokens: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Count a completed call
    pub fn record_success(&self, input_tokens: u32, output_tokens: u32) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.input_tokens
            .fetch_add(u64::from(input_tokens), Ordering::Relaxed);
        self.output_tokens
            .fetch_add(u64::from(output_tokens), Ordering::Relaxed);
    }

    /// Count a failed attempt
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> UsageSummary {
        UsageSummary {
            model_name: self.model_name.clone(),
            requests: self.requests.load(Ordering::Relaxed),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
