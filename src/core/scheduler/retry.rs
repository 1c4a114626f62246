//! Failure classification and backoff

use std::time::Duration;

use crate::core::analysis::FailureKind;
use crate::core::providers::unified_provider::ProviderError;

/// How the executor reacts to a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Too many requests; back off `2^i` seconds
    RateLimited,
    /// Server-side unavailability; back off `2^i + 1` seconds
    ServerUnavailable,
    /// Anything else; give up immediately
    Fatal,
}

impl ErrorClass {
    pub fn of(error: &ProviderError) -> Self {
        match error {
            ProviderError::RateLimit { .. } => Self::RateLimited,
            ProviderError::ApiError { status: 429, .. } => Self::RateLimited,
            ProviderError::ProviderUnavailable { .. } => Self::ServerUnavailable,
            ProviderError::ApiError { status, .. } if (500..=599).contains(status) => {
                Self::ServerUnavailable
            }
            _ => Self::Fatal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }

    /// Delay before the next attempt, after failed attempt number `attempt`
    /// (1-based); `None` when the class is not retried
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        let base = 2u64.saturating_pow(attempt.saturating_sub(1));
        match self {
            Self::RateLimited => Some(Duration::from_secs(base)),
            Self::ServerUnavailable => Some(Duration::from_secs(base.saturating_add(1))),
            Self::Fatal => None,
        }
    }

    /// Category reported when this class ends the request
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::RateLimited => FailureKind::RateLimited,
            Self::ServerUnavailable => FailureKind::ServerUnavailable,
            Self::Fatal => FailureKind::RequestRejected,
        }
    }
}
