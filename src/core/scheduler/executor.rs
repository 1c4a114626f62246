//! Request executor
//!
//! Runs one prompt through admission, the remote call, output reconciliation
//! and decoding, retrying transient failures with exponential backoff. It
//! always answers with a [`SubmissionAnalysis`]; failures come back as
//! sentinel records so a batch can keep going.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::estimate::{TokenEstimate, estimate_tokens};
use super::retry::ErrorClass;
use super::usage::{UsageAccountant, UsageSummary};
use crate::config::{SchedulerConfig, Validate};
use crate::core::analysis::parse::snippet;
use crate::core::analysis::{FailureKind, SubmissionAnalysis, decode_analysis};
use crate::core::providers::Generation;
use crate::core::rate_limiter::MultiLimiterGate;
use crate::core::traits::GenerativeModel;
use crate::utils::error::{AnalyzerError, Result};

/// Longest raw-response excerpt written to the log on a parse failure
const RAW_SNIPPET_CHARS: usize = 500;

/// Tiny request sent once before a batch to prove the key and model work
pub const PREFLIGHT_PROMPT: &str = "Test: Briefly say hello. Respond ONLY with a valid JSON object \
    containing a single key \"greeting\" and your greeting as the value. \
    For example: {\"greeting\": \"Hello!\"}";

/// What one `execute` call did
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub analysis: SubmissionAnalysis,
    /// Remote calls attempted, including the successful one
    pub attempts: u32,
    pub estimate: TokenEstimate,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        !self.analysis.is_failure()
    }
}

struct AttemptFailure {
    class: ErrorClass,
    kind: FailureKind,
    message: String,
}

impl From<crate::core::providers::ProviderError> for AttemptFailure {
    fn from(error: crate::core::providers::ProviderError) -> Self {
        let class = ErrorClass::of(&error);
        Self {
            class,
            kind: class.failure_kind(),
            message: error.to_string(),
        }
    }
}

/// Rate-limited, retrying front end to a [`GenerativeModel`]
pub struct RequestExecutor {
    model: Arc<dyn GenerativeModel>,
    gate: MultiLimiterGate,
    usage: UsageAccountant,
    max_retries: u32,
    output_estimate_cap: u32,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("model", &self.model.model_name())
            .field("gate", &self.gate)
            .field("max_retries", &self.max_retries)
            .field("output_estimate_cap", &self.output_estimate_cap)
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor with buckets sized from `config`
    ///
    /// Fails when the limits could never admit a request.
    pub fn new(model: Arc<dyn GenerativeModel>, config: &SchedulerConfig) -> Result<Self> {
        let gate = MultiLimiterGate::new(config)?;
        Self::with_gate(model, gate, config)
    }

    /// Create an executor around an existing gate; only the retry settings of
    /// `config` are used
    pub fn with_gate(
        model: Arc<dyn GenerativeModel>,
        gate: MultiLimiterGate,
        config: &SchedulerConfig,
    ) -> Result<Self> {
        config.validate().map_err(AnalyzerError::Config)?;

        let usage = UsageAccountant::new(model.model_name());
        info!(
            model = %model.model_name(),
            rpm = config.requests_per_minute,
            input_tpm = config.input_tokens_per_minute,
            output_tpm = config.output_tokens_per_minute,
            max_retries = config.max_retries,
            "Request executor initialized"
        );

        Ok(Self {
            model,
            gate,
            usage,
            max_retries: config.max_retries,
            output_estimate_cap: config.output_estimate_cap,
        })
    }

    /// Analyze one prompt
    pub async fn execute(&self, prompt: &str) -> SubmissionAnalysis {
        self.execute_with_outcome(prompt).await.analysis
    }

    /// Send one small request through the full admission and retry path
    ///
    /// Fails when the call ends in a scheduler failure record, so a bad key
    /// or unknown model stops a run before any document is read. The call is
    /// charged to the buckets and usage like any other.
    pub async fn preflight(&self) -> Result<()> {
        info!(model = %self.model.model_name(), "Running preflight API check");
        let outcome = self.execute_with_outcome(PREFLIGHT_PROMPT).await;

        match outcome.analysis.failure_kind() {
            None => {
                info!(attempts = outcome.attempts, "Preflight API check passed");
                Ok(())
            }
            Some(kind) => Err(AnalyzerError::Preflight(format!(
                "{} after {} attempt(s)",
                kind.label(),
                outcome.attempts
            ))),
        }
    }

    /// Analyze one prompt, reporting attempts and the estimate used
    pub async fn execute_with_outcome(&self, prompt: &str) -> ExecutionOutcome {
        let estimate =
            estimate_tokens(self.model.as_ref(), prompt, self.output_estimate_cap).await;

        let mut retries_remaining = self.max_retries;
        let mut attempts = 0u32;
        let mut last_failure = FailureKind::RequestRejected;

        while retries_remaining > 0 {
            attempts += 1;

            if let Err(e) = self
                .gate
                .admit(estimate.input_tokens, estimate.output_estimate)
                .await
            {
                self.usage.record_error();
                error!(error = %e, "Request can never be admitted. Giving up on this request.");
                return outcome(
                    SubmissionAnalysis::failure(FailureKind::AdmissionImpossible),
                    attempts,
                    estimate,
                );
            }

            debug!(
                input_tokens = estimate.input_tokens,
                retries_left = retries_remaining,
                "Attempting API call"
            );
            let started = Instant::now();
            let failure = match self.model.generate(prompt).await {
                Ok(generation) => match self.complete(generation, &estimate, started.elapsed()) {
                    Ok(analysis) => return outcome(analysis, attempts, estimate),
                    Err(e) => AttemptFailure {
                        class: ErrorClass::Fatal,
                        kind: FailureKind::ParseError,
                        message: e.to_string(),
                    },
                },
                Err(e) => AttemptFailure::from(e),
            };

            self.usage.record_error();
            last_failure = failure.kind;
            error!(
                "API call failed (attempt {}/{}). Error: {}. Duration: {:.2}s",
                attempts,
                self.max_retries,
                failure.message,
                started.elapsed().as_secs_f64()
            );

            retries_remaining -= 1;
            if retries_remaining == 0 {
                error!("Max retries reached. Giving up on this request.");
                break;
            }

            let Some(delay) = failure.class.backoff(attempts) else {
                error!(
                    kind = %failure.kind,
                    "Non-retryable error encountered. Giving up on this request."
                );
                break;
            };
            warn!(
                "{} error detected. Waiting {}s before retry...",
                failure.kind,
                delay.as_secs()
            );
            tokio::time::sleep(delay).await;
        }

        outcome(SubmissionAnalysis::failure(last_failure), attempts, estimate)
    }

    /// Account for a completed call and decode its text
    fn complete(
        &self,
        generation: Generation,
        estimate: &TokenEstimate,
        duration: Duration,
    ) -> Result<SubmissionAnalysis> {
        let output_tokens = match generation.output_tokens() {
            Some(tokens) => tokens,
            None => {
                warn!("No usage metadata in response. Output tokens unaccounted for output TPM.");
                0
            }
        };

        if !self.gate.record_output(output_tokens) {
            warn!(
                output_tokens,
                "Could not consume actual output tokens from output TPM bucket. Bucket may be exhausted or limit too low."
            );
        }

        self.usage
            .record_success(estimate.input_tokens, output_tokens);
        info!(
            "API call successful. Duration: {:.2}s. Input Tokens: {}. Output Tokens: {}.",
            duration.as_secs_f64(),
            estimate.input_tokens,
            output_tokens
        );

        decode_analysis(&generation.text).inspect_err(|e| {
            warn!(error = %e, "Could not parse response as analysis JSON");
            debug!(
                raw = snippet(&generation.text, RAW_SNIPPET_CHARS),
                "Received text for JSON parsing"
            );
        })
    }

    pub fn usage_summary(&self) -> UsageSummary {
        self.usage.summary()
    }

    pub fn gate(&self) -> &MultiLimiterGate {
        &self.gate
    }

    pub fn model_name(&self) -> String {
        self.model.model_name()
    }
}

fn outcome(analysis: SubmissionAnalysis, attempts: u32, estimate: TokenEstimate) -> ExecutionOutcome {
    ExecutionOutcome {
        analysis,
        attempts,
        estimate,
    }
}
