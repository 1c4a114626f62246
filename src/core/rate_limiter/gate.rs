//! Multi-limiter admission gate
//!
//! Composes the request, input-token and output-token buckets. A call is
//! admitted only once all three report zero wait; the request and input
//! buckets are charged at admission, the output bucket is only checked here
//! and charged after the call with the real output size.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::bucket::TokenBucket;
use super::types::{AdmissionTicket, GateSnapshot, GateWaits};
use crate::config::{SchedulerConfig, Validate};
use crate::utils::error::{AnalyzerError, Result};

/// Shortest admission sleep; float residue below this would otherwise spin
const MIN_SLEEP: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct GateBuckets {
    requests: TokenBucket,
    input_tokens: TokenBucket,
    output_tokens: TokenBucket,
}

impl GateBuckets {
    fn waits(&mut self, input: f64, output: f64) -> GateWaits {
        GateWaits {
            requests: self.requests.time_until_available(1.0),
            input_tokens: if input > self.input_tokens.capacity() {
                f64::INFINITY
            } else {
                self.input_tokens.time_until_available(input)
            },
            output_tokens: self.output_tokens.time_until_available(output),
        }
    }
}

/// Admission gate over the three rate-limit dimensions
///
/// Bucket state sits behind a mutex so check-and-consume is atomic, and
/// callers queue on a fair async mutex so concurrent callers are admitted in
/// the order they arrived.
#[derive(Debug)]
pub struct MultiLimiterGate {
    buckets: Mutex<GateBuckets>,
    queue: tokio::sync::Mutex<()>,
    input_capacity: f64,
    output_capacity: f64,
}

impl MultiLimiterGate {
    /// Build the gate from per-minute limits
    ///
    /// Fails when the limits could never admit a request.
    pub fn new(config: &SchedulerConfig) -> Result<Self> {
        config.validate().map_err(AnalyzerError::Config)?;

        Ok(Self::from_buckets(
            TokenBucket::per_minute(config.requests_per_minute),
            TokenBucket::per_minute(config.input_tokens_per_minute),
            TokenBucket::per_minute(config.output_tokens_per_minute),
        ))
    }

    /// Build the gate from explicit buckets
    pub fn from_buckets(
        requests: TokenBucket,
        input_tokens: TokenBucket,
        output_tokens: TokenBucket,
    ) -> Self {
        Self {
            input_capacity: input_tokens.capacity(),
            output_capacity: output_tokens.capacity(),
            buckets: Mutex::new(GateBuckets {
                requests,
                input_tokens,
                output_tokens,
            }),
            queue: tokio::sync::Mutex::new(()),
        }
    }

    /// Demand actually placed on the token buckets
    ///
    /// Input is charged in full, so a prompt above the input capacity can
    /// never be admitted. The output estimate is only checked, so it is
    /// lowered to a full bucket.
    fn demand(&self, input_tokens: u32, output_estimate: u32) -> (f64, f64) {
        let output = f64::from(output_estimate);
        if output > self.output_capacity {
            debug!(
                output_estimate,
                capacity = self.output_capacity,
                "Output estimate exceeds output bucket capacity; checking against a full bucket"
            );
        }

        (f64::from(input_tokens), output.min(self.output_capacity))
    }

    /// Current wait per dimension for a call of the given size
    pub fn waits(&self, input_tokens: u32, output_estimate: u32) -> GateWaits {
        let (input, output) = self.demand(input_tokens, output_estimate);
        self.buckets.lock().waits(input, output)
    }

    /// Admit a call without waiting
    ///
    /// On success the request and input buckets have been charged. Otherwise
    /// nothing is charged and the current waits are returned; all-zero waits
    /// mean a consumption lost a race and the caller should simply recheck.
    pub fn try_admit(&self, input_tokens: u32, output_estimate: u32) -> std::result::Result<(), GateWaits> {
        let (input, output) = self.demand(input_tokens, output_estimate);
        self.try_admit_demand(input, output)
    }

    fn try_admit_demand(&self, input: f64, output: f64) -> std::result::Result<(), GateWaits> {
        let mut buckets = self.buckets.lock();

        let waits = buckets.waits(input, output);
        if !waits.is_ready() {
            return Err(waits);
        }

        if !buckets.requests.try_consume(1.0) {
            debug!("Request bucket consumption failed; rechecking");
            return Err(GateWaits::default());
        }

        if !buckets.input_tokens.try_consume(input) {
            buckets.requests.refund(1.0);
            debug!("Input token consumption failed after request was charged; refunded and rechecking");
            return Err(GateWaits::default());
        }

        Ok(())
    }

    /// Suspend until all three limits admit the call, then charge it
    pub async fn admit(&self, input_tokens: u32, output_estimate: u32) -> Result<AdmissionTicket> {
        let _turn = self.queue.lock().await;

        let (input, output) = self.demand(input_tokens, output_estimate);
        if input > self.input_capacity {
            warn!(
                input_tokens,
                capacity = self.input_capacity,
                "Prompt exceeds the input token budget for a whole minute"
            );
            return Err(AnalyzerError::admission(format!(
                "prompt of {} input tokens exceeds the input bucket capacity of {}",
                input_tokens, self.input_capacity
            )));
        }

        let started = Instant::now();
        let mut checks = 0u32;

        loop {
            checks += 1;
            let waits = match self.try_admit_demand(input, output) {
                Ok(()) => {
                    return Ok(AdmissionTicket {
                        input_tokens: input,
                        output_estimate: output,
                        waited: started.elapsed(),
                        checks,
                    });
                }
                Err(waits) => waits,
            };

            let max_wait = waits.max();
            if max_wait <= 0.0 {
                continue;
            }

            let Ok(delay) = Duration::try_from_secs_f64(max_wait) else {
                return Err(AnalyzerError::admission(format!(
                    "{} bucket can never supply the request (wait {}s)",
                    waits.limiting(),
                    max_wait
                )));
            };

            info!(
                "Rate limit approached. Waiting {:.2}s. (RPM: {:.2}s, InTPM: {:.2}s, EstOutTPM: {:.2}s)",
                max_wait, waits.requests, waits.input_tokens, waits.output_tokens
            );
            tokio::time::sleep(delay.max(MIN_SLEEP)).await;
        }
    }

    /// Charge the output bucket with the real output size
    ///
    /// Returns `false` when the bucket could not cover it; the bucket is left
    /// unchanged in that case.
    pub fn record_output(&self, output_tokens: u32) -> bool {
        self.buckets
            .lock()
            .output_tokens
            .try_consume(f64::from(output_tokens))
    }

    /// Current bucket levels
    pub fn snapshot(&self) -> GateSnapshot {
        let mut buckets = self.buckets.lock();
        GateSnapshot {
            requests: buckets.requests.available(),
            input_tokens: buckets.input_tokens.available(),
            output_tokens: buckets.output_tokens.available(),
        }
    }
}
