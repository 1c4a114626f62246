//! Token bucket

use tokio::time::Instant;

/// A lazily refilled token bucket
///
/// Quantities are real numbers so fractional refill accumulates exactly; there
/// is no background timer, every read first credits the time elapsed since the
/// previous access. `tokens` always stays within `0..=capacity`.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    fill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket holding `capacity` units and gaining `fill_rate`
    /// units per second
    pub fn new(capacity: f64, fill_rate: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self::with_tokens(capacity, capacity, fill_rate)
    }

    /// Create a bucket for a per-minute limit: capacity `limit`, refilling at
    /// `limit / 60` per second
    pub fn per_minute(limit: f64) -> Self {
        Self::new(limit, limit / 60.0)
    }

    /// Create a bucket with an explicit starting level
    pub fn with_tokens(capacity: f64, tokens: f64, fill_rate: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            tokens: tokens.clamp(0.0, capacity),
            fill_rate: fill_rate.max(0.0),
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.fill_rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Consume `n` units if they are all available; never consumes partially
    pub fn try_consume(&mut self, n: f64) -> bool {
        self.refill();
        if self.tokens >= n {
            self.tokens -= n;
            true
        } else {
            false
        }
    }

    /// Seconds until `n` units are available
    ///
    /// Returns `0.0` when they already are and `f64::INFINITY` when the bucket
    /// does not refill at all.
    pub fn time_until_available(&mut self, n: f64) -> f64 {
        self.refill();
        if self.tokens >= n {
            return 0.0;
        }
        if self.fill_rate <= 0.0 {
            return f64::INFINITY;
        }
        (n - self.tokens) / self.fill_rate
    }

    /// Return units taken by a consumption that was rolled back
    pub fn refund(&mut self, n: f64) {
        self.refill();
        self.tokens = (self.tokens + n).min(self.capacity);
    }

    /// Units available right now
    pub fn available(&mut self) -> f64 {
        self.refill();
        self.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn fill_rate(&self) -> f64 {
        self.fill_rate
    }
}
