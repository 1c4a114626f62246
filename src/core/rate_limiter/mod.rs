//! Rate Limiting Implementation
//!
//! Token buckets for requests-per-minute and tokens-per-minute limits, and the
//! gate that admits a call only when all of them allow it.

mod bucket;
mod gate;
mod types;


// Re-export public types
pub use bucket::TokenBucket;
pub use gate::MultiLimiterGate;
pub use types::{AdmissionTicket, GateSnapshot, GateWaits, LimitDimension};
