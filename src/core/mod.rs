//! Core functionality for the analyzer
//!
//! Rate limiting, request scheduling, the remote model client, the analysis
//! record and the batch driver that ties them together.

pub mod analysis;
pub mod batch;
pub mod providers;
pub mod rate_limiter;
pub mod scheduler;
pub mod traits;
