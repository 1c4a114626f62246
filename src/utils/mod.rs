//! Shared utilities

pub mod error;

pub use error::{AnalyzerError, Result};
