//! Common test utilities for rfi-analyzer
//!
//! This module provides shared test infrastructure for all tests:
//! - A scripted [`GenerativeModel`](rfi_analyzer::GenerativeModel) that plays
//!   back queued responses and counts calls
//! - Analysis JSON and Gemini wire fixtures
//! - Custom assertions and helpers

pub mod fixtures;
pub mod scripted;

// Re-export commonly used items
pub use fixtures::{analysis_json, gemini_error_body, gemini_response_body};
pub use scripted::ScriptedModel;

/// Skip test if environment variable is not set
#[macro_export]
macro_rules! skip_without_env {
    ($var:expr) => {
        if std::env::var($var).is_err() {
            eprintln!("Skipping test: {} environment variable not set", $var);
            return;
        }
    };
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
