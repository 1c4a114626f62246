//! End-to-end tests against the live Gemini API
//!
//! These need a real `GOOGLE_API_KEY` and are ignored by default:
//!
//! ```bash
//! GOOGLE_API_KEY=... cargo test --test lib e2e -- --ignored
//! ```
