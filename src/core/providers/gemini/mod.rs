//! Google Gemini provider
//!
//! REST client for the Generative Language API used as the scheduler's remote
//! text-generation collaborator.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiErrorMapper;
pub use models::{Generation, UsageMetadata};
