//! Core traits module

pub mod provider;

pub use provider::*;
