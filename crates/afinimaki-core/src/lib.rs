//! afinimaki-core - Core library for the AfiniMaki client.
//!
//! This crate provides the shared types, error hierarchy, and configuration
//! for the AfiniMaki recommendation service client.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_ENDPOINT, KEY_LENGTH};
pub use error::{AfiniError, AfiniResult, ErrorCode};
pub use types::{EstimatedRate, Rating, Recommendation, SoulMate};
