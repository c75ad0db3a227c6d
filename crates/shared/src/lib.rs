//! Shared library for the Jikan client workspace.
//!
//! This crate provides common functionality used across the binary crates:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{Config, JikanConfig};
pub use logging::LogConfig;
