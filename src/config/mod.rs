//! Configuration Module
//!
//! Handles configuration loading, validation, and CLI/env overrides.

pub mod manager;
pub mod types;

pub use manager::ConfigManager;
pub use types::{Config, LogConfig, ServerConfig};
