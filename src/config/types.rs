//! Configuration Types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
}

/// Command-channel server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port the command channel listens on. 0 binds an ephemeral port.
    pub port: u16,
    /// Size of the receive buffer handed to each receive attempt.
    pub recv_buffer_size: usize,
    /// Scheduler ticks slept between receive polls while no data is pending.
    pub recv_poll_ticks: u32,
    /// How long to wait for the serve loop to wind down on shutdown.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 5555,
            recv_buffer_size: 1024,
            recv_poll_ticks: 1,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}
