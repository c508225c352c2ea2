//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file, falling back to defaults if it does not
    /// exist.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config
                .validate()
                .context("Configuration validation failed")?;

            Ok(config)
        } else {
            tracing::warn!(
                "Configuration file not found at {}, using defaults",
                path.display()
            );
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(port) = std::env::var("NODELINK_PORT") {
            config.server.port = port
                .parse::<u16>()
                .with_context(|| format!("Invalid NODELINK_PORT: {}", port))?;
        }

        if let Ok(size) = std::env::var("NODELINK_RECV_BUFFER_SIZE") {
            config.server.recv_buffer_size = size
                .parse::<usize>()
                .with_context(|| format!("Invalid NODELINK_RECV_BUFFER_SIZE: {}", size))?;
        }

        if let Ok(ticks) = std::env::var("NODELINK_RECV_POLL_TICKS") {
            config.server.recv_poll_ticks = ticks
                .parse::<u32>()
                .with_context(|| format!("Invalid NODELINK_RECV_POLL_TICKS: {}", ticks))?;
        }

        if let Ok(timeout) = std::env::var("NODELINK_SHUTDOWN_TIMEOUT") {
            config.server.shutdown_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid NODELINK_SHUTDOWN_TIMEOUT: {}", timeout))?;
        }

        if let Ok(level) = std::env::var("NODELINK_LOG_LEVEL") {
            config.log.level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Apply command-line overrides. CLI arguments have the highest priority.
    pub fn merge_with_cli_args(&mut self, port: Option<u16>, log_level: Option<&str>) {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(level) = log_level {
            self.log.level = level.to_string();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.recv_buffer_size == 0 {
            bail!("recv_buffer_size must be greater than zero");
        }

        if self.server.shutdown_timeout.is_zero() {
            bail!("shutdown_timeout must be greater than zero");
        }

        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => bail!("Invalid log level: {}", other),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5555);
    }

    #[test]
    fn loads_config_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            port = 6000
            recv_buffer_size = 512
            recv_poll_ticks = 2
            shutdown_timeout = "10s"

            [log]
            level = "debug"
            "#
        )
        .unwrap();

        let config = ConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.recv_buffer_size, 512);
        assert_eq!(config.server.recv_poll_ticks, 2);
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ConfigManager::load_from_file(Path::new("/nonexistent/nodelink.toml")).unwrap();
        assert_eq!(config.server.port, Config::default().server.port);
    }

    #[test]
    fn rejects_zero_recv_buffer() {
        let mut config = Config::default();
        config.server.recv_buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.log.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_args_override_config() {
        let mut config = Config::default();
        config.merge_with_cli_args(Some(7777), Some("warn"));
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.log.level, "warn");
    }
}
