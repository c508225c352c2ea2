//! nodelink - command channel for a sensor/actuator node
//!
//! Binds the node's listening socket, serves one client at a time with the
//! echo handler, and shuts down cleanly on SIGTERM/SIGINT.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nodelink::{config::ConfigManager, ChannelServer, EchoHandler, ShutdownCoordinator};

/// CLI arguments for nodelink
#[derive(Parser, Debug)]
#[command(name = "nodelink")]
#[command(about = "Non-blocking TCP command channel for a sensor/actuator node")]
#[command(version)]
#[command(long_about = "
nodelink - command channel for a sensor/actuator node

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  NODELINK_PORT              - Listening port
  NODELINK_RECV_BUFFER_SIZE  - Receive buffer size in bytes
  NODELINK_RECV_POLL_TICKS   - Scheduler ticks between receive polls
  NODELINK_SHUTDOWN_TIMEOUT  - Shutdown timeout (e.g. 5s)
  NODELINK_LOG_LEVEL         - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "nodelink.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Port to bind to (overrides config file)
    #[arg(short, long, help = "Port to bind to")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help = "Log level")]
    pub log_level: String,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_tracing(&args)?;

    info!("Starting nodelink v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        info!("Config file not found, checking environment variables");
        ConfigManager::load_from_env()?
    };

    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };
    config.merge_with_cli_args(args.port, Some(log_level));

    config
        .validate()
        .context("Final configuration validation failed")?;

    if args.validate_config {
        info!("Configuration is valid");
        info!("  Port: {}", config.server.port);
        info!("  Receive buffer: {} bytes", config.server.recv_buffer_size);
        info!(
            "  Receive poll interval: {} ticks",
            config.server.recv_poll_ticks
        );
        info!("  Shutdown timeout: {:?}", config.server.shutdown_timeout);
        return Ok(());
    }

    let shutdown_coordinator = ShutdownCoordinator::new();

    let mut server = ChannelServer::bind(&config.server, EchoHandler)
        .context("Failed to create listening socket")?;
    info!("Command channel bound to {}", server.local_addr());

    let shutdown_rx = shutdown_coordinator.subscribe();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(shutdown_rx).await {
            error!("Command channel error: {}", e);
        }
    });

    shutdown_coordinator.listen_for_signals().await?;

    match tokio::time::timeout(config.server.shutdown_timeout, server_handle).await {
        Ok(Ok(())) => info!("Command channel stopped"),
        Ok(Err(e)) => error!("Command channel task failed: {}", e),
        Err(_) => warn!(
            "Shutdown timeout of {:?} reached, aborting",
            config.server.shutdown_timeout
        ),
    }

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
