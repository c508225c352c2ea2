//! Graceful Shutdown Handling
//!
//! Listens for SIGTERM/SIGINT and broadcasts a shutdown signal the channel
//! server's accept and serve loops observe between yield points.

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::Result;

/// Shutdown coordinator that fans a single shutdown signal out to tasks
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { shutdown_tx }
    }

    /// Get a receiver for components to listen for the shutdown signal
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Broadcast the shutdown signal to all subscribers
    pub fn trigger(&self) {
        if self.shutdown_tx.send(()).is_err() {
            warn!("No subscribers received the shutdown signal");
        }
    }

    /// Block until SIGTERM, SIGINT, or Ctrl+C arrives, then broadcast
    /// shutdown.
    pub async fn listen_for_signals(&self) -> Result<()> {
        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                }
            }
        }

        #[cfg(windows)]
        {
            signal::ctrl_c().await?;
            info!("Received Ctrl+C, initiating graceful shutdown");
        }

        self.trigger();
        Ok(())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
