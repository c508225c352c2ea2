//! Single-client accept/serve loop

use std::net::SocketAddr;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::channel::handler::ChannelHandler;
use crate::config::ServerConfig;
use crate::net::{AcceptError, Connection, Listener, ListenError, RecvError};
use crate::sched;

/// Serves the command channel: accepts one peer at a time, polls for bytes,
/// hands them to the handler, sends replies, and returns to accepting when
/// the peer goes away.
///
/// Per-connection failures are local — the connection is closed and the
/// server goes back to accepting. Nothing that happens on a connection
/// corrupts or leaks listener state.
pub struct ChannelServer<H> {
    listener: Listener,
    handler: H,
    recv_buffer_size: usize,
    recv_poll_ticks: u32,
}

impl<H: ChannelHandler> ChannelServer<H> {
    /// Bind the listening socket described by `config` and prepare to serve.
    pub fn bind(config: &ServerConfig, handler: H) -> Result<Self, ListenError> {
        let listener = Listener::bind(config.port)?;
        Ok(ChannelServer {
            listener,
            handler,
            recv_buffer_size: config.recv_buffer_size,
            recv_poll_ticks: config.recv_poll_ticks,
        })
    }

    /// The address the channel is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Run the accept/serve loop until a shutdown signal arrives.
    pub async fn run(&mut self, mut shutdown_rx: broadcast::Receiver<()>) -> crate::Result<()> {
        info!(addr = %self.listener.local_addr(), "command channel listening");

        loop {
            let conn = tokio::select! {
                result = self.listener.accept() => match result {
                    Ok(conn) => conn,
                    Err(e @ AcceptError::Accept(_)) => {
                        // Fatal to this attempt only; the listener stays usable.
                        error!(error = %e, "accept failed, retrying");
                        continue;
                    }
                    Err(e @ AcceptError::SetClientNonBlocking { .. }) => {
                        warn!(error = %e, "dropping unusable connection");
                        continue;
                    }
                },
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received, stopping accept loop");
                    return Ok(());
                }
            };

            info!(peer = %conn.peer_addr(), "client session started");
            if self.serve(conn, &mut shutdown_rx).await {
                return Ok(());
            }
        }
    }

    /// Serve one connection until the peer goes away, a fatal error occurs,
    /// or shutdown is signalled. Returns true if shutdown was observed.
    async fn serve(&mut self, mut conn: Connection, shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
        let peer = conn.peer_addr();
        let mut buf = vec![0u8; self.recv_buffer_size];

        loop {
            if shutdown_rx.try_recv().is_ok() {
                info!(%peer, "shutdown signal received, closing client session");
                conn.close();
                return true;
            }

            match conn.try_recv(&mut buf) {
                Ok(n) => {
                    if let Some(reply) = self.handler.handle(&buf[..n]) {
                        if let Err(e) = conn.send_all(&reply).await {
                            warn!(%peer, error = %e, "send failed, dropping client");
                            conn.close();
                            return false;
                        }
                    }
                }
                Err(RecvError::WouldBlock) => {
                    sched::delay_ticks(self.recv_poll_ticks).await;
                }
                Err(RecvError::Closed) => {
                    // Orderly peer shutdown, not an error.
                    info!(%peer, "peer closed the connection");
                    conn.close();
                    return false;
                }
                Err(RecvError::Other(_)) => {
                    // Already logged with the underlying code by the net layer.
                    conn.close();
                    return false;
                }
            }
        }
    }
}
