//! Listening socket setup and the cooperative accept loop

use std::io;
use std::net::{self, Ipv4Addr, SocketAddr, SocketAddrV4};

use tokio::net::TcpSocket;
use tracing::{debug, info, warn};

use crate::net::connection::Connection;
use crate::net::error::{AcceptError, ListenError};
use crate::net::retry::{self, Attempt};

/// Scheduler ticks slept between accept attempts while no connection is
/// pending.
pub const ACCEPT_RETRY_TICKS: u32 = 10;

/// Pending-connection backlog. One by policy: the channel serves a single
/// client at a time.
const BACKLOG: u32 = 1;

/// A passive IPv4 stream socket bound to `0.0.0.0:port`, in non-blocking
/// mode, with a backlog of one pending connection.
///
/// Created once at startup and destroyed only at shutdown. Intended to be
/// accepted from by a single task; the protocol does not preclude multiple
/// acceptors, but no internal synchronization is provided for them.
#[derive(Debug)]
pub struct Listener {
    inner: net::TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind a listening socket to `0.0.0.0:port`.
    ///
    /// Setup runs in four steps, each with its own [`ListenError`] variant:
    /// allocate the socket, bind the address, arm the backlog, switch to
    /// non-blocking mode. Any failure is terminal for the call and no
    /// partially configured listener escapes. Pass port 0 to bind an
    /// ephemeral port and read it back with [`local_addr`](Self::local_addr).
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(port: u16) -> Result<Listener, ListenError> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));

        let socket = TcpSocket::new_v4().map_err(ListenError::SocketCreate)?;
        socket
            .bind(addr)
            .map_err(|source| ListenError::Bind { addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| ListenError::Bind { addr, source })?;
        let inner = socket
            .listen(BACKLOG)
            .and_then(tokio::net::TcpListener::into_std)
            .map_err(ListenError::Listen)?;
        inner
            .set_nonblocking(true)
            .map_err(ListenError::SetNonBlocking)?;

        info!(%local_addr, backlog = BACKLOG, "listener bound");
        Ok(Listener { inner, local_addr })
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next inbound connection.
    ///
    /// Blocking from the caller's perspective, but implemented as a
    /// cooperative poll loop: a non-blocking accept attempt every
    /// [`ACCEPT_RETRY_TICKS`] scheduler ticks, suspending in between so
    /// other tasks make progress. There is no timeout; this call is designed
    /// to be the sole suspension point of an acceptor task's loop body.
    ///
    /// On success the connection has already been switched to non-blocking
    /// mode. [`AcceptError::Accept`] is fatal to this attempt only — the
    /// listener stays usable. On [`AcceptError::SetClientNonBlocking`] the
    /// unusable connection has been closed before returning.
    pub async fn accept(&self) -> Result<Connection, AcceptError> {
        let (stream, peer) = retry::retry_with_yield(ACCEPT_RETRY_TICKS, || {
            match self.inner.accept() {
                Ok(pair) => Attempt::Ready(pair),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Attempt::Pending,
                Err(e) => Attempt::Fatal(AcceptError::Accept(e)),
            }
        })
        .await?;

        info!(%peer, "connection accepted");

        if let Err(source) = stream.set_nonblocking(true) {
            // Dropping the stream closes the unusable socket.
            warn!(%peer, error = %source, "could not set accepted connection to non-blocking");
            return Err(AcceptError::SetClientNonBlocking { peer, source });
        }

        debug!(%peer, "connection switched to non-blocking mode");
        Ok(Connection::new(stream, peer))
    }
}
