//! Connection-layer error taxonomy
//!
//! One closed enum per operation, so callers can handle every outcome
//! exhaustively instead of pattern-matching on raw OS error codes.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Failures while setting up the listening socket.
///
/// Each variant names the setup step that failed. Every failure is terminal
/// for the call; no partially configured listener is ever returned.
#[derive(Debug, Error)]
pub enum ListenError {
    /// The underlying socket could not be allocated.
    #[error("socket allocation failed: {0}")]
    SocketCreate(#[source] io::Error),

    /// The listener could not be switched to non-blocking mode.
    #[error("switching listener to non-blocking mode failed: {0}")]
    SetNonBlocking(#[source] io::Error),

    /// The address is in use or invalid.
    #[error("bind to {addr} failed: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The listen backlog could not be armed.
    #[error("arming listen backlog failed: {0}")]
    Listen(#[source] io::Error),
}

/// Failures while accepting a connection.
#[derive(Debug, Error)]
pub enum AcceptError {
    /// The accept call itself failed. Fatal to this attempt only; the
    /// listener remains usable for a subsequent accept.
    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    /// The accepted connection could not be switched to non-blocking mode.
    /// The connection has already been closed when this is returned.
    #[error("switching connection from {peer} to non-blocking mode failed: {source}")]
    SetClientNonBlocking {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Outcomes of a single non-blocking receive attempt other than data.
#[derive(Debug, Error)]
pub enum RecvError {
    /// No data is available right now. A liveness signal, not a failure:
    /// yield and retry later.
    #[error("no data available")]
    WouldBlock,

    /// The peer performed an orderly shutdown. Terminal for the connection;
    /// the handle must be closed and not reused.
    #[error("connection closed by peer")]
    Closed,

    /// Any unclassified platform failure. Terminal for the connection.
    #[error("receive failed: {0}")]
    Other(#[source] io::Error),
}

/// Failure while flushing a buffer to the peer.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection is unusable; the caller must close it.
    #[error("send failed, connection lost: {0}")]
    ConnectionLost(#[source] io::Error),
}
