//! One accepted peer session and its non-blocking I/O primitives

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use tracing::{debug, error};

use crate::net::error::{RecvError, SendError};
use crate::net::retry::{self, Attempt};

/// Scheduler ticks slept between send attempts while the socket buffer is
/// full.
pub const SEND_RETRY_TICKS: u32 = 1;

/// A socket representing one accepted peer session, in non-blocking mode.
///
/// Exclusively owned by the task that accepted it for its whole lifetime;
/// the `&mut self` receivers make concurrent use from two tasks a compile
/// error rather than a discipline. After [`RecvError::Closed`] or any fatal
/// error the handle must be [`close`](Self::close)d and not reused.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Connection { stream, peer }
    }

    /// Address of the connected peer.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Perform exactly one non-blocking receive attempt into `buf`.
    ///
    /// Never suspends and never retries internally; callers poll this from a
    /// scheduler-yielding loop. `Ok(n)` may be a partial read — callers
    /// accumulate across calls. [`RecvError::WouldBlock`] means no data is
    /// available right now, [`RecvError::Closed`] means the peer shut down
    /// in an orderly fashion. `buf` must be non-empty, or an empty read is
    /// indistinguishable from a closed peer.
    pub fn try_recv(&mut self, buf: &mut [u8]) -> Result<usize, RecvError> {
        match self.stream.read(buf) {
            Ok(0) => Err(RecvError::Closed),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(RecvError::WouldBlock),
            Err(e) => {
                error!(peer = %self.peer, error = %e, "receive failed");
                Err(RecvError::Other(e))
            }
        }
    }

    /// Send the entire buffer, looping over partial writes.
    ///
    /// While the socket buffer is full this suspends for [`SEND_RETRY_TICKS`]
    /// scheduler ticks and retries the remaining suffix, so the calling task
    /// blocks until the buffer is flushed or a fatal error occurs. There is
    /// no retry bound: an unresponsive peer stalls the sender indefinitely,
    /// and callers needing bounded latency must wrap this in
    /// `tokio::time::timeout`. On [`SendError::ConnectionLost`] the
    /// connection is unusable and must be closed.
    pub async fn send_all(&mut self, buf: &[u8]) -> Result<(), SendError> {
        let peer = self.peer;
        let stream = &mut self.stream;
        let mut sent = 0;

        retry::retry_with_yield(SEND_RETRY_TICKS, || {
            while sent < buf.len() {
                match stream.write(&buf[sent..]) {
                    Ok(n) => sent += n,
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Attempt::Pending,
                    Err(e) => {
                        error!(peer = %peer, error = %e, "send failed");
                        return Attempt::Fatal(SendError::ConnectionLost(e));
                    }
                }
            }
            Attempt::Ready(())
        })
        .await
    }

    /// Release the underlying handle unconditionally.
    ///
    /// Consuming `self` makes use-after-close unrepresentable.
    pub fn close(self) {
        debug!(peer = %self.peer, "closing connection");
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
