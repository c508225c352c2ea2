//! Non-blocking connection layer
//!
//! Turns a single listening socket into a sequence of accepted client
//! connections and provides non-blocking receive/send primitives over each,
//! surfacing a closed error taxonomy instead of raw platform error codes.
//!
//! All sockets run in non-blocking mode; operations that cannot make progress
//! either report [`RecvError::WouldBlock`] to the caller (`try_recv`) or
//! retry internally with a cooperative tick delay (`accept`, `send_all`) so
//! other tasks on the scheduler are never starved.

pub mod connection;
pub mod error;
pub mod listener;
pub mod retry;

pub use connection::Connection;
pub use error::{AcceptError, ListenError, RecvError, SendError};
pub use listener::Listener;
