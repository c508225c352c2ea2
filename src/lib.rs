//! nodelink
//!
//! Non-blocking TCP command channel for a sensor/actuator node: a listener
//! bound once at startup, one accepted client at a time, and non-blocking
//! receive/send primitives with a closed error taxonomy. The byte stream is
//! opaque; command interpreters plug in behind [`ChannelHandler`].

pub mod channel;
pub mod config;
pub mod net;
pub mod sched;
pub mod shutdown;

pub use channel::{ChannelHandler, ChannelServer, EchoHandler};
pub use config::Config;
pub use net::{Connection, Listener};
pub use shutdown::ShutdownCoordinator;

/// Common application-level error type
pub type Result<T> = anyhow::Result<T>;
