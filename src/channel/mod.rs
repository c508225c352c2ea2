//! Command-channel server
//!
//! Owns the listener and runs the node's accept → poll → reply cycle, one
//! client at a time. The channel carries opaque bytes; whatever interpreter
//! rides on the stream plugs in behind [`ChannelHandler`].

pub mod handler;
pub mod server;

pub use handler::{ChannelHandler, EchoHandler};
pub use server::ChannelServer;
