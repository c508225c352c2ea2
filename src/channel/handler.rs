//! Application seam for the byte stream

use bytes::Bytes;

/// Consumer of the bytes arriving on the command channel.
///
/// The channel imposes no message boundary; `data` is whatever one receive
/// attempt returned, and framing or command parsing is the handler's
/// responsibility, accumulating across calls if needed.
pub trait ChannelHandler: Send {
    /// Handle one received chunk and return the bytes to send back, if any.
    fn handle(&mut self, data: &[u8]) -> Option<Bytes>;
}

/// Echoes every received chunk back to the peer.
#[derive(Debug, Default)]
pub struct EchoHandler;

impl ChannelHandler for EchoHandler {
    fn handle(&mut self, data: &[u8]) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_returns_input_verbatim() {
        let mut handler = EchoHandler;
        let reply = handler.handle(b"set pwm 128").unwrap();
        assert_eq!(&reply[..], b"set pwm 128");
    }
}
