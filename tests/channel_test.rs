//! Integration tests for the command-channel server

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use nodelink::config::ServerConfig;
use nodelink::{ChannelServer, EchoHandler, ShutdownCoordinator};

fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn echoes_bytes_and_shuts_down_gracefully() {
    let coordinator = ShutdownCoordinator::new();
    let mut server = ChannelServer::bind(&test_config(), EchoHandler).unwrap();
    let addr = server.local_addr();

    let shutdown_rx = coordinator.subscribe();
    let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"Hello").await.unwrap();

    let mut buf = [0u8; 5];
    timeout(Duration::from_secs(5), stream.read_exact(&mut buf))
        .await
        .expect("echo timed out")
        .unwrap();
    assert_eq!(&buf, b"Hello");

    coordinator.trigger();
    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn returns_to_accepting_after_peer_disconnects() {
    let coordinator = ShutdownCoordinator::new();
    let mut server = ChannelServer::bind(&test_config(), EchoHandler).unwrap();
    let addr = server.local_addr();

    let shutdown_rx = coordinator.subscribe();
    let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

    // First client exchanges one message, then goes away.
    {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"one").await.unwrap();
        let mut buf = [0u8; 3];
        timeout(Duration::from_secs(5), stream.read_exact(&mut buf))
            .await
            .expect("first echo timed out")
            .unwrap();
        assert_eq!(&buf, b"one");
    }

    // The connection failure is local to that client: the server must be
    // back to accepting, and a second client gets served.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"two").await.unwrap();
    let mut buf = [0u8; 3];
    timeout(Duration::from_secs(5), stream.read_exact(&mut buf))
        .await
        .expect("second echo timed out")
        .unwrap();
    assert_eq!(&buf, b"two");

    coordinator.trigger();
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after shutdown signal")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn shutdown_interrupts_a_pending_accept() {
    let coordinator = ShutdownCoordinator::new();
    let mut server = ChannelServer::bind(&test_config(), EchoHandler).unwrap();

    let shutdown_rx = coordinator.subscribe();
    let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

    // No client ever connects; the signal alone must unblock the loop.
    tokio::time::sleep(Duration::from_millis(50)).await;
    coordinator.trigger();

    timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after shutdown signal")
        .unwrap()
        .unwrap();
}
