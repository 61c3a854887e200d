#![allow(dead_code)]
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{duplex, AsyncReadExt, DuplexStream};
use tokio::sync::{mpsc, Mutex};
use uniproxy_application::ports::{BoxedStream, SocketFactory};
use uniproxy_application::use_cases::ProxyAuthGuard;
use uniproxy_domain::config::RelayConfig;
use uniproxy_domain::DomainError;
use uniproxy_infrastructure::proxy::{ProxyRelay, ProxyServer};

/// The far end of a connection the relay opened.
pub struct Upstream {
    pub host: String,
    pub port: u16,
    pub stream: DuplexStream,
}

/// Socket factory handing out in-memory streams and passing the other end
/// to the test.
pub struct CapturingSocketFactory {
    tx: mpsc::UnboundedSender<Upstream>,
}

impl CapturingSocketFactory {
    pub fn new() -> (Arc<Self>, UpstreamQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), UpstreamQueue(Mutex::new(rx)))
    }
}

#[async_trait]
impl SocketFactory for CapturingSocketFactory {
    async fn acquire(&self, host: &str, port: u16) -> Result<BoxedStream, DomainError> {
        let (ours, theirs) = duplex(64 * 1024);
        self.tx
            .send(Upstream {
                host: host.to_string(),
                port,
                stream: theirs,
            })
            .map_err(|_| DomainError::Relay("test dropped the upstream queue".to_string()))?;
        Ok(Box::new(ours))
    }
}

pub struct UpstreamQueue(Mutex<mpsc::UnboundedReceiver<Upstream>>);

impl UpstreamQueue {
    pub async fn next(&self) -> Upstream {
        self.0.lock().await.recv().await.unwrap()
    }
}

pub struct FailingSocketFactory;

#[async_trait]
impl SocketFactory for FailingSocketFactory {
    async fn acquire(&self, host: &str, _port: u16) -> Result<BoxedStream, DomainError> {
        Err(DomainError::NoAddresses(host.to_string()))
    }
}

pub fn test_relay_config() -> RelayConfig {
    RelayConfig {
        buffer_size: 1024,
        io_timeout: 5,
        tunnel_idle_timeout: 5,
        connect_timeout: 5,
        verbose: true,
    }
}

pub fn capturing_relay() -> (ProxyRelay, UpstreamQueue) {
    let (factory, queue) = CapturingSocketFactory::new();
    (ProxyRelay::new(test_relay_config(), factory), queue)
}

pub fn capturing_server(guard: ProxyAuthGuard) -> (Arc<ProxyServer>, UpstreamQueue) {
    let (relay, queue) = capturing_relay();
    (Arc::new(ProxyServer::new(relay, guard)), queue)
}

/// Reads up to and including the blank line ending a message head.
pub async fn read_head<S: AsyncReadExt + Unpin>(stream: &mut S) -> String {
    let mut head = Vec::new();
    while !head.ends_with(b"\r\n\r\n") {
        let byte = stream.read_u8().await.unwrap();
        head.push(byte);
    }
    String::from_utf8(head).unwrap()
}

pub async fn read_exactly<S: AsyncReadExt + Unpin>(stream: &mut S, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf).await.unwrap();
    buf
}
