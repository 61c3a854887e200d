//! DNS over UDP (RFC 1035 §4.2.1).
//!
//! One datagram out, one datagram back, no retry. Replies are read into a
//! fixed 1024-byte buffer; anything larger is cut short by the kernel and a
//! reply with the TC bit set is returned unchanged. There is no automatic
//! fallback to TCP.

use super::within;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};
use uniproxy_application::ports::{DnsTransport, TransportResponse};
use uniproxy_domain::DomainError;

pub const MAX_UDP_RESPONSE_SIZE: usize = 1024;

pub struct UdpTransport {
    server_addr: SocketAddr,
    socket: Option<Arc<UdpSocket>>,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            socket: None,
        }
    }

    /// Reuses a caller-owned socket instead of binding one per query. The
    /// socket must not serve concurrent queries.
    pub fn with_socket(server_addr: SocketAddr, socket: Arc<UdpSocket>) -> Self {
        Self {
            server_addr,
            socket: Some(socket),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn socket(&self) -> Result<Arc<UdpSocket>, DomainError> {
        if let Some(socket) = &self.socket {
            return Ok(socket.clone());
        }

        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::transport(self.server_addr, format!("failed to bind UDP socket: {}", e))
        })?;
        Ok(Arc::new(socket))
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;
        let socket = self.socket().await?;

        let bytes_sent = within(timeout, server, async {
            socket
                .send_to(message_bytes, server)
                .await
                .map_err(|e| DomainError::transport(server, e))
        })
        .await?;

        debug!(server = %server, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, from_addr) = within(timeout, server, async {
            socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| DomainError::transport(server, e))
        })
        .await?;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(server = %server, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
