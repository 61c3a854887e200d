pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use uniproxy_application::ports::{DnsTransport, TransportResponse};
use uniproxy_domain::{DnsEndpoint, DomainError, QueryProtocol};

pub use tcp::{query_over_stream, TcpTransport};
pub use udp::UdpTransport;

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

#[async_trait]
impl DnsTransport for Transport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => t.send(message_bytes, timeout).await,
            Self::Tcp(t) => t.send(message_bytes, timeout).await,
        }
    }

    fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

pub fn create_transport(endpoint: &DnsEndpoint) -> Transport {
    match endpoint.protocol {
        QueryProtocol::Udp => Transport::Udp(udp::UdpTransport::new(endpoint.addr)),
        QueryProtocol::Tcp => Transport::Tcp(tcp::TcpTransport::new(endpoint.addr)),
    }
}

/// Runs one wire step under the optional per-exchange budget.
pub(crate) async fn within<F, T>(
    timeout: Option<Duration>,
    server: SocketAddr,
    step: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, step)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?,
        None => step.await,
    }
}
