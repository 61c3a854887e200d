//! DNS over TCP (RFC 1035 §4.2.2): every message carries a two-byte
//! big-endian length prefix.

use super::within;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;
use uniproxy_application::ports::{DnsTransport, TransportResponse};
use uniproxy_domain::DomainError;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn connect(&self, timeout: Option<Duration>) -> Result<TcpStream, DomainError> {
        let server = self.server_addr;
        let stream = within(timeout, server, async {
            TcpStream::connect(server)
                .await
                .map_err(|e| DomainError::transport(server, format!("connect failed: {}", e)))
        })
        .await?;

        stream
            .set_nodelay(true)
            .map_err(|e| DomainError::transport(server, format!("failed to set TCP_NODELAY: {}", e)))?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = self.connect(timeout).await?;
        let response_bytes =
            query_over_stream(&mut stream, self.server_addr, message_bytes, timeout).await?;

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

/// One length-prefixed exchange over an already-open stream. The stream is
/// left open for the caller to reuse or drop.
pub async fn query_over_stream<S>(
    stream: &mut S,
    server: SocketAddr,
    message_bytes: &[u8],
    timeout: Option<Duration>,
) -> Result<Vec<u8>, DomainError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    within(timeout, server, send_with_length_prefix(stream, server, message_bytes)).await?;

    debug!(server = %server, message_len = message_bytes.len(), "TCP query sent");

    let response = within(timeout, server, read_with_length_prefix(stream, server)).await?;

    debug!(server = %server, response_len = response.len(), "TCP response received");

    Ok(response)
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    server: SocketAddr,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWrite + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| DomainError::transport(server, "query exceeds 65535 bytes"))?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| io_failure(server, e))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| io_failure(server, e))?;
    stream.flush().await.map_err(|e| io_failure(server, e))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(
    stream: &mut S,
    server: SocketAddr,
) -> Result<Vec<u8>, DomainError>
where
    S: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| io_failure(server, e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len == 0 {
        return Err(DomainError::UnexpectedEof);
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| io_failure(server, e))?;

    Ok(response)
}

fn io_failure(server: SocketAddr, err: std::io::Error) -> DomainError {
    match err.kind() {
        ErrorKind::UnexpectedEof => DomainError::UnexpectedEof,
        _ => DomainError::transport(server, err),
    }
}
