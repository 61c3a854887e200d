use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use uniproxy_domain::DomainError;

/// A bidirectional byte stream to an upstream host.
pub trait ProxyStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ProxyStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn ProxyStream>;

/// Hands out upstream connections. The returned stream belongs to the caller
/// and is closed when dropped.
#[async_trait]
pub trait SocketFactory: Send + Sync {
    async fn acquire(&self, host: &str, port: u16) -> Result<BoxedStream, DomainError>;
}
