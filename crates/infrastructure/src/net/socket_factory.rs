use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, warn};
use uniproxy_application::ports::{BoxedStream, SocketFactory};
use uniproxy_application::use_cases::ResolveNameUseCase;
use uniproxy_domain::DomainError;

/// Opens upstream TCP connections, resolving hostnames through the
/// configured DNS server rather than the platform resolver.
///
/// IP literals are dialed directly. Resolved addresses are tried in answer
/// order and the first successful connection wins.
pub struct DnsSocketFactory {
    resolver: Arc<ResolveNameUseCase>,
    connect_timeout: Option<Duration>,
}

impl DnsSocketFactory {
    pub fn new(resolver: Arc<ResolveNameUseCase>, connect_timeout: Option<Duration>) -> Self {
        Self {
            resolver,
            connect_timeout,
        }
    }

    async fn addresses(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let addresses: Vec<IpAddr> = self
            .resolver
            .lookup_addresses(host)
            .await?
            .iter()
            .filter_map(|addr| addr.parse().ok())
            .collect();

        if addresses.is_empty() {
            return Err(DomainError::NoAddresses(host.to_string()));
        }
        Ok(addresses)
    }

    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream, DomainError> {
        let attempt = TcpStream::connect(addr);
        let stream = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .map_err(|_| DomainError::RelayTimeout)?,
            None => attempt.await,
        }
        .map_err(|e| DomainError::Relay(format!("connect to {} failed: {}", addr, e)))?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }
        Ok(stream)
    }
}

#[async_trait]
impl SocketFactory for DnsSocketFactory {
    async fn acquire(&self, host: &str, port: u16) -> Result<BoxedStream, DomainError> {
        let mut last_error = None;

        for ip in self.addresses(host).await? {
            let addr = SocketAddr::new(ip, port);
            match self.connect(addr).await {
                Ok(stream) => {
                    debug!(host = %host, upstream = %addr, "Upstream connected");
                    return Ok(Box::new(stream));
                }
                Err(e) => {
                    warn!(host = %host, upstream = %addr, error = %e, "Upstream connect failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DomainError::NoAddresses(host.to_string())))
    }
}
