use async_trait::async_trait;
use uniproxy_domain::DomainError;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One DNS exchange: encoded query out, encoded reply back.
///
/// `timeout` bounds each wire step; `None` waits indefinitely. Exactly one
/// attempt is made, retry is a caller decision.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
