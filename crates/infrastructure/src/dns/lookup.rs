use super::transport::create_transport;
use std::sync::Arc;
use std::time::Duration;
use uniproxy_application::use_cases::ResolveNameUseCase;
use uniproxy_domain::{DnsEndpoint, DnsMessage, DomainError, RecordType};

/// One query against `endpoint` over the protocol it names.
pub async fn resolve(
    name: &str,
    record_type: RecordType,
    endpoint: &DnsEndpoint,
    timeout: Option<Duration>,
) -> Result<DnsMessage, DomainError> {
    resolver_for(endpoint, timeout)
        .execute(name, record_type)
        .await
}

pub async fn lookup_addresses(
    name: &str,
    endpoint: &DnsEndpoint,
    timeout: Option<Duration>,
) -> Result<Vec<String>, DomainError> {
    resolver_for(endpoint, timeout).lookup_addresses(name).await
}

pub fn resolver_for(endpoint: &DnsEndpoint, timeout: Option<Duration>) -> ResolveNameUseCase {
    ResolveNameUseCase::new(Arc::new(create_transport(endpoint)), timeout)
}
