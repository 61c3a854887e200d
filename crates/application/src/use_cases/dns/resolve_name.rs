use crate::ports::DnsTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uniproxy_domain::{DnsMessage, DomainError, Question, RecordClass, RecordType};

/// Single-question recursive query with a fresh random transaction id.
pub fn build_query(name: &str, record_type: RecordType, class: RecordClass) -> DnsMessage {
    DnsMessage::query(fastrand::u16(..), Question::new(name, record_type, class))
}

/// Build, send and decode one query against a fixed transport.
pub struct ResolveNameUseCase {
    transport: Arc<dyn DnsTransport>,
    timeout: Option<Duration>,
}

impl ResolveNameUseCase {
    pub fn new(transport: Arc<dyn DnsTransport>, timeout: Option<Duration>) -> Self {
        Self { transport, timeout }
    }

    pub async fn execute(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<DnsMessage, DomainError> {
        let query = build_query(name, record_type, RecordClass::IN);
        let query_bytes = query.encode()?;

        let response = self.transport.send(&query_bytes, self.timeout).await?;
        let reply = DnsMessage::decode(&response.bytes)?;

        if !reply.id_matches(&query) {
            warn!(
                domain = %name,
                expected = query.id,
                received = reply.id,
                "DNS reply id does not match query"
            );
        }
        if reply.is_truncated() {
            warn!(
                domain = %name,
                protocol = response.protocol_used,
                "DNS reply truncated, answers may be incomplete"
            );
        }

        debug!(
            domain = %name,
            record_type = %record_type,
            protocol = response.protocol_used,
            answers = reply.answers.len(),
            rcode = reply.flags.response_code,
            "DNS query resolved"
        );

        Ok(reply)
    }

    /// IPv4 addresses of the A records literally present in the answer
    /// section. CNAME chains are not followed.
    pub async fn lookup_addresses(&self, name: &str) -> Result<Vec<String>, DomainError> {
        let reply = self.execute(name, RecordType::A).await?;
        Ok(reply
            .answer_addresses()
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    pub fn protocol_name(&self) -> &'static str {
        self.transport.protocol_name()
    }
}
