#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uniproxy_application::ports::{DnsTransport, TransportResponse};
use uniproxy_domain::{DnsMessage, DomainError, ResourceRecord};

/// Answers every query with a canned reply, echoing the query's id and
/// question unless told otherwise.
#[derive(Clone, Default)]
pub struct MockDnsTransport {
    answers: Arc<Mutex<Vec<ResourceRecord>>>,
    truncated: Arc<Mutex<bool>>,
    wrong_id: Arc<Mutex<bool>>,
    raw_reply: Arc<Mutex<Option<Vec<u8>>>>,
    error: Arc<Mutex<Option<DomainError>>>,
    sent: Arc<Mutex<Vec<DnsMessage>>>,
    timeouts: Arc<Mutex<Vec<Option<Duration>>>>,
}

impl MockDnsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: Vec<ResourceRecord>) -> Self {
        let mock = Self::new();
        *mock.answers.lock().unwrap() = answers;
        mock
    }

    pub fn set_truncated(&self) {
        *self.truncated.lock().unwrap() = true;
    }

    pub fn set_wrong_id(&self) {
        *self.wrong_id.lock().unwrap() = true;
    }

    pub fn set_raw_reply(&self, bytes: Vec<u8>) {
        *self.raw_reply.lock().unwrap() = Some(bytes);
    }

    pub fn set_error(&self, error: DomainError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn sent_queries(&self) -> Vec<DnsMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn seen_timeouts(&self) -> Vec<Option<Duration>> {
        self.timeouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsTransport for MockDnsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        let query = DnsMessage::decode(message_bytes)?;
        self.sent.lock().unwrap().push(query.clone());
        self.timeouts.lock().unwrap().push(timeout);

        if let Some(error) = self.error.lock().unwrap().clone() {
            return Err(error);
        }
        if let Some(raw) = self.raw_reply.lock().unwrap().clone() {
            return Ok(TransportResponse {
                bytes: raw,
                protocol_used: "MOCK",
            });
        }

        let mut reply = query;
        reply.flags.is_response = true;
        reply.flags.recursion_available = true;
        reply.flags.truncated = *self.truncated.lock().unwrap();
        if *self.wrong_id.lock().unwrap() {
            reply.id = reply.id.wrapping_add(1);
        }
        reply.answers = self.answers.lock().unwrap().clone();

        Ok(TransportResponse {
            bytes: reply.encode()?,
            protocol_used: "MOCK",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
