#![allow(dead_code)]
use uniproxy_domain::{
    DnsMessage, HeaderFlags, Question, RecordClass, RecordType, ResourceRecord,
};
use std::net::Ipv4Addr;

pub struct DnsMessageBuilder {
    message: DnsMessage,
}

impl DnsMessageBuilder {
    pub fn query(name: &str) -> Self {
        Self {
            message: DnsMessage::query(
                0x1234,
                Question::new(name, RecordType::A, RecordClass::IN),
            ),
        }
    }

    pub fn response(name: &str) -> Self {
        let mut builder = Self::query(name);
        builder.message.flags.is_response = true;
        builder.message.flags.recursion_available = true;
        builder
    }

    pub fn id(mut self, id: u16) -> Self {
        self.message.id = id;
        self
    }

    pub fn flags(mut self, flags: HeaderFlags) -> Self {
        self.message.flags = flags;
        self
    }

    pub fn answer_a(mut self, name: &str, addr: &str) -> Self {
        let addr: Ipv4Addr = addr.parse().unwrap();
        self.message.answers.push(ResourceRecord::a(name, 300, addr));
        self
    }

    pub fn answer_cname(mut self, name: &str, target: &str) -> Self {
        self.message
            .answers
            .push(ResourceRecord::cname(name, 300, target));
        self
    }

    pub fn authority_cname(mut self, name: &str, target: &str) -> Self {
        self.message
            .authority
            .push(ResourceRecord::cname(name, 60, target));
        self
    }

    pub fn additional_a(mut self, name: &str, addr: &str) -> Self {
        let addr: Ipv4Addr = addr.parse().unwrap();
        self.message
            .additional
            .push(ResourceRecord::a(name, 60, addr));
        self
    }

    pub fn build(self) -> DnsMessage {
        self.message
    }
}

/// Hand-assembled reply bytes, for shapes the encoder never produces
/// (compression pointers, unsupported record types, bad counts).
pub struct RawReply {
    bytes: Vec<u8>,
}

impl RawReply {
    /// Header with `qd` questions and `an` answers; flags 0x8180.
    pub fn header(id: u16, qd: u16, an: u16) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_be_bytes());
        bytes.extend_from_slice(&0x8180u16.to_be_bytes());
        bytes.extend_from_slice(&qd.to_be_bytes());
        bytes.extend_from_slice(&an.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        Self { bytes }
    }

    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.bytes
            .extend_from_slice(&uniproxy_domain::dns_message::encode_name(name).unwrap());
        self
    }

    pub fn pointer(mut self, offset: u16) -> Self {
        self.bytes.extend_from_slice(&(0xC000 | offset).to_be_bytes());
        self
    }

    pub fn question_tail(mut self, rtype: u16) -> Self {
        self.bytes.extend_from_slice(&rtype.to_be_bytes());
        self.bytes.extend_from_slice(&1u16.to_be_bytes());
        self
    }

    /// Type, class IN, TTL 300 and the rdata length prefix.
    pub fn record_tail(mut self, rtype: u16, rdata: &[u8]) -> Self {
        self.bytes.extend_from_slice(&rtype.to_be_bytes());
        self.bytes.extend_from_slice(&1u16.to_be_bytes());
        self.bytes.extend_from_slice(&300u32.to_be_bytes());
        self.bytes
            .extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(rdata);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
