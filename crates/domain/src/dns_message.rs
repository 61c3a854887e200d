mod flags;
mod opcode;
pub mod wire;

pub use flags::{decode_flags, encode_flags, HeaderFlags};
pub use opcode::Opcode;
pub use wire::{decode_message, decode_name, encode_message, encode_name};

use crate::dns_record::{RData, RecordClass, RecordType, ResourceRecord};
use crate::errors::DecodeError;
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub record_type: RecordType,
    pub class: RecordClass,
}

impl Question {
    pub fn new(name: impl Into<String>, record_type: RecordType, class: RecordClass) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
        }
    }
}

/// One DNS transaction: header, question section and the three record
/// sections. Section counts are not stored; they are the vector lengths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsMessage {
    pub id: u16,
    pub flags: HeaderFlags,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// A recursive single-question query with the given transaction id.
    pub fn query(id: u16, question: Question) -> Self {
        Self {
            id,
            flags: HeaderFlags {
                recursion_desired: true,
                ..HeaderFlags::default()
            },
            questions: vec![question],
            ..Self::default()
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, DecodeError> {
        encode_message(self)
    }

    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_message(buf)
    }

    pub fn is_truncated(&self) -> bool {
        self.flags.truncated
    }

    /// Whether this reply echoes the transaction id of `query`.
    pub fn id_matches(&self, query: &DnsMessage) -> bool {
        self.id == query.id
    }

    /// IPv4 addresses of the A records in the answer section, in order.
    pub fn answer_addresses(&self) -> Vec<Ipv4Addr> {
        self.answers
            .iter()
            .filter_map(|record| record.rdata.as_ipv4())
            .collect()
    }

    pub fn answer_cnames(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().filter_map(|record| match &record.rdata {
            RData::Cname(target) => Some(target.as_str()),
            RData::A(_) => None,
        })
    }
}

impl fmt::Display for DnsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "id {} {} rcode {}{}",
            self.id,
            self.flags.opcode,
            self.flags.response_code,
            if self.flags.truncated { " (truncated)" } else { "" }
        )?;
        writeln!(f, "quiz")?;
        for question in &self.questions {
            writeln!(
                f,
                "\t{}\t{}\t{}",
                question.name, question.record_type, question.class
            )?;
        }
        writeln!(f, "answer")?;
        for record in &self.answers {
            writeln!(f, "\t{}", record)?;
        }
        Ok(())
    }
}
