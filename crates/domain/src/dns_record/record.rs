use super::{RecordClass, RecordType};
use std::fmt;
use std::net::Ipv4Addr;

/// Type-tagged resource data. The record type is implied by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Cname(String),
}

impl RData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::Cname(_) => RecordType::CNAME,
        }
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A(addr) => Some(*addr),
            RData::Cname(_) => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::Cname(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub class: RecordClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, class: RecordClass, ttl: u32, rdata: RData) -> Self {
        Self {
            name: name.into(),
            class,
            ttl,
            rdata,
        }
    }

    pub fn a(name: impl Into<String>, ttl: u32, addr: Ipv4Addr) -> Self {
        Self::new(name, RecordClass::IN, ttl, RData::A(addr))
    }

    pub fn cname(name: impl Into<String>, ttl: u32, target: impl Into<String>) -> Self {
        Self::new(name, RecordClass::IN, ttl, RData::Cname(target.into()))
    }

    pub fn record_type(&self) -> RecordType {
        self.rdata.record_type()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name,
            self.record_type(),
            self.class,
            self.ttl,
            self.rdata
        )
    }
}
