use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Record and query types known to the codec.
///
/// Only `A` and `CNAME` carry decodable resource data; the rest exist so that
/// questions and diagnostics can name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    MD,
    MF,
    CNAME,
    SOA,
    MB,
    MG,
    MR,
    NULL,
    WKS,
    PTR,
    HINFO,
    MINFO,
    MX,
    TXT,
    AAAA,
    SRV,
    SPF,
    UNAME,
    AXFR,
    MAILB,
    MAILA,
    ANY,
    MP,
}

static NAMES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    RecordType::ALL
        .iter()
        .map(|rtype| (rtype.to_u16(), rtype.as_str()))
        .collect()
});

static CODES: LazyLock<HashMap<&'static str, RecordType>> = LazyLock::new(|| {
    RecordType::ALL
        .iter()
        .map(|rtype| (rtype.as_str(), *rtype))
        .collect()
});

impl RecordType {
    pub const ALL: [RecordType; 25] = [
        RecordType::A,
        RecordType::NS,
        RecordType::MD,
        RecordType::MF,
        RecordType::CNAME,
        RecordType::SOA,
        RecordType::MB,
        RecordType::MG,
        RecordType::MR,
        RecordType::NULL,
        RecordType::WKS,
        RecordType::PTR,
        RecordType::HINFO,
        RecordType::MINFO,
        RecordType::MX,
        RecordType::TXT,
        RecordType::AAAA,
        RecordType::SRV,
        RecordType::SPF,
        RecordType::UNAME,
        RecordType::AXFR,
        RecordType::MAILB,
        RecordType::MAILA,
        RecordType::ANY,
        RecordType::MP,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::MD => "MD",
            RecordType::MF => "MF",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::MB => "MB",
            RecordType::MG => "MG",
            RecordType::MR => "MR",
            RecordType::NULL => "NULL",
            RecordType::WKS => "WKS",
            RecordType::PTR => "PTR",
            RecordType::HINFO => "HINFO",
            RecordType::MINFO => "MINFO",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::SRV => "SRV",
            RecordType::SPF => "SPF",
            RecordType::UNAME => "UNAME",
            RecordType::AXFR => "AXFR",
            RecordType::MAILB => "MAILB",
            RecordType::MAILA => "MAILA",
            RecordType::ANY => "ANY",
            RecordType::MP => "MP",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::MD => 3,
            RecordType::MF => 4,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::MB => 7,
            RecordType::MG => 8,
            RecordType::MR => 9,
            RecordType::NULL => 10,
            RecordType::WKS => 11,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MINFO => 14,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::SPF => 99,
            RecordType::UNAME => 110,
            RecordType::AXFR => 252,
            RecordType::MAILB => 253,
            RecordType::MAILA => 254,
            RecordType::ANY => 255,
            RecordType::MP => 240,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|rtype| rtype.to_u16() == code)
    }

    /// Mnemonic for a numeric type code, as printed in diagnostics.
    pub fn lookup(code: u16) -> Option<&'static str> {
        NAMES.get(&code).copied()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CODES
            .get(s.to_uppercase().as_str())
            .copied()
            .ok_or_else(|| format!("Unknown record type: {}", s))
    }
}
