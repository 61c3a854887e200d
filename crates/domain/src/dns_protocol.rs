use crate::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DNS_PORT: u16 = 53;

/// Wire transport used for a DNS exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryProtocol {
    #[default]
    Udp,
    Tcp,
}

impl QueryProtocol {
    pub fn protocol_name(&self) -> &'static str {
        match self {
            QueryProtocol::Udp => "UDP",
            QueryProtocol::Tcp => "TCP",
        }
    }
}

impl FromStr for QueryProtocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(QueryProtocol::Udp),
            "tcp" => Ok(QueryProtocol::Tcp),
            _ => Err(DomainError::UnknownProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for QueryProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol_name())
    }
}

/// A DNS server address together with the transport used to reach it.
///
/// Accepted forms: `udp://IP:PORT`, `tcp://IP:PORT`, `IP:PORT` and bare `IP`
/// (both UDP). The port defaults to 53. Hostnames are rejected: the server
/// address is what resolves hostnames, so it cannot itself need resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnsEndpoint {
    pub protocol: QueryProtocol,
    pub addr: SocketAddr,
}

impl DnsEndpoint {
    pub fn new(protocol: QueryProtocol, addr: SocketAddr) -> Self {
        Self { protocol, addr }
    }

    pub fn udp(ip: IpAddr) -> Self {
        Self::new(QueryProtocol::Udp, SocketAddr::new(ip, DNS_PORT))
    }

    pub fn tcp(ip: IpAddr) -> Self {
        Self::new(QueryProtocol::Tcp, SocketAddr::new(ip, DNS_PORT))
    }

    pub fn with_protocol(self, protocol: QueryProtocol) -> Self {
        Self { protocol, ..self }
    }
}

fn parse_server_addr(s: &str) -> Result<SocketAddr, DomainError> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let ip = s
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map_err(|_| DomainError::Config(format!("Invalid DNS server address '{}'", s)))?;
    Ok(SocketAddr::new(ip, DNS_PORT))
}

impl FromStr for DnsEndpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (protocol, addr_str) = match s.split_once("://") {
            Some((scheme, rest)) => (scheme.parse::<QueryProtocol>()?, rest),
            None => (QueryProtocol::Udp, s),
        };
        Ok(DnsEndpoint {
            protocol,
            addr: parse_server_addr(addr_str)?,
        })
    }
}

impl fmt::Display for DnsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            QueryProtocol::Udp => write!(f, "udp://{}", self.addr),
            QueryProtocol::Tcp => write!(f, "tcp://{}", self.addr),
        }
    }
}
