//! uniproxy domain layer: DNS wire model, HTTP heads, proxy targets,
//! configuration and errors.
pub mod bits;
pub mod config;
pub mod dns_message;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;
pub mod http;
pub mod proxy_target;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{DnsMessage, HeaderFlags, Opcode, Question};
pub use dns_protocol::{DnsEndpoint, QueryProtocol};
pub use dns_record::{RData, RecordClass, RecordType, ResourceRecord};
pub use errors::{DecodeError, DomainError};
pub use http::{Headers, RequestHead, ResponseHead};
pub use proxy_target::{parse_target, ProxyTarget};
