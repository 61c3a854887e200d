mod dns_transport;
mod socket_factory;

pub use dns_transport::{DnsTransport, TransportResponse};
pub use socket_factory::{BoxedStream, ProxyStream, SocketFactory};
