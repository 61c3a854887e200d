pub mod socket_factory;

pub use socket_factory::DnsSocketFactory;
