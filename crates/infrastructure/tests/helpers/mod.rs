pub mod dns_server_mock;
pub mod upstream_mock;

pub use dns_server_mock::*;
pub use upstream_mock::*;
