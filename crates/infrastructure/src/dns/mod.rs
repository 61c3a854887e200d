pub mod lookup;
pub mod transport;

pub use lookup::{lookup_addresses, resolve, resolver_for};
pub use transport::{create_transport, Transport};
