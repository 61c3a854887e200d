pub mod dns;
pub mod http;
pub mod net;
pub mod proxy;
