pub mod proxy;

pub use proxy::bind_listener;
