//! The proxy relay engine: `CONNECT` tunnels, streaming forward of
//! absolute-URI requests, and the per-connection request loop.

mod forward;
mod server;
mod tunnel;

pub use server::ProxyServer;
pub use tunnel::{relay_tunnel, TunnelEnd, TunnelSummary};

use std::sync::Arc;
use uniproxy_application::ports::SocketFactory;
use uniproxy_domain::config::RelayConfig;

pub struct ProxyRelay {
    config: RelayConfig,
    sockets: Arc<dyn SocketFactory>,
}

impl ProxyRelay {
    pub fn new(config: RelayConfig, sockets: Arc<dyn SocketFactory>) -> Self {
        Self { config, sockets }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
