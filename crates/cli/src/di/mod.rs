use std::sync::Arc;
use tracing::info;
use uniproxy_application::use_cases::ProxyAuthGuard;
use uniproxy_domain::Config;
use uniproxy_infrastructure::dns::resolver_for;
use uniproxy_infrastructure::net::DnsSocketFactory;
use uniproxy_infrastructure::proxy::{ProxyRelay, ProxyServer};

pub struct ProxyServices {
    pub server: Arc<ProxyServer>,
}

impl ProxyServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.dns.endpoint()?;
        let resolver = Arc::new(resolver_for(&endpoint, config.dns.query_timeout()));

        info!(
            dns_server = %endpoint,
            protocol = resolver.protocol_name(),
            "DNS resolver configured"
        );

        let sockets = Arc::new(DnsSocketFactory::new(
            resolver.clone(),
            config.relay.connect_timeout(),
        ));
        let relay = ProxyRelay::new(config.relay.clone(), sockets);
        let guard = ProxyAuthGuard::new(config.auth.users.clone());

        if guard.is_enabled() {
            info!(users = config.auth.users.len(), "Proxy authentication enabled");
        }

        Ok(Self {
            server: Arc::new(ProxyServer::new(relay, guard)),
        })
    }
}
