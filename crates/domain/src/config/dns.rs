use super::optional_secs;
use crate::dns_protocol::DnsEndpoint;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// `udp://IP:PORT`, `tcp://IP:PORT`, `IP:PORT` or `IP`.
    #[serde(default = "default_server")]
    pub server: String,

    /// Per-exchange timeout in seconds; 0 waits indefinitely.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl DnsConfig {
    pub fn endpoint(&self) -> Result<DnsEndpoint, DomainError> {
        self.server.parse()
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        optional_secs(self.query_timeout)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_server() -> String {
    "udp://8.8.8.8:53".to_string()
}

fn default_query_timeout() -> u64 {
    5
}
