use super::optional_secs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs for the relay engine. Durations are in seconds; 0 disables a limit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Bounds each body read and write in forward mode.
    #[serde(default = "default_io_timeout")]
    pub io_timeout: u64,

    /// Tears a tunnel down after this long without traffic in either direction.
    #[serde(default = "default_tunnel_idle_timeout")]
    pub tunnel_idle_timeout: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Log every request and response head at debug level.
    #[serde(default)]
    pub verbose: bool,
}

impl RelayConfig {
    pub fn io_timeout(&self) -> Option<Duration> {
        optional_secs(self.io_timeout)
    }

    pub fn tunnel_idle_timeout(&self) -> Option<Duration> {
        optional_secs(self.tunnel_idle_timeout)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        optional_secs(self.connect_timeout)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            io_timeout: default_io_timeout(),
            tunnel_idle_timeout: default_tunnel_idle_timeout(),
            connect_timeout: default_connect_timeout(),
            verbose: false,
        }
    }
}

fn default_buffer_size() -> usize {
    8192
}

fn default_io_timeout() -> u64 {
    60
}

fn default_tunnel_idle_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    10
}
