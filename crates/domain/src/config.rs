mod auth;
mod dns;
mod errors;
mod logging;
mod relay;
mod root;
mod server;

pub use auth::AuthConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use relay::RelayConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;

/// Seconds to `Duration`, with 0 meaning "no limit".
pub(crate) fn optional_secs(secs: u64) -> Option<std::time::Duration> {
    (secs > 0).then(|| std::time::Duration::from_secs(secs))
}
