mod proxy_auth_guard;

pub use proxy_auth_guard::ProxyAuthGuard;
