pub mod auth;
pub mod dns;

pub use auth::ProxyAuthGuard;
pub use dns::{build_query, ResolveNameUseCase};
