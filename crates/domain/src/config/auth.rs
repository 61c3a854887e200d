use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Basic-auth users for the proxy. An empty table disables authentication.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        !self.users.is_empty()
    }
}
