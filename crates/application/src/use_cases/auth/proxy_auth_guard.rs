use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tracing::debug;
use uniproxy_domain::{RequestHead, ResponseHead};

const AUTHORIZATION_HEADER: &str = "Proxy-Authorization";
const CHALLENGE: &str = "Basic realm=\"users\"";

/// Basic-credential gate in front of the relay.
///
/// With an empty user table every request passes untouched. Otherwise the
/// `Proxy-Authorization` header is always removed so it never reaches the
/// upstream, and anything but a matching `Basic` credential is answered with
/// a 407 challenge.
#[derive(Debug, Clone, Default)]
pub struct ProxyAuthGuard {
    users: HashMap<String, String>,
}

impl ProxyAuthGuard {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    pub fn is_enabled(&self) -> bool {
        !self.users.is_empty()
    }

    /// `None` lets the request through; `Some` is the response to send instead.
    pub fn check(&self, request: &mut RequestHead) -> Option<ResponseHead> {
        if !self.is_enabled() {
            return None;
        }

        let credentials = request
            .headers
            .remove(AUTHORIZATION_HEADER)
            .and_then(|value| parse_basic(&value));

        match credentials {
            Some((user, password)) if self.verify(&user, &password) => None,
            Some((user, _)) => {
                debug!(user = %user, "Proxy credentials rejected");
                Some(challenge(&request.version))
            }
            None => {
                debug!(uri = %request.uri, "Proxy credentials missing or malformed");
                Some(challenge(&request.version))
            }
        }
    }

    fn verify(&self, user: &str, password: &str) -> bool {
        self.users
            .get(user)
            .is_some_and(|expected| bool::from(expected.as_bytes().ct_eq(password.as_bytes())))
    }
}

fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn challenge(version: &str) -> ResponseHead {
    ResponseHead::new(version, 407)
        .with_header("Proxy-Authenticate", CHALLENGE)
        .with_header("Content-Length", "0")
}
