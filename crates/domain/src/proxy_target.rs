use crate::errors::DomainError;
use std::fmt;

/// Where a proxied request goes: the upstream host and port, and the
/// origin-form path (with query) to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parses an absolute URI (`http://host[:port]/path?query`) or an
/// authority-form target (`host:port`, as sent with `CONNECT`).
///
/// Without an explicit port, `https` targets use 443 and everything else 80.
/// Fragments are dropped; an absolute URI with no path gets `/`, an
/// authority-form target gets an empty path.
pub fn parse_target(uri: &str) -> Result<ProxyTarget, DomainError> {
    let (scheme, rest) = match uri.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, uri),
    };

    let authority_end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let tail = tail.split('#').next().unwrap_or_default();

    let path = match (scheme, tail) {
        (None, "") => String::new(),
        (Some(_), "") => "/".to_string(),
        (_, tail) if tail.starts_with('?') => format!("/{}", tail),
        (_, tail) => tail.to_string(),
    };

    let authority = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let default_port = match scheme {
        Some(scheme) if scheme.eq_ignore_ascii_case("https") => 443,
        _ => 80,
    };
    let (host, port) = split_host_port(authority, default_port)
        .ok_or_else(|| DomainError::InvalidTarget(uri.to_string()))?;

    if host.is_empty() {
        return Err(DomainError::InvalidTarget(uri.to_string()));
    }

    Ok(ProxyTarget {
        host: host.to_string(),
        port,
        path,
    })
}

fn split_host_port(authority: &str, default_port: u16) -> Option<(&str, u16)> {
    if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, rest) = bracketed.split_once(']')?;
        return match rest.strip_prefix(':') {
            Some(port) => Some((host, port.parse().ok()?)),
            None if rest.is_empty() => Some((host, default_port)),
            None => None,
        };
    }
    match authority.split_once(':') {
        Some((host, port)) => Some((host, port.parse().ok()?)),
        None => Some((authority, default_port)),
    }
}
