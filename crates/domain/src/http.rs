//! HTTP/1.x message heads as seen by the proxy.

use std::fmt::Write as _;

/// Status codes whose responses never carry a body.
pub fn status_has_no_body(code: u16) -> bool {
    (100..200).contains(&code) || code == 204 || code == 304
}

pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        407 => "Proxy Authentication Required",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Ordered header list with case-insensitive lookup. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes every entry named `name`, returning the first removed value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let mut first = None;
        self.entries.retain(|(key, value)| {
            if key.eq_ignore_ascii_case(name) {
                if first.is_none() {
                    first = Some(value.clone());
                }
                false
            } else {
                true
            }
        });
        first
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.entries.retain(|(key, value)| keep(key, value));
    }

    /// Drops hop-by-hop proxy metadata (`Proxy-*`, any case).
    pub fn strip_proxy_headers(&mut self) {
        self.retain(|name, _| !is_proxy_header(name));
    }

    /// True if `name` holds `token` as one of its comma-separated values.
    pub fn has_token(&self, name: &str, token: &str) -> bool {
        self.entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .flat_map(|(_, value)| value.split(','))
            .any(|item| item.trim().eq_ignore_ascii_case(token))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_to(&self, out: &mut String) {
        for (name, value) in &self.entries {
            let _ = write!(out, "{}: {}\r\n", name, value);
        }
        out.push_str("\r\n");
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

pub fn is_proxy_header(name: &str) -> bool {
    name.len() >= 6 && name.as_bytes()[..6].eq_ignore_ascii_case(b"proxy-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub uri: String,
    pub version: String,
    pub headers: Headers,
}

impl RequestHead {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            version: version.into(),
            headers: Headers::new(),
        }
    }

    pub fn is_connect(&self) -> bool {
        self.method.eq_ignore_ascii_case("CONNECT")
    }

    pub fn is_head(&self) -> bool {
        self.method.eq_ignore_ascii_case("HEAD")
    }

    /// The client asked the proxy to keep its connection open.
    pub fn wants_keep_alive(&self) -> bool {
        self.headers
            .get("Proxy-Connection")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("keep-alive"))
    }

    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = format!("{} {} {}\r\n", self.method, self.uri, self.version);
        self.headers.write_to(&mut out);
        out.into_bytes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub version: String,
    pub code: u16,
    pub reason: String,
    pub headers: Headers,
    /// Whether the client connection may be reused after this response.
    pub connection: bool,
}

impl ResponseHead {
    pub fn new(version: impl Into<String>, code: u16) -> Self {
        Self {
            version: version.into(),
            code,
            reason: reason_phrase(code).to_string(),
            headers: Headers::new(),
            connection: false,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(name, value);
        self
    }

    /// Upstream explicitly asked to close.
    pub fn closes_connection(&self) -> bool {
        self.headers.has_token("Connection", "close")
    }

    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = format!("{} {} {}\r\n", self.version, self.code, self.reason);
        self.headers.write_to(&mut out);
        out.into_bytes()
    }
}
