//! Endpoint parsing for the heartbeat request
//!
//! Deliberately minimal: the base URL is split on `://` and the first `/`
//! after the host. Known limitations: no percent-decoding, no query string
//! handling, no IPv6 literals and no explicit `:port` (the port always comes
//! from the scheme, so `host:8080` ends up in the `Host` header verbatim).

use super::error::HeartbeatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn is_tls(self) -> bool {
        self == Scheme::Https
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Where a heartbeat is sent; lives for a single check invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
    pub port: u16,
}

/// Split a URL into scheme, host, path and port
///
/// # Examples
/// - `https://hackatime.hackclub.com/api/hackatime/v1` → https, `hackatime.hackclub.com`, `/api/hackatime/v1`, 443
/// - `http://localhost` → http, `localhost`, `/`, 80
pub fn parse_endpoint(url: &str) -> Result<ParsedEndpoint, HeartbeatError> {
    let protocol_end = url
        .find("://")
        .ok_or_else(|| HeartbeatError::MalformedUrl("missing protocol".to_string()))?;

    let rest = &url[protocol_end + 3..];
    let (host, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };

    let scheme = if url.starts_with("https://") {
        Scheme::Https
    } else {
        Scheme::Http
    };

    Ok(ParsedEndpoint {
        scheme,
        host: host.to_string(),
        path: path.to_string(),
        port: scheme.default_port(),
    })
}

/// Build the heartbeat URL: normalize(base_url) + heartbeat_path
///
/// Trailing slashes on the base are trimmed so `https://x/api/` and
/// `https://x/api` produce the same target.
pub fn build_heartbeat_url(base_url: &str, heartbeat_path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), heartbeat_path)
}

/// Parse the heartbeat target, rejecting URLs without a host
pub fn heartbeat_endpoint(
    base_url: &str,
    heartbeat_path: &str,
) -> Result<ParsedEndpoint, HeartbeatError> {
    let endpoint = parse_endpoint(&build_heartbeat_url(base_url, heartbeat_path))?;
    if endpoint.host.is_empty() {
        return Err(HeartbeatError::MalformedUrl("missing host".to_string()));
    }
    Ok(endpoint)
}
