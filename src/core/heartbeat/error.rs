//! Failure taxonomy for the API connection check
//!
//! Every variant names the stage that failed. The `Display` text is what the
//! user sees in the check summary, so it carries enough context to
//! self-diagnose (missing variable names, truncated server response) but never
//! the API key itself.

use std::io;

/// Page where users obtain their hackatime credentials
pub const SETUP_URL: &str = "https://hackatime.hackclub.com/my/wakatime_setup";

#[derive(Debug, thiserror::Error)]
pub enum HeartbeatError {
    #[error("Missing environment variables:{}\nGet them from: {}", format_missing(.0), SETUP_URL)]
    MissingCredentials(Vec<&'static str>),

    #[error("Invalid API URL format ({0})")]
    MalformedUrl(String),

    #[error("Host resolution failed for {host}: {reason}")]
    ResolutionFailure { host: String, reason: String },

    #[error("Connection failed to {addr}: {source}")]
    ConnectionFailure {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("TLS setup failed: {0}")]
    TlsSetup(String),

    #[error("SSL handshake failed with {host}: {reason}")]
    HandshakeFailure { host: String, reason: String },

    #[error("Failed to send heartbeat: {0}")]
    SendFailure(#[source] io::Error),

    #[error("No response from server ({0})")]
    NoResponse(String),

    #[error("API request failed: {0}")]
    ApiRejected(String),
}

impl HeartbeatError {
    /// Short stage tag used as the debug log event name
    pub fn stage(&self) -> &'static str {
        match self {
            HeartbeatError::MissingCredentials(_) => "missing_credentials",
            HeartbeatError::MalformedUrl(_) => "malformed_url",
            HeartbeatError::ResolutionFailure { .. } => "resolution_failure",
            HeartbeatError::ConnectionFailure { .. } => "connection_failure",
            HeartbeatError::TlsSetup(_) => "tls_setup",
            HeartbeatError::HandshakeFailure { .. } => "handshake_failure",
            HeartbeatError::SendFailure(_) => "send_failure",
            HeartbeatError::NoResponse(_) => "no_response",
            HeartbeatError::ApiRejected(_) => "api_rejected",
        }
    }
}

fn format_missing(names: &[&'static str]) -> String {
    names.iter().map(|name| format!("\n  - {name}")).collect()
}
