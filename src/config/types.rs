use serde::{Deserialize, Serialize};

/// User configuration (config.toml); every key is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-step bound for connect, TLS handshake, send and receive
    pub timeout_secs: u64,
    /// Oldest acceptable Node.js major version
    pub min_node_major: u64,
    /// Files that must exist in the project root
    pub required_files: Vec<String>,
    /// Appended to HACKATIME_API_URL to form the heartbeat endpoint
    pub heartbeat_path: String,
    /// Port to connect to instead of 443/80; set this for self-hosted servers
    /// listening elsewhere, since a port inside the URL is not interpreted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
