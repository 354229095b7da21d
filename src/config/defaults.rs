use super::types::Config;
use crate::core::checks::{default_required_files, DEFAULT_MIN_NODE_MAJOR};
use crate::core::heartbeat::{DEFAULT_HEARTBEAT_PATH, DEFAULT_TIMEOUT};

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            min_node_major: DEFAULT_MIN_NODE_MAJOR,
            required_files: default_required_files(),
            heartbeat_path: DEFAULT_HEARTBEAT_PATH.to_string(),
            port: None,
        }
    }
}
