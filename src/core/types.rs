// Core types shared by every check
use serde::{Deserialize, Serialize};

/// Outcome of a single environment check
///
/// Produced exactly once per check invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,
    pub message: String,
    pub check_name: String,
}

impl CheckResult {
    pub fn pass(check_name: &str, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            check_name: check_name.to_string(),
        }
    }

    pub fn fail(check_name: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            check_name: check_name.to_string(),
        }
    }
}

/// Check identifiers, also used as keys for remediation tips
pub mod check_names {
    pub const GIT: &str = "git_check";
    pub const NODEJS: &str = "nodejs_check";
    pub const FOLDER_STRUCTURE: &str = "folder_structure_check";
    pub const API_CONNECTION: &str = "api_connection_check";
}

/// Parse boolean-ish environment variables
///
/// Accepts true/false, 1/0, yes/no, on/off (case insensitive). Anything else,
/// including an unset variable, is false.
pub fn parse_env_flag(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}
