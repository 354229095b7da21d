//! Hackatime credentials from the process environment
//!
//! Both `HACKATIME_API_KEY` and `HACKATIME_API_URL` must be set; empty strings
//! are treated as missing. Both values are opaque: they are checked for presence
//! and used for the request, never logged.

use std::env;
use std::fmt;

use super::error::HeartbeatError;

pub const ENV_API_KEY: &str = "HACKATIME_API_KEY";
pub const ENV_API_URL: &str = "HACKATIME_API_URL";

#[derive(Clone)]
pub struct HackatimeCredentials {
    pub api_key: String,
    pub api_url: String,
}

// Keep both values out of debug output
impl fmt::Debug for HackatimeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HackatimeCredentials")
            .field("api_key", &format_args!("[REDACTED {} chars]", self.api_key.len()))
            .field("api_url", &format_args!("[REDACTED {} chars]", self.api_url.len()))
            .finish()
    }
}

impl HackatimeCredentials {
    /// Read both variables from the process environment
    pub fn from_env() -> Result<Self, HeartbeatError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary lookup
    ///
    /// Missing names are reported key first, then URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HeartbeatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read(ENV_API_KEY);
        let api_url = read(ENV_API_URL);

        match (api_key, api_url) {
            (Some(api_key), Some(api_url)) => Ok(Self { api_key, api_url }),
            (api_key, api_url) => {
                let mut missing = Vec::new();
                if api_key.is_none() {
                    missing.push(ENV_API_KEY);
                }
                if api_url.is_none() {
                    missing.push(ENV_API_URL);
                }
                Err(HeartbeatError::MissingCredentials(missing))
            }
        }
    }
}
