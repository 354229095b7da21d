//! The API connection check
//!
//! Linear, single attempt:
//! credentials → endpoint → session (+TLS) → request → response → verdict.
//! The first failing stage ends the check with its typed error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustls::ClientConfig;

use super::classify::classify_response;
use super::client::{send_heartbeat, ClockTrait, SystemClock, RESPONSE_BUDGET};
use super::credential::HackatimeCredentials;
use super::error::HeartbeatError;
use super::transport::Session;
use super::url::heartbeat_endpoint;
use crate::core::debug_logger::DebugLogger;
use crate::core::runner::Check;
use crate::core::types::{check_names, CheckResult};

pub const DEFAULT_HEARTBEAT_PATH: &str = "/users/current/heartbeats";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HeartbeatCheck {
    timeout: Duration,
    heartbeat_path: String,
    port: Option<u16>,
    tls_config: Option<Arc<ClientConfig>>,
    clock: Box<dyn ClockTrait>,
    logger: Arc<DebugLogger>,
}

impl HeartbeatCheck {
    pub fn new(timeout: Duration, heartbeat_path: impl Into<String>) -> Self {
        Self {
            timeout,
            heartbeat_path: heartbeat_path.into(),
            port: None,
            tls_config: None,
            clock: Box::new(SystemClock),
            logger: Arc::new(DebugLogger::disabled()),
        }
    }

    /// Connect to `port` instead of the scheme default (URLs cannot carry one)
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Trust a caller-built TLS config instead of the bundled roots
    #[cfg(test)]
    pub(crate) fn with_tls_config(mut self, config: Arc<ClientConfig>) -> Self {
        self.tls_config = Some(config);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn ClockTrait>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: Arc<DebugLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the exchange with already resolved credentials
    ///
    /// Returns the confirmation message on a 2xx status line.
    pub fn run_with(&self, creds: &HackatimeCredentials) -> Result<String, HeartbeatError> {
        let started = Instant::now();

        // Host and path come from the API URL, so only the scheme and port are logged
        let mut endpoint = heartbeat_endpoint(&creds.api_url, &self.heartbeat_path)?;
        if let Some(port) = self.port {
            endpoint.port = port;
        }
        self.logger.credential_info_safe(
            endpoint.scheme.as_str(),
            creds.api_url.len(),
            creds.api_key.len(),
        );
        self.logger.heartbeat_stage(
            "url_parsed",
            &format!("{} port {}", endpoint.scheme.as_str(), endpoint.port),
        );

        let mut session = match &self.tls_config {
            Some(config) if endpoint.scheme.is_tls() => Session::open_with(
                &endpoint.host,
                endpoint.port,
                Some(Arc::clone(config)),
                self.timeout,
            )?,
            _ => Session::open(
                &endpoint.host,
                endpoint.port,
                endpoint.scheme.is_tls(),
                self.timeout,
            )?,
        };
        self.logger.heartbeat_stage(
            if session.is_tls() { "tls_established" } else { "connected" },
            &format!("port {}", session.peer_addr().port()),
        );

        let response = send_heartbeat(&mut session, &endpoint, &creds.api_key, self.clock.as_ref())?;
        drop(session);
        self.logger.heartbeat_stage(
            "response_received",
            &format!(
                "{} bytes in {}ms",
                response.bytes.len(),
                started.elapsed().as_millis()
            ),
        );
        if response.truncated {
            self.logger.response_truncated(RESPONSE_BUDGET);
        }

        let verdict = classify_response(&response.bytes);
        self.logger.heartbeat_stage(
            "classified",
            &format!("status={:?} success={}", verdict.status_code, verdict.success),
        );

        if verdict.success {
            Ok(verdict.message)
        } else {
            Err(HeartbeatError::ApiRejected(verdict.message))
        }
    }
}

impl Default for HeartbeatCheck {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_HEARTBEAT_PATH)
    }
}

impl Check for HeartbeatCheck {
    fn name(&self) -> &'static str {
        check_names::API_CONNECTION
    }

    fn run(&self) -> CheckResult {
        let outcome = HackatimeCredentials::from_env().and_then(|creds| self.run_with(&creds));

        match outcome {
            Ok(message) => CheckResult::pass(self.name(), message),
            Err(e) => {
                // Error text can carry the host; the log gets the stage only
                self.logger.error(
                    "HeartbeatCheck",
                    e.stage(),
                    &format!("Heartbeat check failed at {}", e.stage()),
                );
                CheckResult::fail(self.name(), e.to_string())
            }
        }
    }
}
