//! Hackatime API connection check
//!
//! Sends one synthetic heartbeat over a hand-built HTTP/1.1 request on a raw
//! TCP (optionally TLS) session and classifies the status line:
//! - `url`: base URL → scheme/host/path/port
//! - `transport`: RAII socket + TLS session with bounded timeouts
//! - `client`: request framing and the bounded response read
//! - `classify`: 2xx status line → pass, otherwise the response head
//! - `check`: the orchestration exposed to the check runner

pub mod check;
pub mod classify;
pub mod client;
pub mod credential;
pub mod error;
pub mod transport;
pub mod url;


pub use check::{HeartbeatCheck, DEFAULT_HEARTBEAT_PATH, DEFAULT_TIMEOUT};
pub use classify::{classify_response, Verdict, SUCCESS_MESSAGE};
pub use client::{build_request, send_heartbeat, ClockTrait, HeartbeatPayload, RawResponse, SystemClock};
pub use credential::{HackatimeCredentials, ENV_API_KEY, ENV_API_URL};
pub use error::HeartbeatError;
pub use transport::{live_sockets, Session};
pub use url::{parse_endpoint, ParsedEndpoint, Scheme};
