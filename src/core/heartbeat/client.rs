/*!
Heartbeat request framing and the single request/response exchange.

The client is generic over any `Read + Write` stream so the exchange can run
over a [`Session`](super::transport::Session) in production and over an
in-memory stream in tests.

## Receive contract

The response is read with a bounded head read: bytes are collected into a
4096-byte budget until the header terminator `\r\n\r\n` shows up, the peer
closes, or the budget is full. The body is never drained. When the budget
fills before the terminator, [`RawResponse::truncated`] is set so the caller
can tell a clipped status block from a complete one.
*/

use std::io::{self, Read, Write};

use serde::Serialize;

use super::error::HeartbeatError;
use super::url::ParsedEndpoint;

/// Upper bound on bytes read from the server
pub const RESPONSE_BUDGET: usize = 4096;

pub const HEARTBEAT_ENTITY: &str = "hackatime-doctor-validate.txt";
pub const HEARTBEAT_LANGUAGE: &str = "Text";

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Clock abstraction so heartbeat timestamps are deterministic in tests
pub trait ClockTrait: Send + Sync {
    /// Seconds since the unix epoch
    fn unix_seconds(&self) -> i64;
}

#[derive(Default)]
pub struct SystemClock;

impl ClockTrait for SystemClock {
    fn unix_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// One synthetic activity event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartbeatPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub time: i64,
    pub entity: &'static str,
    pub language: &'static str,
}

impl HeartbeatPayload {
    pub fn new(time: i64) -> Self {
        Self {
            kind: "file",
            time,
            entity: HEARTBEAT_ENTITY,
            language: HEARTBEAT_LANGUAGE,
        }
    }

    /// JSON body: an array holding this single heartbeat
    pub fn to_body(&self) -> String {
        // Serializing a struct of plain fields cannot fail
        serde_json::to_string(&[self]).unwrap_or_default()
    }
}

/// Frame a `POST` with bearer auth; `Content-Length` is the body's byte length
pub fn build_request(endpoint: &ParsedEndpoint, api_key: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Authorization: Bearer {api_key}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {len}\r\n\
         \r\n\
         {body}",
        path = endpoint.path,
        host = endpoint.host,
        len = body.len(),
    )
}

/// Bytes captured from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub bytes: Vec<u8>,
    /// Budget exhausted before the header terminator was seen
    pub truncated: bool,
}

/// Send one heartbeat and capture the response head
///
/// The timestamp is taken from `clock` right before the request is framed.
pub fn send_heartbeat<S: Read + Write>(
    stream: &mut S,
    endpoint: &ParsedEndpoint,
    api_key: &str,
    clock: &dyn ClockTrait,
) -> Result<RawResponse, HeartbeatError> {
    let body = HeartbeatPayload::new(clock.unix_seconds()).to_body();
    let request = build_request(endpoint, api_key, &body);

    write_request(stream, request.as_bytes())?;
    read_response(stream)
}

fn write_request<S: Write>(stream: &mut S, request: &[u8]) -> Result<(), HeartbeatError> {
    match stream.write(request) {
        Ok(0) => {
            return Err(HeartbeatError::SendFailure(io::Error::new(
                io::ErrorKind::WriteZero,
                "zero bytes sent",
            )))
        }
        Ok(n) if n < request.len() => stream
            .write_all(&request[n..])
            .map_err(HeartbeatError::SendFailure)?,
        Ok(_) => {}
        Err(e) => return Err(HeartbeatError::SendFailure(e)),
    }
    stream.flush().map_err(HeartbeatError::SendFailure)
}

/// Bounded head read, see the module docs
pub fn read_response<S: Read>(stream: &mut S) -> Result<RawResponse, HeartbeatError> {
    let mut buf = vec![0u8; RESPONSE_BUDGET];
    let mut filled = 0;

    while filled < RESPONSE_BUDGET {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                if contains_terminator(&buf[..filled]) {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // Peer hung up without close_notify, or went quiet after sending
            // something; keep what arrived.
            Err(_) if filled > 0 => break,
            Err(e) => return Err(HeartbeatError::NoResponse(e.to_string())),
        }
    }

    if filled == 0 {
        return Err(HeartbeatError::NoResponse(
            "connection closed before any data".to_string(),
        ));
    }

    buf.truncate(filled);
    let truncated = filled == RESPONSE_BUDGET && !contains_terminator(&buf);
    Ok(RawResponse {
        bytes: buf,
        truncated,
    })
}

fn contains_terminator(bytes: &[u8]) -> bool {
    bytes
        .windows(HEADER_TERMINATOR.len())
        .any(|window| window == HEADER_TERMINATOR)
}
