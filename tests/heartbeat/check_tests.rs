//! End-to-end runs of the API connection check against local servers

use std::fs;
use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hackatime_doctor::core::debug_logger::DebugLogger;
use hackatime_doctor::core::heartbeat::{
    live_sockets, HackatimeCredentials, HeartbeatCheck, HeartbeatError, SUCCESS_MESSAGE,
};
use hackatime_doctor::core::Check;
use serial_test::serial;

use crate::common::{content_length, spawn_one_shot_server, split_message, FixedClock, IsolatedEnv};

fn check_on_port(port: u16) -> HeartbeatCheck {
    HeartbeatCheck::new(Duration::from_secs(3), "/users/current/heartbeats")
        .with_port(Some(port))
        .with_clock(Box::new(FixedClock(1_700_000_000)))
        .with_logger(Arc::new(DebugLogger::disabled()))
}

#[test]
#[serial]
fn test_created_response_passes() {
    let env = IsolatedEnv::new();
    let (port, server) =
        spawn_one_shot_server(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n");
    env.set_credentials("http://127.0.0.1/api/hackatime/v1/", "test-key");

    let result = check_on_port(port).run();

    assert!(result.success, "unexpected failure: {}", result.message);
    assert_eq!(result.message, SUCCESS_MESSAGE);
    assert_eq!(result.check_name, "api_connection_check");

    let request = server.join().unwrap();
    let (head, body) = split_message(&request);
    assert!(head.starts_with("POST /api/hackatime/v1/users/current/heartbeats HTTP/1.1\r\n"));
    assert!(head.contains("\r\nHost: 127.0.0.1\r\n"));
    assert!(head.contains("\r\nAuthorization: Bearer test-key\r\n"));
    assert!(head.contains("\r\nContent-Type: application/json"));
    assert_eq!(content_length(&head), Some(body.len()));
    assert!(body.contains("\"time\":1700000000"));
}

#[test]
#[serial]
fn test_unauthorized_response_fails_with_head() {
    let env = IsolatedEnv::new();
    let (port, server) =
        spawn_one_shot_server(b"HTTP/1.1 401 Unauthorized\r\n\r\n{\"error\":\"bad token\"}");
    env.set_credentials("http://127.0.0.1", "wrong-key");

    let result = check_on_port(port).run();

    assert!(!result.success);
    assert_eq!(result.message, "API request failed: HTTP/1.1 401 Unauthorized");
    server.join().unwrap();
}

#[test]
#[serial]
fn test_missing_credentials_skip_network() {
    let _env = IsolatedEnv::new();
    let before = live_sockets();

    let result = check_on_port(1).run();

    assert!(!result.success);
    assert!(result.message.contains("HACKATIME_API_KEY"));
    assert!(result.message.contains("HACKATIME_API_URL"));
    assert_eq!(live_sockets(), before);
}

#[test]
#[serial]
fn test_only_url_missing() {
    let _env = IsolatedEnv::new();
    std::env::set_var("HACKATIME_API_KEY", "k");

    let result = check_on_port(1).run();

    assert!(!result.success);
    assert!(result.message.contains("HACKATIME_API_URL"));
    assert!(!result.message.contains("HACKATIME_API_KEY"));
}

#[test]
#[serial]
fn test_malformed_url() {
    let env = IsolatedEnv::new();
    env.set_credentials("hackatime.hackclub.com/api", "k");

    let result = check_on_port(1).run();

    assert!(!result.success);
    assert_eq!(result.message, "Invalid API URL format (missing protocol)");
}

#[test]
#[serial]
fn test_unresolvable_host_releases_everything() {
    let before = live_sockets();
    let creds = HackatimeCredentials {
        api_key: "k".to_string(),
        api_url: "https://does-not-exist.invalid/api".to_string(),
    };

    let check = HeartbeatCheck::new(Duration::from_secs(2), "/users/current/heartbeats")
        .with_logger(Arc::new(DebugLogger::disabled()));
    let err = check.run_with(&creds).unwrap_err();

    assert!(matches!(err, HeartbeatError::ResolutionFailure { .. }));
    assert!(err.to_string().starts_with("Host resolution failed"));
    assert_eq!(live_sockets(), before);
}

#[test]
#[serial]
fn test_silent_server_is_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        if let Ok((mut sock, _)) = listener.accept() {
            // Take the request, then hang up without answering
            let mut buf = [0u8; 4096];
            let _ = sock.set_read_timeout(Some(Duration::from_secs(2)));
            let _ = sock.read(&mut buf);
        }
    });

    let before = live_sockets();
    let creds = HackatimeCredentials {
        api_key: "k".to_string(),
        api_url: "http://127.0.0.1".to_string(),
    };
    let err = check_on_port(port).run_with(&creds).unwrap_err();

    assert!(matches!(err, HeartbeatError::NoResponse(_)), "got {:?}", err);
    assert_eq!(live_sockets(), before);
    server.join().unwrap();
}

#[test]
#[serial]
fn test_tls_against_plain_server_is_handshake_failure() {
    let (port, server) = spawn_one_shot_server(b"HTTP/1.1 400 Bad Request\r\n\r\n");
    let before = live_sockets();
    let creds = HackatimeCredentials {
        api_key: "k".to_string(),
        api_url: "https://localhost".to_string(),
    };

    let err = check_on_port(port).run_with(&creds).unwrap_err();

    assert!(matches!(err, HeartbeatError::HandshakeFailure { .. }), "got {:?}", err);
    assert_eq!(live_sockets(), before);
    let _ = server.join();
}

#[test]
#[serial]
fn test_debug_log_never_contains_api_url() {
    let env = IsolatedEnv::new();
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("debug.log");
    let logger = Arc::new(DebugLogger::with_path(log_path.clone()));

    // Gets past the credential and endpoint stages, then fails to resolve
    env.set_credentials("https://secret-tenant.does-not-exist.invalid/api/private", "k");
    let failed = HeartbeatCheck::new(Duration::from_secs(2), "/users/current/heartbeats")
        .with_logger(logger.clone())
        .run();
    assert!(!failed.success);

    let (port, server) = spawn_one_shot_server(b"HTTP/1.1 201 Created\r\n\r\n");
    env.set_credentials("http://127.0.0.1/api/private-tenant", "k");
    let passed = check_on_port(port).with_logger(logger).run();
    assert!(passed.success, "unexpected failure: {}", passed.message);
    server.join().unwrap();

    let raw = fs::read_to_string(&log_path).unwrap();
    assert!(raw.contains("credentials_loaded"));
    assert!(raw.contains("resolution_failure"));
    assert!(raw.contains("response_received"));
    assert!(!raw.contains("secret-tenant"));
    assert!(!raw.contains("/api/private"));
    assert!(!raw.contains("127.0.0.1"));
}
