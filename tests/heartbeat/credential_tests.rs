use std::collections::HashMap;

use hackatime_doctor::core::heartbeat::{
    HackatimeCredentials, HeartbeatError, ENV_API_KEY, ENV_API_URL,
};
use serial_test::serial;

use crate::common::IsolatedEnv;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

fn missing_names(result: Result<HackatimeCredentials, HeartbeatError>) -> Vec<&'static str> {
    match result {
        Err(HeartbeatError::MissingCredentials(names)) => names,
        other => panic!("expected MissingCredentials, got {:?}", other),
    }
}

#[test]
fn test_both_present() {
    let creds = HackatimeCredentials::from_lookup(lookup(&[
        (ENV_API_KEY, "abc-123"),
        (ENV_API_URL, "https://hackatime.hackclub.com/api/hackatime/v1"),
    ]))
    .unwrap();

    assert_eq!(creds.api_key, "abc-123");
    assert_eq!(creds.api_url, "https://hackatime.hackclub.com/api/hackatime/v1");
}

#[test]
fn test_both_missing_lists_both() {
    let names = missing_names(HackatimeCredentials::from_lookup(lookup(&[])));
    assert_eq!(names, vec![ENV_API_KEY, ENV_API_URL]);
}

#[test]
fn test_one_missing_lists_only_that_one() {
    let names = missing_names(HackatimeCredentials::from_lookup(lookup(&[(
        ENV_API_URL,
        "https://example.com",
    )])));
    assert_eq!(names, vec![ENV_API_KEY]);

    let names = missing_names(HackatimeCredentials::from_lookup(lookup(&[(ENV_API_KEY, "k")])));
    assert_eq!(names, vec![ENV_API_URL]);
}

#[test]
fn test_blank_values_count_as_missing() {
    let names = missing_names(HackatimeCredentials::from_lookup(lookup(&[
        (ENV_API_KEY, "   "),
        (ENV_API_URL, ""),
    ])));
    assert_eq!(names, vec![ENV_API_KEY, ENV_API_URL]);
}

#[test]
fn test_missing_message_format() {
    let err = HeartbeatError::MissingCredentials(vec![ENV_API_KEY, ENV_API_URL]);
    assert_eq!(
        err.to_string(),
        "Missing environment variables:\n  - HACKATIME_API_KEY\n  - HACKATIME_API_URL\n\
         Get them from: https://hackatime.hackclub.com/my/wakatime_setup"
    );

    let err = HeartbeatError::MissingCredentials(vec![ENV_API_URL]);
    let message = err.to_string();
    assert!(message.contains("HACKATIME_API_URL"));
    assert!(!message.contains("HACKATIME_API_KEY"));
}

#[test]
fn test_debug_output_hides_both_values() {
    let creds = HackatimeCredentials {
        api_key: "super-secret-token".to_string(),
        api_url: "https://example.com".to_string(),
    };
    let debug = format!("{:?}", creds);
    assert!(!debug.contains("super-secret-token"));
    assert!(!debug.contains("example.com"));
    assert!(debug.contains("18 chars"));
    assert!(debug.contains("19 chars"));
}

#[test]
#[serial]
fn test_from_env() {
    let env = IsolatedEnv::new();
    assert!(HackatimeCredentials::from_env().is_err());

    env.set_credentials("https://example.com", "env-key");
    let creds = HackatimeCredentials::from_env().unwrap();
    assert_eq!(creds.api_key, "env-key");
    assert_eq!(creds.api_url, "https://example.com");
}
