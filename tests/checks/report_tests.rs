use hackatime_doctor::core::report::{debug_tip, JsonReporter, Reporter, TerminalReporter};
use hackatime_doctor::core::CheckResult;

fn sample_results() -> Vec<CheckResult> {
    vec![
        CheckResult::pass("git_check", "Git is installed"),
        CheckResult::fail("api_connection_check", "API request failed: HTTP/1.1 401 Unauthorized"),
    ]
}

fn render_plain(results: &[CheckResult]) -> String {
    let mut reporter = TerminalReporter::new(Vec::new(), false);
    reporter.begin();
    for result in results {
        reporter.record(result);
    }
    reporter.finish();
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[test]
fn test_terminal_summary_plain() {
    let output = render_plain(&sample_results());

    assert!(output.starts_with("⚕️ HackaTime Doctor"));
    assert!(output.contains("✓ [git_check] Git is installed"));
    assert!(output.contains("✗ [api_connection_check] API request failed: HTTP/1.1 401 Unauthorized"));
    assert!(output.contains("1/2 checks passed"));
    assert!(output.contains("Debug tips:"));
    assert!(output.contains("- api_connection_check: Export HACKATIME_API_KEY"));
    assert!(!output.contains("- git_check:"));
    assert!(!output.contains('\u{1b}'), "plain output must not contain ANSI escapes");
}

#[test]
fn test_no_tips_when_everything_passes() {
    let output = render_plain(&[CheckResult::pass("git_check", "Git is installed")]);
    assert!(output.contains("1/1 checks passed"));
    assert!(!output.contains("Debug tips"));
}

#[test]
fn test_colored_output_uses_ansi() {
    let mut reporter = TerminalReporter::new(Vec::new(), true);
    reporter.begin();
    reporter.record(&CheckResult::fail("git_check", "Git is not installed or not in PATH"));
    reporter.finish();
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains('\u{1b}'));
}

#[test]
fn test_json_reporter() {
    let mut reporter = JsonReporter::new(Vec::new());
    reporter.begin();
    for result in sample_results() {
        reporter.record(&result);
    }
    reporter.finish();

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let parsed: Vec<CheckResult> = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, sample_results());
}

#[test]
fn test_debug_tips_cover_every_check() {
    for name in [
        "git_check",
        "nodejs_check",
        "folder_structure_check",
        "api_connection_check",
    ] {
        assert!(debug_tip(name).is_some(), "no tip for {}", name);
    }
    assert!(debug_tip("unknown_check").is_none());
}
