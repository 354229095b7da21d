//! Response classification
//!
//! Only the status line decides the verdict: `HTTP/1.<minor> <code>` with a
//! 2xx code. A `HTTP/1.1 20` that happens to appear in a header or body does
//! not count.

pub const SUCCESS_MESSAGE: &str = "Heartbeat sent successfully, hackatime is working!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    /// Fixed confirmation on success, response head on failure
    pub message: String,
    /// Status code when the status line could be parsed
    pub status_code: Option<u16>,
}

/// Decide pass/fail from raw response bytes
pub fn classify_response(raw: &[u8]) -> Verdict {
    let text = String::from_utf8_lossy(raw);
    let status_code = parse_status_code(&text);

    if matches!(status_code, Some(200..=299)) {
        return Verdict {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            status_code,
        };
    }

    Verdict {
        success: false,
        message: response_head(&text).to_string(),
        status_code,
    }
}

/// Response up to (not including) the first blank line
pub fn response_head(text: &str) -> &str {
    match text.find("\r\n\r\n") {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Status code from an `HTTP/1.x NNN reason` status line
pub fn parse_status_code(text: &str) -> Option<u16> {
    let status_line = text.lines().next()?;
    let mut parts = status_line.split_whitespace();

    let version = parts.next()?;
    let minor = version.strip_prefix("HTTP/1.")?;
    if minor.len() != 1 || !minor.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}
