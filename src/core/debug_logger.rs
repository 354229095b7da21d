// JSON Lines debug log for diagnosing check runs
//
// Disabled unless HACKATIME_DOCTOR_DEBUG is set. Writes never fail a check.
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::types::parse_env_flag;

pub const DEBUG_ENV: &str = "HACKATIME_DOCTOR_DEBUG";

const LOG_ROTATION_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_ARCHIVES: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub component: String,
    pub event: String,
    pub message: String,
    pub correlation_id: String,
    pub fields: HashMap<String, Value>,
}

/// Append-only log file that is gzipped away once it grows past the limit
struct LogFile {
    path: PathBuf,
}

impl LogFile {
    fn new(path: PathBuf) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Self { path }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        // Rotation is checked once per write; a doctor run writes a few dozen lines
        let _ = self.rotate_if_needed();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.is_oversized() {
            return Ok(());
        }

        let lock_path = self.path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;

        // Another process holds the lock and is already rotating
        if lock.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.is_oversized() {
            self.archive_current()
        } else {
            Ok(())
        };
        let _ = std::fs::remove_file(&lock_path);
        result
    }

    fn is_oversized(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|meta| meta.len() >= LOG_ROTATION_SIZE_BYTES)
            .unwrap_or(false)
    }

    fn archive_current(&self) -> std::io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let stem = self.stem();
        let archive = dir.join(format!("{}.{}.gz", stem, Local::now().format("%Y%m%d_%H%M%S")));

        let staging = self.path.with_extension("rotating");
        std::fs::rename(&self.path, &staging)?;

        let mut encoder = GzEncoder::new(File::create(&archive)?, Compression::default());
        std::io::copy(&mut BufReader::new(File::open(&staging)?), &mut encoder)?;
        encoder.finish()?;
        std::fs::remove_file(&staging)?;

        self.prune_archives(dir, &stem)
    }

    fn prune_archives(&self, dir: &Path, stem: &str) -> std::io::Result<()> {
        let prefix = format!("{}.", stem);
        let mut archives: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.starts_with(&prefix) && name.ends_with(".gz")
            })
            .filter_map(|entry| {
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((entry.path(), modified))
            })
            .collect();

        archives.sort_by_key(|(_, modified)| *modified);
        let excess = archives.len().saturating_sub(MAX_ARCHIVES);
        for (path, _) in archives.into_iter().take(excess) {
            let _ = std::fs::remove_file(path);
        }
        Ok(())
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "debug".to_string())
    }
}

pub struct DebugLogger {
    enabled: bool,
    file: Option<Mutex<LogFile>>,
    session_id: String,
    redaction_patterns: Vec<Regex>,
}

impl DebugLogger {
    /// Logger configured from the environment
    pub fn new() -> Self {
        if parse_env_flag(DEBUG_ENV) {
            Self::with_path(Self::default_log_path())
        } else {
            Self::disabled()
        }
    }

    /// Enabled logger writing to an explicit path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            enabled: true,
            file: Some(Mutex::new(LogFile::new(path))),
            session_id: Self::new_session_id(),
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            file: None,
            session_id: Self::new_session_id(),
            redaction_patterns: Vec::new(),
        }
    }

    pub fn default_log_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".hackatime-doctor");
        path.push("debug.log");
        path
    }

    fn new_session_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        [
            r"(?i)authorization[:\s]+(bearer\s+)?[^\s]+",
            r"(?i)bearer\s+[^\s]+",
            r"(?i)api[_-]?key[=:\s]+[^\s]+",
            r"(?i)token[=:\s]+[^\s]+",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    }

    pub fn redact(&self, text: &str) -> String {
        self.redaction_patterns
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, "[REDACTED]").to_string())
    }

    fn log(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        fields: HashMap<String, Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact(message),
            correlation_id: self.session_id.clone(),
            fields,
        };

        if let (Some(file), Ok(line)) = (&self.file, serde_json::to_string(&entry)) {
            if let Ok(file) = file.lock() {
                let _ = file.append(&line);
            }
        }
    }

    pub fn debug(&self, component: &str, event: &str, message: &str) {
        self.log("DEBUG", component, event, message, HashMap::new());
    }

    pub fn error(&self, component: &str, event: &str, message: &str) {
        self.log("ERROR", component, event, message, HashMap::new());
    }

    pub fn check_start(&self, check_name: &str) {
        let mut fields = HashMap::new();
        fields.insert("check".to_string(), Value::String(check_name.to_string()));
        self.log("CHECK", "Doctor", "check_start", &format!("Running {}", check_name), fields);
    }

    pub fn check_end(&self, check_name: &str, success: bool, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("check".to_string(), Value::String(check_name.to_string()));
        fields.insert("success".to_string(), Value::Bool(success));
        fields.insert("duration_ms".to_string(), Value::Number(duration_ms.into()));
        self.log(
            "CHECK",
            "Doctor",
            "check_end",
            &format!("{} {} ({}ms)", check_name, if success { "passed" } else { "failed" }, duration_ms),
            fields,
        );
    }

    /// Heartbeat state machine transition
    pub fn heartbeat_stage(&self, stage: &str, detail: &str) {
        let mut fields = HashMap::new();
        fields.insert("stage".to_string(), Value::String(stage.to_string()));
        self.log("NETWORK", "HeartbeatCheck", stage, detail, fields);
    }

    /// Credential summary; the URL and key are only described by length
    pub fn credential_info_safe(&self, scheme: &str, url_length: usize, key_length: usize) {
        let mut fields = HashMap::new();
        fields.insert("scheme".to_string(), Value::String(scheme.to_string()));
        fields.insert("url_length".to_string(), Value::Number(url_length.into()));
        fields.insert("key_length".to_string(), Value::Number(key_length.into()));
        self.log(
            "CRED",
            "HeartbeatCheck",
            "credentials_loaded",
            &format!(
                "Using {} API URL ({} chars, key {} chars)",
                scheme, url_length, key_length
            ),
            fields,
        );
    }

    pub fn response_truncated(&self, budget: usize) {
        let mut fields = HashMap::new();
        fields.insert("budget_bytes".to_string(), Value::Number(budget.into()));
        self.log(
            "NETWORK",
            "HeartbeatClient",
            "response_truncated",
            "Response head exceeded the read budget; classifying the partial head",
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn get_debug_logger() -> DebugLogger {
    DebugLogger::new()
}
