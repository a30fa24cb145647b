//! Logging for the Umami CLI
//!
//! Events go to stderr or, with `UMAMI_LOG_FILE`, to a file through a
//! non-blocking writer. Stdout is reserved for command output; log events
//! never go there.
//!
//! Also provides the per-invocation request id, redaction of tokens and
//! passwords, and drop timers around config loading and command execution.

use crate::error::{Error, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Request id of this invocation, set once the subscriber is installed
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Level used at `-vv`; connection pool chatter drowns out request events
const DEBUG_DIRECTIVES: &str = "debug,hyper_util=info,rustls=info";

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// Adds file and line of each event
    Full,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives
    pub level: String,
    pub format: LogFormat,
    /// Colors when stderr is a terminal
    pub console: bool,
    /// Log to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// 0 warn, 1 info, 2 debug, 3+ trace with full event layout
    pub fn from_verbosity(verbosity: u8) -> Self {
        let (level, format) = match verbosity {
            0 => ("warn", LogFormat::Compact),
            1 => ("info", LogFormat::Compact),
            2 => (DEBUG_DIRECTIVES, LogFormat::Compact),
            _ => ("trace", LogFormat::Full),
        };
        Self {
            level: level.to_string(),
            format,
            ..Self::default()
        }
    }

    /// Apply `RUST_LOG`, `UMAMI_LOG_FORMAT` and `UMAMI_LOG_FILE`
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    pub fn merge_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(rust_log) = var("RUST_LOG").filter(|v| !v.is_empty()) {
            self.level = rust_log;
        }

        if let Some(format) = var("UMAMI_LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "compact" => self.format = LogFormat::Compact,
                "full" => self.format = LogFormat::Full,
                "json" => self.format = LogFormat::Json,
                _ => eprintln!("Warning: invalid UMAMI_LOG_FORMAT '{}', using default", format),
            }
        }

        if let Some(file) = var("UMAMI_LOG_FILE").filter(|f| !f.is_empty()) {
            self.file = Some(PathBuf::from(file));
        }
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the log file on drop and must be kept alive
/// until the process exits.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard, ansi) = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            (BoxMakeWriter::new(writer), Some(guard), false)
        }
        None => {
            let ansi = config.console && std::io::stderr().is_terminal();
            (BoxMakeWriter::new(std::io::stderr), None, ansi)
        }
    };

    let full = config.format == LogFormat::Full;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_file(full)
        .with_line_number(full);

    let installed = match config.format {
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish())
        }
        LogFormat::Full => tracing::subscriber::set_global_default(builder.with_ansi(ansi).finish()),
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
        }
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    if REQUEST_ID.set(request_id.clone()).is_err() {
        tracing::warn!("request id already set");
    }
    tracing::debug!(%request_id, level = %config.level, "Logging initialized");

    Ok(guard)
}

/// Open `path` for appending, creating its directory
///
/// Failures are configuration errors rather than panics.
fn open_log_file(path: &Path) -> Result<RollingFileAppender> {
    let (dir, name) = split_log_path(path)?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(&dir)
        .map_err(|e| Error::config(format!("cannot open log file {}: {}", path.display(), e)))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::config(format!("invalid log file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name))
}

pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Masking of tokens and passwords in logged text and JSON
pub mod redaction {
    use regex::Regex;
    use std::sync::OnceLock;

    static TOKEN_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static PASSWORD_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    fn token_pattern() -> Option<&'static Regex> {
        TOKEN_REGEX
            .get_or_init(|| {
                Regex::new(r#"(?i)(token|bearer|authorization)[=:\s]+['"]?([a-zA-Z0-9_.-]{10,})['"]?"#).ok()
            })
            .as_ref()
    }

    fn password_pattern() -> Option<&'static Regex> {
        PASSWORD_REGEX
            .get_or_init(|| Regex::new(r#"(?i)(password|passwd|pwd)[=:\s]+['"]?([^\s'"]{3,})['"]?"#).ok())
            .as_ref()
    }

    pub fn redact_sensitive(input: &str) -> String {
        let mut result = input.to_string();
        for regex in [token_pattern(), password_pattern()].into_iter().flatten() {
            result = regex.replace_all(&result, "$1=***").into_owned();
        }
        result
    }

    /// Replace values under credential-like keys and scrub strings
    pub fn redact_json_value(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = serde_json::Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            serde_json::Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            serde_json::Value::String(s) => *s = redact_sensitive(s),
            _ => {}
        }
    }

    fn is_sensitive_key(key: &str) -> bool {
        let key = key.to_lowercase();
        ["token", "password", "passwd", "secret", "auth"]
            .iter()
            .any(|needle| key.contains(needle))
    }
}

pub mod timing {
    use std::time::Instant;
    use tracing::{field, Span};

    /// Logs the duration of an operation when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::build(operation, "")
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::build(operation, details)
        }

        fn build(operation: &str, details: &str) -> Self {
            let span = tracing::info_span!(
                "operation",
                operation,
                request_id = super::current_request_id().unwrap_or("unknown"),
                details,
                duration_ms = field::Empty,
            );
            Self {
                start: Instant::now(),
                span,
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration_ms = self.start.elapsed().as_millis() as u64;
            self.span.record("duration_ms", duration_ms);
            tracing::debug!(operation = %self.operation, duration_ms, "Operation completed");
        }
    }
}
