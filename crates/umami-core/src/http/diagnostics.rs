//! Opt-in request diagnostics
//!
//! When enabled, the transport writes one line before each request and one
//! after each response to a diagnostics sink (stderr unless injected). The
//! lines describe whether a token is present and its length, never its value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Diagnostics settings passed into transport construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Emit request/response lines to the diagnostics sink
    pub debug: bool,
}

impl DiagnosticsConfig {
    pub fn enabled() -> Self {
        Self { debug: true }
    }

    /// Interpret a raw `DEBUG` environment value
    ///
    /// Only a case-insensitive `true` (surrounding whitespace ignored) enables
    /// diagnostics.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let debug = value
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { debug }
    }
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Diagnostics writer shared between a transport and its token clones
#[derive(Clone)]
pub struct Diagnostics {
    config: DiagnosticsConfig,
    sink: Sink,
}

impl Diagnostics {
    /// Diagnostics writing to stderr
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self::with_sink(config, io::stderr())
    }

    /// Diagnostics disabled
    pub fn disabled() -> Self {
        Self::new(DiagnosticsConfig::default())
    }

    /// Diagnostics writing to a custom sink
    pub fn with_sink(config: DiagnosticsConfig, sink: impl Write + Send + 'static) -> Self {
        Self {
            config,
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    pub fn config(&self) -> DiagnosticsConfig {
        self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.debug
    }

    /// Write a `debug: ` prefixed line if enabled
    pub fn emit(&self, line: impl fmt::Display) {
        if !self.is_enabled() {
            return;
        }
        // A poisoned or failing sink must not fail the request
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "debug: {}", line);
            let _ = sink.flush();
        }
    }

    pub(crate) fn request(&self, method: &str, url: &str, auth: bool, token: Option<&str>) {
        let token_len = token.map(str::len).unwrap_or(0);
        self.emit(format_args!(
            "http request method={} url={} auth={} token-set={} token-len={}",
            method,
            url,
            auth,
            token_len > 0,
            token_len
        ));
    }

    pub(crate) fn response(&self, status: u16, url: &str) {
        self.emit(format_args!("http response status={} url={}", status, url));
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// In-memory sink whose contents can be read back, for tests and captures
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "buffer lock poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
