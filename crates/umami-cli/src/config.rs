//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - The persisted config file (`<config dir>/umami-cli/config.json`)
//! - Environment variables (`UMAMI_URL`, `UMAMI_TOKEN`)
//! - Command-line arguments (`--endpoint`, `--token`)

use crate::error::{Error, ErrorContext, Result};
use crate::logging::redaction;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use umami_core::normalize_endpoint;

/// Directory below the user config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "umami-cli";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Persisted CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API endpoint, normalized to end in `/api` once loaded
    pub endpoint: String,

    /// Bearer token saved by `auth login`
    pub token: String,
}

/// Storage backend for [`Config`]
pub trait ConfigStore {
    /// Read the stored config; a missing store yields the default config
    fn load(&self) -> Result<Config>;

    /// Persist the config
    fn save(&self, config: &Config) -> Result<()>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `path`, or at the default location when `None`
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(Self::default_path()?)),
        }
    }

    /// `<config dir>/umami-cli/config.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::config("could not determine user config directory"))
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Config> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| Error::config(format!("invalid config file: {}", e)))
    }

    fn save(&self, config: &Config) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;

        if let Some(parent) = self.path.parent() {
            create_private_dir(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        write_private_file(&self.path, content.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)
}

impl Config {
    /// Load from `store`, apply overrides and resolve the endpoint
    ///
    /// Non-empty overrides replace stored values. The endpoint must be set by
    /// one of the sources and is normalized to end in `/api`.
    pub fn load(
        store: &dyn ConfigStore,
        endpoint: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        let mut config = store.load()?;
        config.apply_overrides(endpoint, token);
        config.resolve()?;

        debug!(
            config = %redacted(&config),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Replace fields with non-empty overrides
    pub fn apply_overrides(&mut self, endpoint: Option<&str>, token: Option<&str>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
            self.endpoint = endpoint.to_string();
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token.to_string();
        }
    }

    /// Require an endpoint and normalize it
    pub fn resolve(&mut self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::config("missing endpoint: set --endpoint or UMAMI_URL"));
        }
        self.endpoint = normalize_endpoint(&self.endpoint);
        Ok(())
    }

    /// Token, if one is set
    pub fn token(&self) -> Option<&str> {
        Some(self.token.as_str()).filter(|t| !t.is_empty())
    }
}

fn redacted(config: &Config) -> String {
    let mut value = serde_json::to_value(config).unwrap_or_default();
    redaction::redact_json_value(&mut value);
    value.to_string()
}

/// In-memory store that records every save
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    pub initial: Config,
    pub saved: std::sync::Mutex<Vec<Config>>,
}

#[cfg(test)]
impl MemoryConfigStore {
    pub fn with(initial: Config) -> Self {
        Self {
            initial,
            saved: Default::default(),
        }
    }

    pub fn saves(&self) -> Vec<Config> {
        self.saved.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Config> {
        Ok(self.initial.clone())
    }

    fn save(&self, config: &Config) -> Result<()> {
        self.saved.lock().unwrap().push(config.clone());
        Ok(())
    }
}
