// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool configuration loaded from `config.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sync tool executable (name resolved through PATH, or a path)
    pub tool: String,
    pub state_dir: PathBuf,
    /// One lock file per running job
    pub lock_dir: PathBuf,
    /// One log file per job
    pub log_dir: PathBuf,
    /// Job/task store
    pub store: PathBuf,
    /// Grace period between SIGTERM and SIGKILL when cancelling
    pub kill_timeout: Duration,
    /// Upper bound on the tool version check during validation
    pub version_timeout: Duration,
}

/// On-disk shape: every key optional, relative paths resolved against the
/// state directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    tool: Option<String>,
    lock_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    store: Option<PathBuf>,
    kill_timeout_ms: Option<u64>,
    version_timeout_ms: Option<u64>,
}

impl Config {
    pub const DEFAULT_TOOL: &'static str = "rsync";

    /// Defaults rooted at `state_dir`.
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            tool: Self::DEFAULT_TOOL.to_string(),
            lock_dir: state_dir.join("locks"),
            log_dir: state_dir.join("logs"),
            store: state_dir.join("jobs.json"),
            kill_timeout: Duration::from_secs(5),
            version_timeout: Duration::from_secs(10),
            state_dir,
        }
    }

    /// Load using the environment: resolve the state dir, then read the
    /// config file if present.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = crate::env::state_dir()?;
        let path = crate::env::config_path(&state_dir);
        Self::load_from(state_dir, &path)
    }

    /// Defaults for `state_dir` overlaid with the file at `path`. A missing
    /// file yields the defaults.
    pub fn load_from(state_dir: impl Into<PathBuf>, path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::for_state_dir(state_dir);
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(config);
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        let file: ConfigFile = toml::from_str(&text)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })?;
        config.apply(file);
        Ok(config)
    }

    fn apply(&mut self, file: ConfigFile) {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { self.state_dir.join(p) };
        let lock_dir = file.lock_dir.map(resolve);
        let log_dir = file.log_dir.map(resolve);
        let store = file.store.map(resolve);
        if let Some(tool) = file.tool.filter(|t| !t.trim().is_empty()) {
            self.tool = tool;
        }
        if let Some(dir) = lock_dir {
            self.lock_dir = dir;
        }
        if let Some(dir) = log_dir {
            self.log_dir = dir;
        }
        if let Some(path) = store {
            self.store = path;
        }
        if let Some(ms) = file.kill_timeout_ms {
            self.kill_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.version_timeout_ms {
            self.version_timeout = Duration::from_millis(ms);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
