// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Resolve state directory: SJ_STATE_DIR > XDG_STATE_HOME/sj > ~/.local/state/sj
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("SJ_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("sj"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state/sj"))
}

/// Resolve config file: SJ_CONFIG > <state_dir>/config.toml
pub fn config_path(state_dir: &std::path::Path) -> PathBuf {
    match std::env::var("SJ_CONFIG") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => state_dir.join("config.toml"),
    }
}

/// Log filter directive for the binary (SJ_LOG, default "warn").
pub fn log_filter() -> String {
    std::env::var("SJ_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "warn".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
