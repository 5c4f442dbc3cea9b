// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from(dir.path(), &dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::for_state_dir(dir.path()));
    assert_eq!(config.tool, "rsync");
    assert_eq!(config.lock_dir, dir.path().join("locks"));
    assert_eq!(config.kill_timeout, Duration::from_secs(5));
}

#[test]
fn file_overrides_and_resolves_relative_paths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
tool = "/opt/rsync/bin/rsync"
lock_dir = "run/locks"
store = "/srv/sj/jobs.json"
kill_timeout_ms = 250
"#,
    )
    .unwrap();

    let config = Config::load_from(dir.path(), &path).unwrap();
    assert_eq!(config.tool, "/opt/rsync/bin/rsync");
    assert_eq!(config.lock_dir, dir.path().join("run/locks"));
    assert_eq!(config.store, PathBuf::from("/srv/sj/jobs.json"));
    assert_eq!(config.log_dir, dir.path().join("logs"));
    assert_eq!(config.kill_timeout, Duration::from_millis(250));
    assert_eq!(config.version_timeout, Duration::from_secs(10));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "tool = \"rsync\"\nbogus = 1\n").unwrap();
    let err = Config::load_from(dir.path(), &path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }), "got {err}");
}

#[test]
fn blank_tool_keeps_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "tool = \"  \"\n").unwrap();
    assert_eq!(Config::load_from(dir.path(), &path).unwrap().tool, "rsync");
}
