// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable shell scripts standing in for the sync tool and hooks.

use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// A tool that appends its arguments as one line to `<dir>/calls` and exits
/// with `code`.
pub fn recording_tool(dir: &Path, code: i32) -> PathBuf {
    let calls = dir.join("calls");
    script(dir, "tool", &format!("echo \"$@\" >> '{}'\nexit {code}", calls.display()))
}

/// A hook program that appends its arguments to `<dir>/hooks`.
pub fn recording_hook(dir: &Path) -> PathBuf {
    let log = dir.join("hooks");
    script(dir, "hook", &format!("echo \"$@\" >> '{}'", log.display()))
}

/// Lines of a recording file, empty if it was never written.
pub fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
