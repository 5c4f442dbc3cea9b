//! Shared harness for the specs.

use std::path::{Path, PathBuf};
use std::process::Output;

pub use serde_json::json;

/// The `sj` binary with color and inherited state settings stripped.
pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::cargo_bin("sj").unwrap_or_else(|e| panic!("sj binary: {e}"));
    cmd.env("NO_COLOR", "1").env_remove("COLOR").env_remove("SJ_CONFIG").env_remove("SJ_LOG");
    Cli { cmd }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        let output = self.cmd.output().unwrap_or_else(|e| panic!("failed to run sj: {e}"));
        Run { output }
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> Run {
        self.exits(0)
    }

    /// Run and require a non-zero exit code.
    pub fn fails(self) -> Run {
        let run = self.run();
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }

    pub fn exits(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(run.output.status.code(), Some(code), "unexpected exit code\n{}", run.describe());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    fn describe(&self) -> String {
        format!(
            "status: {:?}\n--- stdout\n{}--- stderr\n{}",
            self.output.status.code(),
            self.stdout(),
            self.stderr()
        )
    }
}

/// A state directory with a job store, a config file and a fake sync tool.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    /// State directory whose tool records its arguments to `calls` and
    /// exits 0.
    pub fn empty() -> Self {
        let project = Self { dir: tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}")) };
        project.tool("exit 0");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
        }
        std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
        path
    }

    /// Executable `/bin/sh` script at `rel`.
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.file(rel, &format!("#!/bin/sh\n{body}\n"));
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .unwrap_or_else(|e| panic!("chmod: {e}"));
        }
        path
    }

    /// Replace the sync tool. The script logs its arguments first, then runs
    /// `body`.
    pub fn tool(&self, body: &str) {
        let calls = self.path().join("calls");
        let tool = self.script("bin/rsync", &format!("echo \"$@\" >> '{}'\n{body}", calls.display()));
        self.file("config.toml", &format!("tool = \"{}\"\nkill_timeout_ms = 500\n", tool.display()));
    }

    /// Write the job store.
    pub fn store(&self, data: serde_json::Value) {
        self.file("jobs.json", &data.to_string());
    }

    /// Argument lines the tool was called with, in order.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("calls"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn sj(&self) -> Cli {
        cli().env("SJ_STATE_DIR", self.path())
    }
}

/// A store with one job `nightly` (id `job-1`) running two tasks.
pub fn nightly_store() -> serde_json::Value {
    json!({
        "jobs": [{
            "id": "job-1",
            "name": "nightly",
            "description": "home to nas",
            "task_ids": ["tsk-1", "tsk-2"],
        }],
        "tasks": [
            { "id": "tsk-1", "name": "docs", "source": "/a", "destination": "/b" },
            { "id": "tsk-2", "name": "photos", "source": "/c", "destination": "/d" },
        ],
    })
}
