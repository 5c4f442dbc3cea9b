// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Errors from launching a process
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn `{program}`: {source}")]
    SpawnFailed { program: String, source: std::io::Error },
}

/// Everything needed to launch one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Merged over the inherited environment.
    pub env: Vec<(String, String)>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, env: Vec::new() }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Human-readable command line for logs.
    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

/// Render a program and its arguments as a copy-pasteable shell line.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token.chars().all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,\\".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

/// Adapter for launching child processes.
///
/// Children are spawned with stdin closed and both output streams piped;
/// callers are responsible for draining them.
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    fn spawn(&self, spec: &ProcessSpec) -> Result<Child, SpawnError>;
}

/// Spawns real OS processes via tokio.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProcessAdapter;

impl ProcessAdapter for SystemProcessAdapter {
    fn spawn(&self, spec: &ProcessSpec) -> Result<Child, SpawnError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let child = cmd.spawn().map_err(|source| SpawnError::SpawnFailed {
            program: spec.program.clone(),
            source,
        })?;
        tracing::debug!(pid = ?child.id(), command = %spec.command_line(), "spawned process");
        Ok(child)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ProcessAdapter, ProcessSpec, SpawnError, SystemProcessAdapter};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::process::Child;

    /// Recorded spawn attempt
    #[derive(Debug, Clone)]
    pub struct SpawnRecord {
        pub spec: ProcessSpec,
        pub spawned: bool,
    }

    /// Process adapter that spawns real processes and records every attempt.
    #[derive(Clone, Default)]
    pub struct RecordingProcessAdapter {
        inner: SystemProcessAdapter,
        calls: Arc<Mutex<Vec<SpawnRecord>>>,
    }

    impl RecordingProcessAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// All spawn attempts, in order
        pub fn calls(&self) -> Vec<SpawnRecord> {
            self.calls.lock().clone()
        }

        pub fn spawn_count(&self) -> usize {
            self.calls.lock().len()
        }

        /// Argument vectors of attempts whose program is `program`
        pub fn args_for(&self, program: &str) -> Vec<Vec<String>> {
            self.calls
                .lock()
                .iter()
                .filter(|r| r.spec.program == program)
                .map(|r| r.spec.args.clone())
                .collect()
        }
    }

    impl ProcessAdapter for RecordingProcessAdapter {
        fn spawn(&self, spec: &ProcessSpec) -> Result<Child, SpawnError> {
            let result = self.inner.spawn(spec);
            self.calls.lock().push(SpawnRecord { spec: spec.clone(), spawned: result.is_ok() });
            result
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{RecordingProcessAdapter, SpawnRecord};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
