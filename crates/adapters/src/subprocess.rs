// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for bounded waits on child processes.

use crate::process::{ProcessAdapter, ProcessSpec, SpawnError};
use std::process::{ExitStatus, Output};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Child;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("{label} timed out after {}ms", timeout.as_millis())]
    TimedOut { label: String, timeout: Duration },
    #[error("{label} failed: {source}")]
    Io { label: String, source: std::io::Error },
}

/// Run a process to completion, collecting its output.
///
/// If it has not exited after `timeout` it is killed and reaped before
/// returning [`RunError::TimedOut`], so no zombie is left behind.
pub async fn run_with_timeout<P: ProcessAdapter>(
    adapter: &P,
    spec: &ProcessSpec,
    timeout: Duration,
    label: &str,
) -> Result<Output, RunError> {
    let mut child = adapter.spawn(spec)?;
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    let collect = async {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let read_out = async {
            if let Some(s) = stdout.as_mut() {
                let _ = s.read_to_end(&mut out).await;
            }
        };
        let read_err = async {
            if let Some(s) = stderr.as_mut() {
                let _ = s.read_to_end(&mut err).await;
            }
        };
        tokio::join!(read_out, read_err);
        let status = child.wait().await;
        (status, out, err)
    };

    let result = tokio::time::timeout(timeout, collect).await;
    match result {
        Ok((status, stdout, stderr)) => {
            let status =
                status.map_err(|source| RunError::Io { label: label.to_string(), source })?;
            Ok(Output { status, stdout, stderr })
        }
        Err(_) => {
            tracing::warn!(label, command = %spec.command_line(), "process timed out, killing");
            if let Err(e) = child.kill().await {
                tracing::warn!(label, error = %e, "failed to kill timed out process");
            }
            Err(RunError::TimedOut { label: label.to_string(), timeout })
        }
    }
}

/// Stop a child: ask politely first, then kill after `grace`.
///
/// Always reaps the child.
pub async fn terminate(child: &mut Child, grace: Duration) -> std::io::Result<ExitStatus> {
    if let Some(status) = request_stop(child, grace).await {
        return status;
    }
    tracing::debug!(pid = ?child.id(), "killing process");
    child.kill().await?;
    child.wait().await
}

/// Send SIGTERM and wait up to `grace`. `None` means the child is still
/// running (or could not be signalled) and needs a hard kill.
#[cfg(unix)]
async fn request_stop(child: &mut Child, grace: Duration) -> Option<std::io::Result<ExitStatus>> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        // Already reaped
        return Some(child.wait().await);
    };
    let pid = Pid::from_raw(i32::try_from(pid).ok()?);
    if let Err(e) = kill(pid, Signal::SIGTERM) {
        tracing::warn!(%pid, error = %e, "failed to send SIGTERM");
        return None;
    }
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => Some(status),
        Err(_) => {
            tracing::warn!(%pid, grace_ms = grace.as_millis() as u64, "process ignored SIGTERM");
            None
        }
    }
}

#[cfg(not(unix))]
async fn request_stop(child: &mut Child, _grace: Duration) -> Option<std::io::Result<ExitStatus>> {
    match child.try_wait() {
        Ok(Some(status)) => Some(Ok(status)),
        _ => None,
    }
}

/// Whether a process with `pid` currently exists.
///
/// Used to tell a stale lock left by a crashed run from a live one. A pid we
/// are not allowed to signal still counts as alive.
#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(_) => true,
    }
}

/// Without a way to probe, every recorded pid is assumed alive.
#[cfg(not(unix))]
pub fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
