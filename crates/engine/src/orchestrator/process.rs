// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervised child processes with line-by-line output streaming.

use crate::bus::EventBus;
use crate::sink::LogSink;
use sj_adapters::{terminate, ProcessAdapter, ProcessSpec};
use sj_core::{JobEvent, JobId, LogFlags, StreamKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Writes a job's lines to the sink and the event bus.
#[derive(Clone)]
pub(crate) struct Emitter {
    job_id: JobId,
    sink: Arc<dyn LogSink>,
    bus: EventBus,
}

impl Emitter {
    pub(crate) fn new(job_id: JobId, sink: Arc<dyn LogSink>, bus: EventBus) -> Self {
        Self { job_id, sink, bus }
    }

    pub(crate) fn line(&self, stream: StreamKind, line: &str) {
        self.sink.append(&self.job_id, stream, line);
        self.bus.publish(JobEvent::Output {
            job_id: self.job_id.clone(),
            stream,
            line: line.to_string(),
        });
    }

    pub(crate) fn publish(&self, event: JobEvent) {
        self.bus.publish(event);
    }
}

/// Where each output stream of a child goes; `None` drains and discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputRoute {
    pub(crate) stdout: Option<StreamKind>,
    pub(crate) stderr: Option<StreamKind>,
}

impl OutputRoute {
    /// Sync tool output. Stderr joins stdout unless kept separate.
    pub(crate) fn for_tool(flags: LogFlags) -> Self {
        let stderr_kind = if flags.separate_stderr { StreamKind::Stderr } else { StreamKind::Stdout };
        Self {
            stdout: flags.capture_stdout.then_some(StreamKind::Stdout),
            stderr: flags.capture_stderr.then_some(stderr_kind),
        }
    }

    /// Hook output is informational.
    pub(crate) fn for_hook(flags: LogFlags) -> Self {
        Self {
            stdout: flags.capture_stdout.then_some(StreamKind::Info),
            stderr: flags.capture_stderr.then_some(StreamKind::Info),
        }
    }
}

/// How a supervised child ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Exit {
    Code(i32),
    /// Killed by a signal we did not send
    Signal,
    Cancelled,
    SpawnFailed(String),
    /// The child ran but its status could not be collected
    Lost(String),
}

/// Run `spec` to completion, streaming its output per `route`.
///
/// When `cancel` fires the child is terminated (SIGTERM, then a kill after
/// `grace`) and streaming stops.
pub(crate) async fn run_supervised<P: ProcessAdapter>(
    adapter: &P,
    spec: &ProcessSpec,
    route: OutputRoute,
    emitter: &Emitter,
    cancel: Option<&CancellationToken>,
    grace: Duration,
) -> Exit {
    let mut child = match adapter.spawn(spec) {
        Ok(child) => child,
        Err(e) => return Exit::SpawnFailed(e.to_string()),
    };

    let mut readers: Vec<JoinHandle<()>> = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(pump(stdout, route.stdout, emitter.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(pump(stderr, route.stderr, emitter.clone())));
    }

    let waited = match cancel {
        Some(token) => tokio::select! {
            status = child.wait() => Some(status),
            _ = token.cancelled() => None,
        },
        None => Some(child.wait().await),
    };

    let exit = match waited {
        Some(Ok(status)) => status.code().map_or(Exit::Signal, Exit::Code),
        Some(Err(e)) => Exit::Lost(e.to_string()),
        None => {
            tracing::info!(pid = ?child.id(), command = %spec.program, "terminating cancelled process");
            if let Err(e) = terminate(&mut child, grace).await {
                tracing::warn!(command = %spec.program, error = %e, "failed to terminate process");
            }
            Exit::Cancelled
        }
    };

    for reader in readers {
        if exit == Exit::Cancelled {
            reader.abort();
            continue;
        }
        // A grandchild may keep the pipe open after the child exits
        let abort = reader.abort_handle();
        if tokio::time::timeout(grace, reader).await.is_err() {
            tracing::debug!(command = %spec.program, "output still open after exit, detaching");
            abort.abort();
        }
    }
    exit
}

async fn pump<R>(reader: R, stream: Option<StreamKind>, emitter: Emitter)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if let Some(stream) = stream {
                    let line = String::from_utf8_lossy(&buf);
                    emitter.line(stream, line.trim_end_matches(['\n', '\r']));
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "output stream read failed");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
