// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs against real `/bin/sh` scripts standing in for the sync tool and
//! hooks. Scripts append to files in the test's temp dir so invocations
//! and their order can be checked afterwards.

#![cfg(unix)]

mod cancel;
mod hooks;
mod lifecycle;
mod output;

use super::*;
use crate::sink::MemoryLogSink;
use crate::test_helpers::{lines, recording_hook, script};
use sj_adapters::RecordingProcessAdapter;
use sj_core::test_support::sync_task;
use sj_core::LogFlags;
use std::path::Path;
use tempfile::TempDir;

struct Harness {
    dir: TempDir,
    tool: String,
    adapter: RecordingProcessAdapter,
    sink: Arc<MemoryLogSink>,
    orchestrator: Orchestrator<RecordingProcessAdapter>,
}

impl Harness {
    /// Tool that records its arguments and exits with `code`.
    fn exiting(code: i32) -> Self {
        Self::with_tool(|calls| format!("echo \"$@\" >> '{}'\nexit {code}", calls.display()))
    }

    /// Tool script built from the path of the calls file.
    fn with_tool(body: impl FnOnce(&Path) -> String) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let tool = script(dir.path(), "tool", &body(&calls)).display().to_string();
        Self::build(dir, tool)
    }

    /// Tool path that does not exist.
    fn missing_tool() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("no-such-tool").display().to_string();
        Self::build(dir, tool)
    }

    fn build(dir: TempDir, tool: String) -> Self {
        let settings = RunSettings {
            tool: tool.clone(),
            lock_dir: dir.path().join("locks"),
            kill_timeout: Duration::from_secs(1),
            path_style: PathStyle::Posix,
        };
        let adapter = RecordingProcessAdapter::new();
        let sink = Arc::new(MemoryLogSink::new());
        let orchestrator =
            Orchestrator::new(settings, adapter.clone(), Arc::clone(&sink) as Arc<dyn LogSink>);
        Self { dir, tool, adapter, sink, orchestrator }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Argument lines the tool recorded, in call order.
    fn calls(&self) -> Vec<String> {
        lines(&self.path().join("calls"))
    }

    /// Program for hooks that record their arguments.
    fn hook(&self) -> String {
        recording_hook(self.path()).display().to_string()
    }

    fn hook_calls(&self) -> Vec<String> {
        lines(&self.path().join("hooks"))
    }

    /// A hook program that exits with `code`.
    fn failing_hook(&self, code: i32) -> String {
        let log = self.path().join("hooks");
        script(self.path(), "failing-hook", &format!("echo \"$@\" >> '{}'\nexit {code}", log.display()))
            .display()
            .to_string()
    }
}

fn job_with(tasks: &[Task]) -> Job {
    Job::builder().task_ids(tasks.iter().map(|t| t.id.clone()).collect()).build()
}

fn two_tasks() -> Vec<Task> {
    vec![sync_task("tsk-1", "/a", "/b"), sync_task("tsk-2", "/c", "/d")]
}

fn drain(rx: &mut mpsc::UnboundedReceiver<JobEvent>) -> Vec<JobEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

fn state_changes(events: &[JobEvent]) -> Vec<(ProcessState, ProcessState)> {
    events
        .iter()
        .filter_map(|e| match e {
            JobEvent::StateChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

/// Poll `cond` until it holds, failing the test after 10s.
async fn wait_for(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
