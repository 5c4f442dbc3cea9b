// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::{LogMode, StreamKind};

fn chatty() -> Harness {
    Harness::with_tool(|_| "echo 'sending incremental file list'\necho 'rsync: warning' >&2".to_string())
}

async fn run_with(h: &Harness, log: LogFlags, log_mode: LogMode) -> JobId {
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let mut job = job_with(&tasks);
    job.log = log;
    job.log_mode = log_mode;
    h.orchestrator.start(&job, tasks).await.unwrap();
    job.id
}

#[tokio::test]
async fn stderr_merges_into_stdout_by_default() {
    let h = chatty();
    let job = run_with(&h, LogFlags::default(), LogMode::Quiet).await;

    let mut out = h.sink.lines(&job, StreamKind::Stdout);
    out.sort();
    assert_eq!(out, vec!["rsync: warning", "sending incremental file list"]);
    assert!(h.sink.lines(&job, StreamKind::Stderr).is_empty());
}

#[tokio::test]
async fn separate_stderr_gets_its_own_channel() {
    let h = chatty();
    let flags = LogFlags { separate_stderr: true, ..LogFlags::default() };
    let job = run_with(&h, flags, LogMode::Quiet).await;

    assert_eq!(h.sink.lines(&job, StreamKind::Stdout), vec!["sending incremental file list"]);
    assert_eq!(h.sink.lines(&job, StreamKind::Stderr), vec!["rsync: warning"]);
}

#[tokio::test]
async fn uncaptured_streams_are_discarded() {
    let h = chatty();
    let flags = LogFlags { capture_stdout: false, capture_stderr: true, separate_stderr: true };
    let job = run_with(&h, flags, LogMode::Quiet).await;

    assert!(h.sink.lines(&job, StreamKind::Stdout).is_empty());
    assert_eq!(h.sink.lines(&job, StreamKind::Stderr), vec!["rsync: warning"]);
}

#[tokio::test]
async fn quiet_mode_writes_no_info_lines() {
    let h = Harness::exiting(0);
    let job = run_with(&h, LogFlags::default(), LogMode::Quiet).await;
    assert!(h.sink.lines(&job, StreamKind::Info).is_empty());
}

#[tokio::test]
async fn normal_mode_reports_progress() {
    let h = Harness::exiting(0);
    let job = run_with(&h, LogFlags::default(), LogMode::Normal).await;
    assert_eq!(
        h.sink.lines(&job, StreamKind::Info),
        vec![
            "job test-job started",
            "task tsk-1 started",
            "task tsk-1 succeeded",
            "job test-job finished",
        ]
    );
}

#[tokio::test]
async fn verbose_mode_adds_command_lines() {
    let h = Harness::exiting(0);
    let job = run_with(&h, LogFlags::default(), LogMode::Verbose).await;
    let info = h.sink.lines(&job, StreamKind::Info);
    assert!(info.contains(&format!("command: {} /a /b", h.tool)), "{info:?}");
}

#[tokio::test]
async fn output_is_published_to_subscribers() {
    let h = chatty();
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let mut job = job_with(&tasks);
    job.log.separate_stderr = true;
    job.log_mode = LogMode::Quiet;
    let mut rx = h.orchestrator.subscribe_job(job.id.clone());

    h.orchestrator.start(&job, tasks).await.unwrap();

    let events = drain(&mut rx);
    let names: Vec<&str> = events.iter().map(JobEvent::name).collect();
    assert_eq!(names.first(), Some(&"job:state"));
    assert_eq!(names.last(), Some(&"job:state"));
    assert!(names.contains(&"task:started"));
    assert!(names.contains(&"task:finished"));
    assert!(events.contains(&JobEvent::Output {
        job_id: job.id.clone(),
        stream: StreamKind::Stderr,
        line: "rsync: warning".to_string(),
    }));
}
