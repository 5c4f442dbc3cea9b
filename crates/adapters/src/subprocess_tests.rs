// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::process::SystemProcessAdapter;
use std::time::Instant;

fn sh(script: &str) -> ProcessSpec {
    ProcessSpec::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(unix)]
#[tokio::test]
async fn run_with_timeout_collects_output() {
    let output = run_with_timeout(
        &SystemProcessAdapter,
        &sh("echo out; echo err >&2; exit 3"),
        Duration::from_secs(5),
        "test",
    )
    .await
    .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(output.stdout, b"out\n");
    assert_eq!(output.stderr, b"err\n");
}

#[cfg(unix)]
#[tokio::test]
async fn run_with_timeout_kills_slow_process() {
    let start = Instant::now();
    let err = run_with_timeout(
        &SystemProcessAdapter,
        &sh("sleep 30"),
        Duration::from_millis(100),
        "sleeper",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RunError::TimedOut { .. }), "got {err}");
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn run_with_timeout_reports_spawn_failure() {
    let spec = ProcessSpec::new("/definitely/not/a/real/binary", vec![]);
    let err = run_with_timeout(&SystemProcessAdapter, &spec, Duration::from_secs(1), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Spawn(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn terminate_stops_cooperative_process_with_sigterm() {
    let mut child = SystemProcessAdapter.spawn(&sh("exec sleep 30")).unwrap();
    let status = terminate(&mut child, Duration::from_secs(5)).await.unwrap();
    assert!(!status.success());
}

#[cfg(unix)]
#[tokio::test]
async fn terminate_kills_process_that_ignores_sigterm() {
    let mut child =
        SystemProcessAdapter.spawn(&sh("trap '' TERM; while true; do sleep 0.05; done")).unwrap();
    // Give the shell time to install the trap
    tokio::time::sleep(Duration::from_millis(200)).await;
    let start = Instant::now();
    let status = terminate(&mut child, Duration::from_millis(200)).await.unwrap();
    assert!(!status.success());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[test]
fn own_process_is_alive() {
    assert!(process_alive(std::process::id()));
}

#[cfg(unix)]
#[tokio::test]
async fn reaped_child_is_not_alive() {
    let mut child = SystemProcessAdapter.spawn(&sh("exit 0")).unwrap();
    let pid = child.id().unwrap();
    child.wait().await.unwrap();
    assert!(!process_alive(pid));
}
