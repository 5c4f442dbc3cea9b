// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::test_support::all_task_hooks;
use sj_core::{Hook, JobExecuteSection};

/// Tool that records its call and then blocks until killed.
fn blocking_harness() -> Harness {
    Harness::with_tool(|calls| format!("echo \"$@\" >> '{}'\nexec sleep 30", calls.display()))
}

#[tokio::test]
async fn cancel_mid_run_terminates_tool_and_suppresses_success_hooks() {
    let h = blocking_harness();
    let hook = h.hook();
    let mut tasks = two_tasks();
    for task in &mut tasks {
        task.execute = all_task_hooks(&hook);
    }
    let mut job = job_with(&tasks);
    job.execute = JobExecuteSection {
        before: Hook::new(format!("{hook} job_before")),
        after_failure: Hook::new(format!("{hook} job_after_failure")),
        after_success: Hook::new(format!("{hook} job_after_success")),
        after: Hook::new(format!("{hook} job_after")),
    };
    let mut rx = h.orchestrator.subscribe_job(job.id.clone());

    let run = {
        let orchestrator = h.orchestrator.clone();
        let job = job.clone();
        tokio::spawn(async move { orchestrator.start(&job, tasks).await })
    };
    wait_for(|| h.calls().len() == 1).await;
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Running);

    let started = std::time::Instant::now();
    assert!(h.orchestrator.cancel(&job.id));
    let report = run.await.unwrap().unwrap();

    assert!(report.cancelled());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.tasks[0].outcome, TaskOutcome::Cancelled);
    // Second task never started
    assert_eq!(h.calls(), vec!["/a /b"]);

    let hooks = h.hook_calls();
    assert_eq!(hooks, vec!["job_before", "before", "after_fail", "after", "job_after_failure", "job_after"]);
    assert!(!hooks.iter().any(|c| c == "after_ok" || c == "job_after_success"));

    assert_eq!(
        state_changes(&drain(&mut rx)),
        vec![
            (ProcessState::Startable, ProcessState::Running),
            (ProcessState::Running, ProcessState::Cancelled),
            (ProcessState::Cancelled, ProcessState::Startable),
        ]
    );
    assert!(!h.orchestrator.locks().is_locked(&job.id));
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
}

#[tokio::test]
async fn cancel_during_job_before_hook_skips_tasks() {
    let h = blocking_harness();
    let log = h.path().join("hooks");
    let slow = script(h.path(), "slow-hook", &format!("echo \"$@\" >> '{}'\nexec sleep 30", log.display()));
    let tasks = two_tasks();
    let mut job = job_with(&tasks);
    job.execute.before = Hook::new(format!("{} job_before", slow.display()));

    let run = {
        let orchestrator = h.orchestrator.clone();
        let job = job.clone();
        tokio::spawn(async move { orchestrator.start(&job, tasks).await })
    };
    wait_for(|| h.hook_calls().len() == 1).await;
    assert!(h.orchestrator.cancel(&job.id));
    let report = run.await.unwrap().unwrap();

    assert!(report.cancelled());
    assert!(report.tasks.is_empty());
    assert!(h.calls().is_empty());
    assert_eq!(report.hook_failures[0].outcome, HookOutcome::Cancelled);
}

#[tokio::test]
async fn cancel_is_a_no_op_when_not_running() {
    let h = Harness::exiting(0);
    let tasks = two_tasks();
    let job = job_with(&tasks);

    assert!(!h.orchestrator.cancel(&job.id));

    let report = h.orchestrator.start(&job, tasks).await.unwrap();
    assert!(report.succeeded());
    // After natural completion
    assert!(!h.orchestrator.cancel(&job.id));
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
}

#[tokio::test]
async fn second_cancel_is_ignored() {
    let h = blocking_harness();
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let job = job_with(&tasks);

    let run = {
        let orchestrator = h.orchestrator.clone();
        let job = job.clone();
        tokio::spawn(async move { orchestrator.start(&job, tasks).await })
    };
    wait_for(|| h.calls().len() == 1).await;

    assert!(h.orchestrator.cancel(&job.id));
    assert!(!h.orchestrator.cancel(&job.id));
    let report = run.await.unwrap().unwrap();
    assert!(report.cancelled());
    assert_eq!(h.sink.states(&job.id), vec![ProcessState::Running, ProcessState::Cancelled, ProcessState::Startable]);
}

fn dying_body() -> RunReport {
    panic!("run body died");
}

#[tokio::test]
async fn run_that_dies_after_a_cancel_ends_cancelled() {
    let h = Harness::exiting(0);
    let job = Job::builder().build();
    let lock = h.orchestrator.locks().acquire(&job.id).unwrap();
    h.orchestrator.apply(&job.id, Transition::Start).unwrap();
    let control = RunControl::new();
    assert!(control.cancel());

    let joined = tokio::spawn(async { dying_body() }).await;
    let report = h.orchestrator.finish(&job.id, &control, lock, joined);

    assert_eq!(report.final_state, ProcessState::Cancelled);
    assert_eq!(h.sink.states(&job.id), vec![ProcessState::Running, ProcessState::Cancelled, ProcessState::Startable]);
    assert!(!h.orchestrator.locks().is_locked(&job.id));
}

#[tokio::test]
async fn run_that_dies_without_a_cancel_ends_failed() {
    let h = Harness::exiting(0);
    let job = Job::builder().build();
    let lock = h.orchestrator.locks().acquire(&job.id).unwrap();
    h.orchestrator.apply(&job.id, Transition::Start).unwrap();

    let joined = tokio::spawn(async { dying_body() }).await;
    let report = h.orchestrator.finish(&job.id, &RunControl::new(), lock, joined);

    assert_eq!(report.final_state, ProcessState::Failed);
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
}
