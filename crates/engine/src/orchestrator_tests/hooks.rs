// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::test_support::all_task_hooks;
use sj_core::{Hook, JobExecuteSection};

fn job_hooks(program: &str) -> JobExecuteSection {
    JobExecuteSection {
        before: Hook::new(format!("{program} job_before")),
        after_failure: Hook::new(format!("{program} job_after_failure")),
        after_success: Hook::new(format!("{program} job_after_success")),
        after: Hook::new(format!("{program} job_after")),
    }
}

fn hooked_task(h: &Harness, id: &str, src: &str, dst: &str) -> Task {
    let mut task = sync_task(id, src, dst);
    task.execute = all_task_hooks(&h.hook());
    task
}

#[tokio::test]
async fn exit_zero_runs_after_ok_and_after() {
    let h = Harness::exiting(0);
    let task = hooked_task(&h, "tsk-1", "/a", "/b");
    let job = job_with(std::slice::from_ref(&task));

    let report = h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(h.hook_calls(), vec!["before", "after_ok", "after"]);
    assert!(report.hook_failures.is_empty());
}

#[tokio::test]
async fn nonzero_exit_runs_after_fail_and_after() {
    let h = Harness::exiting(2);
    let task = hooked_task(&h, "tsk-1", "/a", "/b");
    let job = job_with(std::slice::from_ref(&task));

    let report = h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert_eq!(h.hook_calls(), vec!["before", "after_fail", "after"]);
}

#[tokio::test]
async fn job_and_task_hooks_interleave_in_lifecycle_order() {
    let h = Harness::exiting(0);
    let tasks = vec![hooked_task(&h, "tsk-1", "/a", "/b"), hooked_task(&h, "tsk-2", "/c", "/d")];
    let mut job = job_with(&tasks);
    job.execute = job_hooks(&h.hook());

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(
        h.hook_calls(),
        vec![
            "job_before",
            "before",
            "after_ok",
            "after",
            "before",
            "after_ok",
            "after",
            "job_after_success",
            "job_after",
        ]
    );
}

#[tokio::test]
async fn failed_job_runs_after_failure_not_after_success() {
    let h = Harness::exiting(1);
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let mut job = job_with(&tasks);
    job.execute = job_hooks(&h.hook());

    h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(h.hook_calls(), vec!["job_before", "job_after_failure", "job_after"]);
}

#[tokio::test]
async fn failing_job_before_hook_aborts_the_run() {
    let h = Harness::exiting(0);
    let tasks = two_tasks();
    let mut job = job_with(&tasks);
    job.execute = job_hooks(&h.hook());
    job.execute.before = Hook::new(format!("{} job_before", h.failing_hook(1)));

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert!(h.calls().is_empty());
    assert!(report.tasks.is_empty());
    assert_eq!(h.hook_calls(), vec!["job_before", "job_after_failure", "job_after"]);
    assert_eq!(
        report.hook_failures,
        vec![HookFailure {
            scope: HookScope::Job,
            kind: HookKind::Before,
            outcome: HookOutcome::Failed { exit_code: Some(1) },
        }]
    );
    assert!(!h.orchestrator.locks().is_locked(&job.id));
}

#[tokio::test]
async fn failing_task_before_hook_skips_only_that_task() {
    let h = Harness::exiting(0);
    let mut first = hooked_task(&h, "tsk-1", "/a", "/b");
    first.execute.before = Hook::new(format!("{} before", h.failing_hook(4)));
    let second = hooked_task(&h, "tsk-2", "/c", "/d");
    let tasks = vec![first, second];
    let job = job_with(&tasks);

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert_eq!(h.calls(), vec!["/c /d"]);
    assert_eq!(report.tasks[0].outcome, TaskOutcome::HookFailed);
    assert_eq!(report.tasks[1].outcome, TaskOutcome::Succeeded);
    assert_eq!(
        h.hook_calls(),
        vec!["before", "after_fail", "after", "before", "after_ok", "after"]
    );
}

#[tokio::test]
async fn after_hook_failure_does_not_change_the_outcome() {
    let h = Harness::exiting(0);
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let mut job = job_with(&tasks);
    job.execute.after_success = Hook::new(h.failing_hook(9));

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(report.hook_failures.len(), 1);
    assert_eq!(report.hook_failures[0].kind, HookKind::AfterSuccess);
}

#[tokio::test]
async fn missing_hook_program_is_recorded_as_spawn_failure() {
    let h = Harness::exiting(0);
    let mut task = sync_task("tsk-1", "/a", "/b");
    task.execute.after = Hook::new("/no/such/hook --flag");
    let job = job_with(std::slice::from_ref(&task));

    let report = h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert!(report.succeeded());
    assert!(matches!(
        &report.hook_failures[..],
        [HookFailure { kind: HookKind::After, outcome: HookOutcome::SpawnFailed(_), .. }]
    ));
}

#[tokio::test]
async fn inactive_hooks_do_not_run() {
    let h = Harness::exiting(0);
    let mut task = hooked_task(&h, "tsk-1", "/a", "/b");
    task.execute.before.active = false;
    task.execute.after.active = false;
    let job = job_with(std::slice::from_ref(&task));

    h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert_eq!(h.hook_calls(), vec!["after_ok"]);
}

#[tokio::test]
async fn hooks_see_run_variables_and_task_environment() {
    let h = Harness::exiting(0);
    let log = h.path().join("hooks");
    let env_hook = script(
        h.path(),
        "env-hook",
        &format!("echo \"$SJ_JOB_ID $SJ_TASK_ID $GREETING\" >> '{}'", log.display()),
    );
    let mut task = sync_task("tsk-1", "/a", "/b");
    task.environment = "GREETING=hi".to_string();
    task.execute.after = Hook::new(env_hook.display().to_string());
    let mut job = job_with(std::slice::from_ref(&task));
    job.execute.after = Hook::new(env_hook.display().to_string());

    h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert_eq!(h.hook_calls(), vec!["job-test tsk-1 hi", "job-test  "]);
}

#[tokio::test]
async fn hook_outcomes_are_published() {
    let h = Harness::exiting(0);
    let task = hooked_task(&h, "tsk-1", "/a", "/b");
    let job = job_with(std::slice::from_ref(&task));
    let mut rx = h.orchestrator.subscribe_job(job.id.clone());

    h.orchestrator.start(&job, vec![task]).await.unwrap();

    let kinds: Vec<HookKind> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            JobEvent::HookFinished { kind, outcome: HookOutcome::Succeeded, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![HookKind::Before, HookKind::AfterSuccess, HookKind::After]);
}
