// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn successful_job_runs_tasks_in_order_and_finishes() {
    let h = Harness::exiting(0);
    let tasks = two_tasks();
    let job = job_with(&tasks);
    let mut rx = h.orchestrator.subscribe_job(job.id.clone());

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(report.final_state, ProcessState::Finished);
    assert_eq!(h.calls(), vec!["/a /b", "/c /d"]);
    assert_eq!(
        h.adapter.args_for(&h.tool),
        vec![vec!["/a".to_string(), "/b".to_string()], vec!["/c".to_string(), "/d".to_string()]]
    );
    assert_eq!(
        state_changes(&drain(&mut rx)),
        vec![
            (ProcessState::Startable, ProcessState::Running),
            (ProcessState::Running, ProcessState::Finished),
            (ProcessState::Finished, ProcessState::Startable),
        ]
    );
    assert_eq!(
        h.sink.states(&job.id),
        vec![ProcessState::Running, ProcessState::Finished, ProcessState::Startable]
    );
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
    assert!(!h.orchestrator.locks().is_locked(&job.id));
    assert!(!h.orchestrator.is_running(&job.id));
}

#[tokio::test]
async fn held_lock_refuses_start_without_spawning() {
    let h = Harness::exiting(0);
    let tasks = two_tasks();
    let job = job_with(&tasks);
    let _held = h.orchestrator.locks().acquire(&job.id).unwrap();
    let mut rx = h.orchestrator.subscribe();

    let err = h.orchestrator.start(&job, tasks).await.unwrap_err();

    assert!(matches!(err, StartError::LockHeld { ref job_id } if *job_id == job.id), "got {err}");
    assert_eq!(h.adapter.spawn_count(), 0);
    assert!(drain(&mut rx).is_empty());
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
    // The foreign lock is left alone
    assert!(h.orchestrator.locks().is_locked(&job.id));
}

#[tokio::test]
async fn concurrent_start_of_same_job_is_refused() {
    let h = Harness::with_tool(|calls| format!("echo \"$@\" >> '{}'\nexec sleep 1", calls.display()));
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let job = job_with(&tasks);

    let first = {
        let orchestrator = h.orchestrator.clone();
        let job = job.clone();
        let tasks = tasks.clone();
        tokio::spawn(async move { orchestrator.start(&job, tasks).await })
    };
    wait_for(|| h.orchestrator.is_running(&job.id)).await;

    let second = h.orchestrator.start(&job, tasks).await;
    assert!(matches!(second, Err(StartError::LockHeld { .. })));

    let report = first.await.unwrap().unwrap();
    assert!(report.succeeded());
    assert_eq!(h.calls().len(), 1);
}

#[tokio::test]
async fn failing_task_fails_job_but_later_tasks_still_run() {
    let h = Harness::exiting(2);
    let tasks = two_tasks();
    let job = job_with(&tasks);

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert_eq!(h.calls().len(), 2);
    let outcomes: Vec<_> = report.tasks.iter().map(|t| t.outcome.clone()).collect();
    assert_eq!(outcomes, vec![TaskOutcome::Failed { exit_code: Some(2) }; 2]);
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Startable);
    assert!(!h.orchestrator.locks().is_locked(&job.id));
}

#[tokio::test]
async fn missing_tool_is_a_spawn_failure() {
    let h = Harness::missing_tool();
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let job = job_with(&tasks);

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert!(matches!(report.tasks[0].outcome, TaskOutcome::SpawnFailed(_)));
    let calls = h.adapter.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].spawned);
}

#[tokio::test]
async fn job_without_tasks_finishes() {
    let h = Harness::exiting(0);
    let job = Job::builder().build();
    let report = h.orchestrator.start(&job, Vec::new()).await.unwrap();
    assert!(report.succeeded());
    assert!(report.tasks.is_empty());
    assert_eq!(h.adapter.spawn_count(), 0);
}

#[tokio::test]
async fn job_can_be_started_again_after_it_ends() {
    let h = Harness::exiting(0);
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let job = job_with(&tasks);

    assert!(h.orchestrator.start(&job, tasks.clone()).await.unwrap().succeeded());
    assert!(h.orchestrator.start(&job, tasks).await.unwrap().succeeded());
    assert_eq!(h.calls().len(), 2);
}

#[tokio::test]
async fn task_environment_reaches_the_tool() {
    let h = Harness::with_tool(|calls| {
        format!("echo \"$GREETING $TARGET\" >> '{}'", calls.display())
    });
    let mut task = sync_task("tsk-1", "/a", "/b");
    task.environment = "GREETING=hello TARGET=world".to_string();
    let job = job_with(std::slice::from_ref(&task));

    h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert_eq!(h.calls(), vec!["hello world"]);
}

#[tokio::test]
async fn compiled_command_is_passed_to_the_tool() {
    let h = Harness::exiting(0);
    let task = Task::builder()
        .id("tsk-1")
        .source("/home/me")
        .destination("host:/backup")
        .extra_options("--archive --delete")
        .no_additional_dir(true)
        .build();
    let job = job_with(std::slice::from_ref(&task));

    h.orchestrator.start(&job, vec![task]).await.unwrap();

    assert_eq!(h.calls(), vec!["--archive --delete /home/me/ host:/backup"]);
}

#[tokio::test]
async fn different_jobs_run_in_parallel() {
    let h = Harness::with_tool(|calls| format!("echo \"$@\" >> '{}'\nexec sleep 1", calls.display()));
    let job_a = Job::builder().id("job-a").task_ids(vec!["tsk-1".into()]).build();
    let job_b = Job::builder().id("job-b").task_ids(vec!["tsk-2".into()]).build();

    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(
        h.orchestrator.start(&job_a, vec![sync_task("tsk-1", "/a", "/b")]),
        h.orchestrator.start(&job_b, vec![sync_task("tsk-2", "/c", "/d")]),
    );

    assert!(a.unwrap().succeeded());
    assert!(b.unwrap().succeeded());
    assert!(started.elapsed() < Duration::from_millis(1900));
}

#[tokio::test]
async fn dropping_the_start_future_leaves_the_run_locked_until_it_ends() {
    let h = Harness::with_tool(|calls| format!("echo \"$@\" >> '{}'\nsleep 1", calls.display()));
    let tasks = vec![sync_task("tsk-1", "/a", "/b")];
    let job = job_with(&tasks);

    let started = {
        let orchestrator = h.orchestrator.clone();
        let job = job.clone();
        let tasks = tasks.clone();
        tokio::spawn(async move { orchestrator.start(&job, tasks).await })
    };
    wait_for(|| h.calls().len() == 1).await;
    started.abort();
    assert!(started.await.unwrap_err().is_cancelled());

    // The tool is still syncing
    assert!(h.orchestrator.locks().is_locked(&job.id));
    assert_eq!(h.orchestrator.state(&job.id), ProcessState::Running);
    assert!(matches!(h.orchestrator.start(&job, tasks.clone()).await, Err(StartError::LockHeld { .. })));

    wait_for(|| h.orchestrator.state(&job.id) == ProcessState::Startable).await;
    assert!(!h.orchestrator.locks().is_locked(&job.id));
    assert!(!h.orchestrator.is_running(&job.id));
    assert_eq!(h.sink.states(&job.id), vec![ProcessState::Running, ProcessState::Finished, ProcessState::Startable]);

    assert!(h.orchestrator.start(&job, tasks).await.unwrap().succeeded());
    assert_eq!(h.calls().len(), 2);
}

#[tokio::test]
async fn task_without_destination_fails_without_running_the_tool() {
    let h = Harness::exiting(0);
    let tasks = vec![sync_task("tsk-1", "/a", ""), sync_task("tsk-2", "/c", "/d")];
    let job = job_with(&tasks);

    let report = h.orchestrator.start(&job, tasks).await.unwrap();

    assert_eq!(report.final_state, ProcessState::Failed);
    assert_eq!(report.tasks[0].outcome, TaskOutcome::Failed { exit_code: None });
    assert_eq!(report.tasks[1].outcome, TaskOutcome::Succeeded);
    assert_eq!(h.calls(), vec!["/c /d"]);
    assert_eq!(h.adapter.args_for(&h.tool).len(), 1);
}
