// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::test_support::sync_task;

fn job(id: &str, name: &str, tasks: &[&str]) -> Job {
    Job::builder()
        .id(id)
        .name(name)
        .task_ids(tasks.iter().map(|t| TaskId::new(t)).collect())
        .build()
}

#[test]
fn get_put_delete() {
    let repo = MemoryRepository::new();
    assert!(repo.job(&JobId::new("j1")).is_none());

    repo.put_job(job("j1", "nightly", &[])).unwrap();
    repo.put_task(sync_task("t1", "/a", "/b")).unwrap();
    assert_eq!(repo.job(&JobId::new("j1")).map(|j| j.name), Some("nightly".to_string()));
    assert!(repo.task(&TaskId::new("t1")).is_some());

    let removed = repo.delete_task(&TaskId::new("t1")).unwrap();
    assert_eq!(removed.map(|t| t.id), Some(TaskId::new("t1")));
    assert!(repo.delete_task(&TaskId::new("t1")).unwrap().is_none());
}

#[test]
fn jobs_are_listed_by_name() {
    let repo = MemoryRepository::with(
        vec![job("j1", "weekly", &[]), job("j2", "daily", &[]), job("j3", "monthly", &[])],
        vec![],
    );
    let names: Vec<String> = repo.jobs().into_iter().map(|j| j.name).collect();
    assert_eq!(names, vec!["daily", "monthly", "weekly"]);
}

#[test]
fn deleting_a_task_leaves_a_dangling_reference_that_resolves_away() {
    let repo = MemoryRepository::with(
        vec![job("j1", "nightly", &["t1", "t2"])],
        vec![sync_task("t1", "/a", "/b"), sync_task("t2", "/c", "/d")],
    );
    repo.delete_task(&TaskId::new("t1")).unwrap();

    let job = repo.job(&JobId::new("j1")).unwrap();
    assert_eq!(job.task_ids().len(), 2);
    let resolved: Vec<String> =
        repo.resolve_tasks(&job).into_iter().map(|t| t.id.to_string()).collect();
    assert_eq!(resolved, vec!["t2"]);
}

#[yare::parameterized(
    by_id   = { "j2" },
    by_name = { "daily" },
)]
fn find_job_by_id_or_name(key: &str) {
    let repo = MemoryRepository::with(vec![job("j1", "weekly", &[]), job("j2", "daily", &[])], vec![]);
    assert_eq!(repo.find_job(key).map(|j| j.id), Some(JobId::new("j2")));
}

#[test]
fn find_job_unknown() {
    let repo = MemoryRepository::new();
    assert!(repo.find_job("nope").is_none());
}
