// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::test_support::sync_task;
use tempfile::tempdir;

#[test]
fn missing_file_opens_empty() {
    let dir = tempdir().unwrap();
    let repo = FileRepository::open(dir.path().join("jobs.json")).unwrap();
    assert!(repo.jobs().is_empty());
    assert!(repo.tasks().is_empty());
}

#[test]
fn mutations_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("jobs.json");

    let repo = FileRepository::open(&path).unwrap();
    let mut job = Job::builder().id("j1").name("nightly").build();
    job.add_task(TaskId::new("t1"));
    repo.put_job(job.clone()).unwrap();
    repo.put_task(sync_task("t1", "/a", "/b")).unwrap();
    drop(repo);

    let reopened = FileRepository::open(&path).unwrap();
    assert_eq!(reopened.job(&JobId::new("j1")), Some(job));
    assert_eq!(reopened.resolve_tasks(&reopened.jobs()[0]).len(), 1);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn delete_is_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    let repo = FileRepository::open(&path).unwrap();
    repo.put_task(sync_task("t1", "/a", "/b")).unwrap();
    repo.delete_task(&TaskId::new("t1")).unwrap();

    let reopened = FileRepository::open(&path).unwrap();
    assert!(reopened.task(&TaskId::new("t1")).is_none());
}

#[test]
fn store_document_lists_jobs_and_tasks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    let repo = FileRepository::open(&path).unwrap();
    repo.put_task(sync_task("t1", "/a", "/b")).unwrap();

    let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["jobs"], serde_json::json!([]));
    assert_eq!(doc["tasks"][0]["id"], "t1");
    assert_eq!(doc["tasks"][0]["source"], "/a");
}

#[test]
fn malformed_store_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let err = FileRepository::open(&path).err().unwrap();
    assert!(matches!(err, RepositoryError::Json { .. }), "got {err}");
}
