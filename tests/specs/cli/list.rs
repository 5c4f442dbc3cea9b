//! `sj --list`

use crate::prelude::*;

#[test]
fn empty_store_lists_no_jobs() {
    let temp = Project::empty();
    temp.sj().args(&["--list"]).passes().stdout_eq("No jobs\n");
}

#[test]
fn lists_jobs_with_task_counts() {
    let temp = Project::empty();
    temp.store(nightly_store());

    temp.sj()
        .args(&["--list"])
        .passes()
        .stdout_has("job-1")
        .stdout_has("nightly")
        .stdout_has("startable")
        .stdout_has("home to nas");
}

#[test]
fn dangling_task_ids_are_not_counted() {
    let temp = Project::empty();
    temp.store(json!({
        "jobs": [{ "id": "job-1", "name": "nightly", "task_ids": ["tsk-1", "gone"] }],
        "tasks": [{ "id": "tsk-1", "name": "docs", "source": "/a", "destination": "/b" }],
    }));

    let run = temp.sj().args(&["--list", "--format", "json"]).passes();
    let jobs: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap_or_default();
    assert_eq!(jobs[0]["tasks"], 1);
    assert_eq!(jobs[0]["state"], "startable");
    assert_eq!(jobs[0]["locked"], false);
}

#[test]
fn malformed_store_is_reported() {
    let temp = Project::empty();
    temp.file("jobs.json", "{ not json");
    temp.sj().args(&["--list"]).exits(1).stderr_has("malformed store");
}
