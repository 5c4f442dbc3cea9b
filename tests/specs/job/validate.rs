//! `sj --validate <job>` and validation before `--start`.

use crate::prelude::*;

#[test]
fn valid_job_reports_ok() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.sj().args(&["--validate", "nightly"]).passes().stdout_has("nightly: ok");
}

#[test]
fn missing_hook_and_exclude_file_are_reported() {
    let temp = Project::empty();
    temp.store(json!({
        "jobs": [{ "id": "job-1", "name": "nightly", "task_ids": ["tsk-1"] }],
        "tasks": [{
            "id": "tsk-1",
            "name": "docs",
            "source": "/a",
            "destination": "/b",
            "exclude": { "exclude_file": "/no/such/excludes.txt" },
            "execute": { "after": { "command": "/no/such/hook", "active": true } },
        }],
    }));

    temp.sj()
        .args(&["--validate", "nightly"])
        .exits(1)
        .stderr_has("job `nightly` is not runnable")
        .stderr_has("Task docs")
        .stderr_has("/no/such/hook")
        .stderr_has("/no/such/excludes.txt");
}

#[test]
fn invalid_job_is_not_started() {
    let temp = Project::empty();
    temp.tool("exit 127");
    temp.store(nightly_store());

    temp.sj().args(&["--start", "nightly"]).exits(1).stderr_has("Tool not found");
    // Only the version probe ran
    assert_eq!(temp.calls(), vec!["--version"]);
}
