//! `sj --start <job>`

use crate::prelude::*;

#[test]
fn runs_tasks_in_order() {
    let temp = Project::empty();
    temp.store(nightly_store());

    temp.sj().args(&["--start", "nightly"]).passes().stdout_has("nightly: finished (2 tasks, 0 failed)");

    assert_eq!(temp.calls(), vec!["--version", "/a /b", "/c /d"]);
}

#[test]
fn job_can_be_started_by_id() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.sj().args(&["--start", "job-1"]).passes();
}

#[test]
fn tool_output_is_streamed() {
    let temp = Project::empty();
    temp.tool("echo \"sent $1\"");
    temp.store(nightly_store());

    temp.sj().args(&["--start", "nightly"]).passes().stdout_has("sent /a").stdout_has("sent /c");
}

#[test]
fn failing_task_fails_the_command() {
    let temp = Project::empty();
    temp.tool("[ \"$1\" = --version ] && exit 0\nexit 23");
    temp.store(nightly_store());

    temp.sj()
        .args(&["--start", "nightly"])
        .exits(1)
        .stdout_has("nightly: failed (2 tasks, 2 failed)")
        .stderr_has("job nightly failed");
}

#[test]
fn unknown_job_exits_not_found() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.sj().args(&["--start", "weekly"]).exits(3).stderr_has("no job named `weekly`");
    assert!(temp.calls().is_empty());
}

#[test]
fn held_lock_refuses_to_start() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.file("locks/job-1.lock", "1");

    temp.sj().args(&["--start", "nightly"]).exits(2).stderr_has("already running");
    assert!(temp.calls().is_empty());
}

#[test]
fn job_log_records_output_and_states() {
    let temp = Project::empty();
    temp.tool("echo \"sent $1\"");
    temp.store(nightly_store());

    temp.sj().args(&["--start", "nightly"]).passes();

    let log = std::fs::read_to_string(temp.path().join("logs/job-1.log")).unwrap_or_default();
    assert!(log.contains("[out] sent /a"), "{log}");
    assert!(log.contains("[state] startable -> running"), "{log}");
    assert!(log.contains("[state] running -> finished"), "{log}");
}
