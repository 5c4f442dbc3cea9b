//! `sj --clear-locks`

use crate::prelude::*;

#[test]
fn nothing_to_clear() {
    let temp = Project::empty();
    temp.sj().args(&["--clear-locks"]).passes().stdout_eq("No locks\n");
}

#[test]
fn clears_a_crashed_run_lock_so_the_job_can_start() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.file("locks/job-1.lock", "");

    temp.sj().args(&["--clear-locks"]).passes().stdout_has("Cleared job-1 (no owner recorded)");
    assert!(!temp.path().join("locks/job-1.lock").exists());

    temp.sj().args(&["--start", "nightly"]).passes();
}

#[test]
fn list_shows_locked_job_as_running() {
    let temp = Project::empty();
    temp.store(nightly_store());
    temp.file("locks/job-1.lock", "1");

    temp.sj().args(&["--list"]).passes().stdout_has("running");
}
