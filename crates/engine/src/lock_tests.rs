// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn job(id: &str) -> JobId {
    JobId::new(id)
}

#[test]
fn acquire_creates_file_with_pid() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path().join("locks"));

    let lock = locks.acquire(&job("job-a")).unwrap();
    assert_eq!(lock.path(), dir.path().join("locks/job-a.lock"));
    let content = std::fs::read_to_string(lock.path()).unwrap();
    assert_eq!(content.trim(), std::process::id().to_string());
    assert!(locks.is_locked(&job("job-a")));
}

#[test]
fn second_acquire_fails_while_held() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());

    let _held = locks.acquire(&job("job-a")).unwrap();
    let err = locks.acquire(&job("job-a")).unwrap_err();
    assert!(matches!(err, LockError::Held { ref job_id, .. } if job_id == "job-a"), "got {err}");

    // Other jobs are unaffected
    assert!(locks.acquire(&job("job-b")).is_ok());
}

#[test]
fn drop_releases_lock() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());
    {
        let _lock = locks.acquire(&job("job-a")).unwrap();
    }
    assert!(!locks.is_locked(&job("job-a")));
    assert!(locks.acquire(&job("job-a")).is_ok());
}

#[test]
fn explicit_release_removes_file() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());
    let lock = locks.acquire(&job("job-a")).unwrap();
    let path = lock.path().to_path_buf();
    lock.release().unwrap();
    assert!(!path.exists());
}

#[yare::parameterized(
    plain     = { "job-abc_1", "job-abc_1.lock" },
    slash     = { "job/../x", "job%2F..%2Fx.lock" },
    space     = { "my job", "my%20job.lock" },
    dotted    = { "nightly.home", "nightly.home.lock" },
)]
fn lock_file_names_are_encoded(id: &str, file: &str) {
    let locks = LockDir::new("/run/sj");
    assert_eq!(locks.path_for(&job(id)), PathBuf::from("/run/sj").join(file));
}

#[test]
fn ids_differing_only_in_unsafe_characters_lock_separately() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());

    let _dotted = locks.acquire(&job("nightly.home")).unwrap();
    let _spaced = locks.acquire(&job("nightly home")).unwrap();
    let _plain = locks.acquire(&job("nightly_home")).unwrap();

    let ids: Vec<String> = locks.holders().unwrap().into_iter().map(|l| l.job_id.to_string()).collect();
    assert_eq!(ids, vec!["nightly home", "nightly.home", "nightly_home"]);
}

#[test]
fn holders_lists_lock_files_only() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());
    let _a = locks.acquire(&job("job-a")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let holders = locks.holders().unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].job_id, "job-a");
    assert_eq!(holders[0].pid, Some(std::process::id()));
    assert!(!holders[0].is_stale());
}

#[test]
fn holders_of_missing_dir_is_empty() {
    let dir = tempdir().unwrap();
    assert!(LockDir::new(dir.path().join("nope")).holders().unwrap().is_empty());
}

#[test]
fn stale_locks_detects_dead_and_unreadable_owners() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());
    let _live = locks.acquire(&job("job-live")).unwrap();
    // Pid far above any pid_max
    std::fs::write(dir.path().join("job-dead.lock"), "2147483646\n").unwrap();
    std::fs::write(dir.path().join("job-empty.lock"), "").unwrap();

    let stale: Vec<String> =
        locks.stale_locks().unwrap().into_iter().map(|l| l.job_id.to_string()).collect();
    assert_eq!(stale, vec!["job-dead", "job-empty"]);
}

#[test]
fn clear_all_removes_every_lock() {
    let dir = tempdir().unwrap();
    let locks = LockDir::new(dir.path());
    let a = locks.acquire(&job("job-a")).unwrap();
    std::fs::write(dir.path().join("job-b.lock"), "1\n").unwrap();

    let cleared = locks.clear_all().unwrap();
    assert_eq!(cleared.len(), 2);
    assert!(locks.holders().unwrap().is_empty());

    // Dropping a guard whose file is already gone is fine
    drop(a);
    assert!(!locks.clear(&job("job-a")).unwrap());
}
