// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::JobId;

#[test]
fn not_found_maps_to_its_own_code() {
    let err = ExitError::from(AppError::JobNotFound("weekly".to_string()));
    assert_eq!(err.code, NOT_FOUND);
    assert_eq!(err.to_string(), "no job named `weekly`");
}

#[test]
fn held_lock_maps_to_lock_code() {
    let err = ExitError::from(AppError::Start(StartError::LockHeld { job_id: JobId::new("job-1") }));
    assert_eq!(err.code, LOCK_HELD);
    assert_eq!(err.message, "job job-1 is already running");
}

#[test]
fn other_errors_are_plain_failures() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = ExitError::from(AppError::Lock(sj_engine::LockError::Io {
        path: "/locks/job-1.lock".into(),
        source: io,
    }));
    assert_eq!(err.code, FAILED);
}
