// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use sj_core::JobId;
use yare::parameterized;

#[parameterized(
    dead_owner = { Some(4242), false, "job-1 (pid 4242)" },
    live_owner = { Some(4242), true, "job-1 (pid 4242, still running)" },
    no_owner = { None, false, "job-1 (no owner recorded)" },
)]
#[serial]
fn describes_lock_owner(pid: Option<u32>, live: bool, expected: &str) {
    std::env::set_var("NO_COLOR", "1");
    let lock = LockInfo { job_id: JobId::new("job-1"), pid, path: "/locks/job-1.lock".into() };
    assert_eq!(describe(&lock, live), expected);
}
