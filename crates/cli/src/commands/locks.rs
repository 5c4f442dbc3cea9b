// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sj --clear-locks`

use crate::color;
use crate::exit_error::ExitError;
use anyhow::Result;
use sj_engine::{AppContext, LockInfo};

pub fn handle(ctx: &AppContext) -> Result<()> {
    let stale = ctx.stale_locks().map_err(ExitError::from)?;
    let cleared = ctx.clear_locks().map_err(ExitError::from)?;
    if cleared.is_empty() {
        println!("No locks");
        return Ok(());
    }
    for lock in &cleared {
        let live = !stale.iter().any(|s| s.path == lock.path);
        println!("Cleared {}", describe(lock, live));
    }
    Ok(())
}

pub(crate) fn describe(lock: &LockInfo, live: bool) -> String {
    let owner = match lock.pid {
        Some(pid) if live => format!("pid {pid}, still running"),
        Some(pid) => format!("pid {pid}"),
        None => "no owner recorded".to_string(),
    };
    format!("{} {}", color::literal(lock.job_id.as_str()), color::muted(&format!("({owner})")))
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
