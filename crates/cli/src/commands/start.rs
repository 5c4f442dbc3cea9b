// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sj --start <job>`: run a job in the foreground, streaming its output.

use crate::color;
use crate::exit_error::{ExitError, FAILED};
use crate::output::{format_hook_failures, format_summary, print_event};
use anyhow::{anyhow, Result};
use sj_core::ProcessState;
use sj_engine::{AppContext, RunReport};

pub async fn handle(ctx: &AppContext, name_or_id: &str) -> Result<()> {
    let job = ctx.find_job(name_or_id).map_err(ExitError::from)?;
    let mut events = ctx.orchestrator().subscribe_job(job.id.clone());
    let mut run = ctx.spawn_job(job.id.as_str());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    let joined = loop {
        tokio::select! {
            joined = &mut run => break joined,
            Some(event) = events.recv() => print_event(&event),
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                eprintln!("{}", color::context("cancelling..."));
                if !ctx.orchestrator().cancel(&job.id) {
                    tracing::debug!(job_id = %job.id, "interrupt arrived while job was not running");
                }
            }
        }
    };
    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }

    let report = joined.map_err(|e| anyhow!("run of {} aborted: {e}", job.name))?.map_err(ExitError::from)?;
    println!("{}", format_summary(&job.name, &report));
    for line in format_hook_failures(&report) {
        eprintln!("{line}");
    }
    outcome(&job.name, &report)
}

pub(crate) fn outcome(job_name: &str, report: &RunReport) -> Result<()> {
    match report.final_state {
        ProcessState::Finished => Ok(()),
        state => Err(ExitError::new(FAILED, format!("job {job_name} {state}")).into()),
    }
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
