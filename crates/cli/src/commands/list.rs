// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use crate::output::OutputFormat;
use crate::table::{Column, Table};
use anyhow::Result;
use sj_core::ProcessState;
use sj_engine::{AppContext, JobSummary};
use std::io::Write;

pub fn handle(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let jobs = ctx.list_jobs();
    match format {
        OutputFormat::Text => format_job_list(&mut std::io::stdout().lock(), &jobs),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&jobs_json(&jobs))?),
    }
    Ok(())
}

pub(crate) fn format_job_list(out: &mut (impl Write + ?Sized), jobs: &[JobSummary]) {
    if jobs.is_empty() {
        let _ = writeln!(out, "No jobs");
        return;
    }

    let mut table = Table::new(vec![
        Column::muted("ID"),
        Column::left("NAME"),
        Column::right("TASKS"),
        Column::left("STATE"),
        Column::left("DESCRIPTION"),
    ]);
    for job in jobs {
        table.row(vec![
            job.id.to_string(),
            job.name.clone(),
            job.task_count.to_string(),
            state_cell(job),
            job.description.clone(),
        ]);
    }
    table.render(out);
}

/// A lock without a run in this process means another `sj` owns the job.
fn state_cell(job: &JobSummary) -> String {
    if job.locked && job.state == ProcessState::Startable {
        color::state(ProcessState::Running)
    } else {
        color::state(job.state)
    }
}

pub(crate) fn jobs_json(jobs: &[JobSummary]) -> serde_json::Value {
    jobs.iter()
        .map(|job| {
            serde_json::json!({
                "id": job.id,
                "name": job.name,
                "description": job.description,
                "tasks": job.task_count,
                "state": job.state.to_string(),
                "locked": job.locked,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
