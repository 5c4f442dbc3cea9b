// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use clap::ValueEnum;
use sj_core::{JobEvent, StreamKind};
use sj_engine::{RunReport, ValidationReport};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Echo a live run event. Only output lines are shown; state changes are
/// summarized once the run ends.
pub fn print_event(event: &JobEvent) {
    if let JobEvent::Output { stream, line, .. } = event {
        match stream {
            StreamKind::Stdout => println!("{line}"),
            StreamKind::Stderr => eprintln!("{line}"),
            StreamKind::Info => println!("{}", color::context(line)),
        }
    }
}

/// One-line outcome of a run, e.g. `nightly: finished (2 tasks, 0 failed)`.
pub fn format_summary(job_name: &str, report: &RunReport) -> String {
    let failed = report.tasks.iter().filter(|t| t.outcome.is_failure()).count();
    let tasks = report.tasks.len();
    format!(
        "{}: {} ({} task{}, {} failed)",
        color::header(job_name),
        color::state(report.final_state),
        tasks,
        if tasks == 1 { "" } else { "s" },
        failed
    )
}

/// Lines describing hooks that did not succeed, for stderr.
pub fn format_hook_failures(report: &RunReport) -> Vec<String> {
    report
        .hook_failures
        .iter()
        .map(|f| format!("warning: {} {} hook {}", f.scope, f.kind, f.outcome))
        .collect()
}

pub fn format_validation(report: &ValidationReport) -> String {
    if report.is_valid() {
        format!("{}: ok", color::header(&report.job_name))
    } else {
        report.to_string()
    }
}
