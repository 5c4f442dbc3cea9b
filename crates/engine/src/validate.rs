// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-flight checks run before a job is allowed to start.
//!
//! Validation never mutates a job or task. The only side effect is the
//! `<tool> --version` probe, which is always reaped before returning.

use sj_adapters::{run_with_timeout, ProcessAdapter, ProcessSpec};
use sj_core::{Hook, HookKind, Job, JobId, Task};
use std::time::Duration;

pub const HOOK_NOT_FOUND: &str = "Hook not found";
pub const EXCLUDE_FILE_NOT_FOUND: &str = "Exclude file not found";
pub const SOURCE_MISSING: &str = "Source missing";
pub const DESTINATION_MISSING: &str = "Destination missing";
pub const TOOL_NOT_FOUND: &str = "Tool not found";

/// One problem found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub header: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self { header: header.into(), message: message.into() }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.header, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Diagnostic(Diagnostic),
    Section { heading: String, summary: Summary },
}

/// Accumulated diagnostics, renderable as plain text or HTML.
///
/// Nested sections (one per invalid task) are separated by a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    entries: Vec<Entry>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, header: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Entry::Diagnostic(Diagnostic::new(header, message)));
    }

    /// Merge a nested summary under `heading`. Valid summaries are dropped.
    pub fn merge_section(&mut self, heading: impl Into<String>, summary: Summary) {
        if summary.is_valid() {
            return;
        }
        self.entries.push(Entry::Section { heading: heading.into(), summary });
    }

    /// True iff nothing invalid was recorded here or in any section.
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| match e {
            Entry::Diagnostic(_) => false,
            Entry::Section { summary, .. } => summary.is_valid(),
        })
    }

    /// Every diagnostic, depth first.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Diagnostic(d) => out.push(d),
                Entry::Section { summary, .. } => out.extend(summary.diagnostics()),
            }
        }
        out
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Diagnostic(d) => {
                    out.push_str(&d.to_string());
                    out.push('\n');
                }
                Entry::Section { heading, summary } => {
                    out.push_str("---\n");
                    out.push_str(heading);
                    out.push('\n');
                    out.push_str(&summary.text());
                }
            }
        }
        out
    }

    pub fn html(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Diagnostic(d) => {
                    out.push_str(&format!(
                        "<b>{}</b><br/>{}<br/>",
                        escape_html(&d.header),
                        escape_html(&d.message)
                    ));
                }
                Entry::Section { heading, summary } => {
                    out.push_str(&format!("<hr/><i>{}</i><br/>", escape_html(heading)));
                    out.push_str(&summary.html());
                }
            }
        }
        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Whether a hook's executable can be found.
///
/// Names containing a path separator are checked relative to the working
/// directory; bare names are looked up on `PATH`.
fn hook_resolves(hook: &Hook) -> bool {
    match hook.program() {
        Some(program) => which::which(program).is_ok(),
        None => false,
    }
}

fn check_hooks<'a>(summary: &mut Summary, hooks: impl IntoIterator<Item = (HookKind, &'a Hook)>) {
    for (kind, hook) in hooks {
        if hook.is_enabled() && !hook_resolves(hook) {
            summary.add(HOOK_NOT_FOUND, format!("{kind} hook `{}` is not executable", hook.command));
        }
    }
}

/// Checks a single task's hooks, exclude file and paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskValidator;

impl TaskValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, task: &Task) -> Summary {
        let mut summary = Summary::new();
        check_hooks(&mut summary, task.execute.hooks());

        if let Some(file) = &task.exclude.exclude_file {
            if !file.is_file() {
                summary.add(EXCLUDE_FILE_NOT_FOUND, file.display().to_string());
            }
        }
        if task.source.trim().is_empty() {
            summary.add(SOURCE_MISSING, format!("task `{}` has no source path", task.name));
        }
        if task.destination.trim().is_empty() {
            summary.add(DESTINATION_MISSING, format!("task `{}` has no destination path", task.name));
        }
        summary
    }
}

/// Outcome of validating one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub job_id: JobId,
    pub job_name: String,
    pub summary: Summary,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.summary.is_valid()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job `{}` is not runnable:\n{}", self.job_name, self.summary.text())
    }
}

/// Checks the sync tool, the job's hooks and every resolvable task.
pub struct JobValidator<'a, P: ProcessAdapter> {
    adapter: &'a P,
    tool: &'a str,
    timeout: Duration,
}

impl<'a, P: ProcessAdapter> JobValidator<'a, P> {
    pub fn new(adapter: &'a P, tool: &'a str, timeout: Duration) -> Self {
        Self { adapter, tool, timeout }
    }

    /// Validate `job` against its already-resolved `tasks`.
    pub async fn validate(&self, job: &Job, tasks: &[Task]) -> ValidationReport {
        let mut summary = Summary::new();

        if let Err(message) = self.probe_tool().await {
            summary.add(TOOL_NOT_FOUND, message);
        }
        check_hooks(&mut summary, job.execute.hooks());

        let validator = TaskValidator::new();
        for task in tasks {
            summary.merge_section(format!("Task {}", task.name), validator.validate(task));
        }

        if !summary.is_valid() {
            tracing::info!(
                job_id = %job.id,
                problems = summary.diagnostics().len(),
                "job failed validation"
            );
        }
        ValidationReport { job_id: job.id.clone(), job_name: job.name.clone(), summary }
    }

    async fn probe_tool(&self) -> Result<(), String> {
        if self.tool.trim().is_empty() {
            return Err("no sync tool configured".to_string());
        }
        let spec = ProcessSpec::new(self.tool, vec!["--version".to_string()]);
        match run_with_timeout(self.adapter, &spec, self.timeout, "tool version check").await {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(match output.status.code() {
                Some(code) => format!("`{} --version` exited with {code}", self.tool),
                None => format!("`{} --version` was interrupted", self.tool),
            }),
            Err(e) => {
                tracing::debug!(tool = self.tool, error = %e, "tool probe failed");
                Err(format!("`{}` could not be run: {e}", self.tool))
            }
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
