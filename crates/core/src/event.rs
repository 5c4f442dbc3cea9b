// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published while a job runs

use crate::job::JobId;
use crate::state::ProcessState;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};

/// Channel a log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stdout,
    Stderr,
    /// Lines written by the orchestrator itself
    Info,
}

crate::simple_display! {
    StreamKind {
        Stdout => "out",
        Stderr => "err",
        Info => "info",
    }
}

/// Lifecycle point a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Before,
    AfterSuccess,
    AfterFailure,
    After,
}

crate::simple_display! {
    HookKind {
        Before => "before",
        AfterSuccess => "after-success",
        AfterFailure => "after-failure",
        After => "after",
    }
}

/// Whether a hook belongs to the job or to one of its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookScope {
    Job,
    Task(TaskId),
}

impl std::fmt::Display for HookScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookScope::Job => f.write_str("job"),
            HookScope::Task(id) => write!(f, "task {id}"),
        }
    }
}

/// Result of running one hook command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookOutcome {
    Succeeded,
    Failed { exit_code: Option<i32> },
    SpawnFailed(String),
    Cancelled,
}

impl HookOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, HookOutcome::Succeeded)
    }
}

impl std::fmt::Display for HookOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookOutcome::Succeeded => f.write_str("succeeded"),
            HookOutcome::Failed { exit_code: Some(code) } => write!(f, "failed (exit {code})"),
            HookOutcome::Failed { exit_code: None } => f.write_str("failed (killed by signal)"),
            HookOutcome::SpawnFailed(msg) => write!(f, "could not be started: {msg}"),
            HookOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of one task's sync step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Succeeded,
    /// Tool exited non-zero (`None` when terminated by a signal)
    Failed { exit_code: Option<i32> },
    /// Tool could not be launched
    SpawnFailed(String),
    /// Task before-hook failed; the sync step was skipped
    HookFailed,
    Cancelled,
}

impl TaskOutcome {
    /// True for outcomes that make the job fail.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TaskOutcome::Failed { .. } | TaskOutcome::SpawnFailed(_) | TaskOutcome::HookFailed
        )
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Succeeded => f.write_str("succeeded"),
            TaskOutcome::Failed { exit_code: Some(code) } => write!(f, "failed (exit {code})"),
            TaskOutcome::Failed { exit_code: None } => f.write_str("failed (killed by signal)"),
            TaskOutcome::SpawnFailed(msg) => write!(f, "tool could not be started: {msg}"),
            TaskOutcome::HookFailed => f.write_str("skipped (before hook failed)"),
            TaskOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Events published by the orchestrator, in emission order per job.
///
/// Serializes with `{"type": "scope:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JobEvent {
    #[serde(rename = "job:state")]
    StateChanged { job_id: JobId, from: ProcessState, to: ProcessState },

    #[serde(rename = "task:started")]
    TaskStarted { job_id: JobId, task_id: TaskId, args: Vec<String> },

    #[serde(rename = "task:finished")]
    TaskFinished { job_id: JobId, task_id: TaskId, outcome: TaskOutcome },

    #[serde(rename = "hook:finished")]
    HookFinished { job_id: JobId, scope: HookScope, kind: HookKind, outcome: HookOutcome },

    #[serde(rename = "output")]
    Output { job_id: JobId, stream: StreamKind, line: String },
}

impl JobEvent {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobEvent::StateChanged { job_id, .. }
            | JobEvent::TaskStarted { job_id, .. }
            | JobEvent::TaskFinished { job_id, .. }
            | JobEvent::HookFinished { job_id, .. }
            | JobEvent::Output { job_id, .. } => job_id,
        }
    }

    /// Stable event name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::StateChanged { .. } => "job:state",
            JobEvent::TaskStarted { .. } => "task:started",
            JobEvent::TaskFinished { .. } => "task:finished",
            JobEvent::HookFinished { .. } => "hook:finished",
            JobEvent::Output { .. } => "output",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
