// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definition: an ordered list of task references plus lifecycle hooks.

use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Stable identifier of a job definition.
    ///
    /// Also names the job's lock file and log file.
    pub struct JobId("job-");
}

/// A user-configured command run at a lifecycle point.
///
/// The command is tokenized on whitespace: the first token names the
/// executable, the rest are passed as arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub active: bool,
}

impl Hook {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), active: true }
    }

    /// True if the hook is switched on and has something to run.
    pub fn is_enabled(&self) -> bool {
        self.active && !self.command.trim().is_empty()
    }

    /// The executable named by the command (first token).
    pub fn program(&self) -> Option<&str> {
        self.command.split_whitespace().next()
    }

    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.command.split_whitespace().skip(1)
    }
}

/// Job-level hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExecuteSection {
    #[serde(default)]
    pub before: Hook,
    #[serde(default)]
    pub after_failure: Hook,
    #[serde(default)]
    pub after_success: Hook,
    #[serde(default)]
    pub after: Hook,
}

impl JobExecuteSection {
    /// Hooks paired with their kind, in lifecycle order.
    pub fn hooks(&self) -> [(crate::HookKind, &Hook); 4] {
        use crate::HookKind;
        [
            (HookKind::Before, &self.before),
            (HookKind::AfterSuccess, &self.after_success),
            (HookKind::AfterFailure, &self.after_failure),
            (HookKind::After, &self.after),
        ]
    }
}

/// How chatty the orchestrator is on the job's log sink.
///
/// Tool output is governed by [`LogFlags`]; this only controls the
/// orchestrator's own informational lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// No informational lines
    Quiet,
    /// Task start/finish and hook outcomes
    #[default]
    Normal,
    /// Also the compiled command line and hook commands
    Verbose,
}

crate::simple_display! {
    LogMode {
        Quiet => "quiet",
        Normal => "normal",
        Verbose => "verbose",
    }
}

/// Which tool streams reach the log sink, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFlags {
    #[serde(default = "default_true")]
    pub capture_stdout: bool,
    #[serde(default = "default_true")]
    pub capture_stderr: bool,
    /// Route stderr lines to their own sink channel instead of merging
    /// them into stdout.
    #[serde(default)]
    pub separate_stderr: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LogFlags {
    fn default() -> Self {
        Self { capture_stdout: true, capture_stderr: true, separate_stderr: false }
    }
}

/// A backup job definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// References into the task store; order is execution order.
    #[serde(default)]
    task_ids: Vec<TaskId>,
    #[serde(default)]
    pub execute: JobExecuteSection,
    #[serde(default)]
    pub log_mode: LogMode,
    #[serde(default)]
    pub log: LogFlags,
}

impl Job {
    /// Create an empty job with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(JobId::generate(), name)
    }

    pub fn with_id(id: JobId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            task_ids: Vec::new(),
            execute: JobExecuteSection::default(),
            log_mode: LogMode::default(),
            log: LogFlags::default(),
        }
    }

    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Append a task reference. Returns false if it is already listed.
    pub fn add_task(&mut self, id: TaskId) -> bool {
        if self.task_ids.contains(&id) {
            return false;
        }
        self.task_ids.push(id);
        true
    }

    /// Remove a task reference. Returns false if it was not listed.
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|t| t != id);
        self.task_ids.len() != before
    }

    /// Move a task reference to `index` (clamped to the end of the list).
    pub fn move_task(&mut self, id: &TaskId, index: usize) -> bool {
        let Some(pos) = self.task_ids.iter().position(|t| t == id) else {
            return false;
        };
        let id = self.task_ids.remove(pos);
        let index = index.min(self.task_ids.len());
        self.task_ids.insert(index, id);
        true
    }

    /// Resolve task references through `lookup`, in list order.
    ///
    /// References that no longer resolve are skipped: jobs and tasks are
    /// edited independently, so a dangling id is not an error.
    pub fn resolve_tasks<F>(&self, mut lookup: F) -> Vec<Task>
    where
        F: FnMut(&TaskId) -> Option<Task>,
    {
        self.task_ids
            .iter()
            .filter_map(|id| {
                let task = lookup(id);
                if task.is_none() {
                    tracing::debug!(job_id = %self.id, task_id = %id, "skipping dangling task reference");
                }
                task
            })
            .collect()
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = "job-test",
            name: String = "test-job",
            description: String = "",
        }
        set {
            task_ids: Vec<TaskId> = Vec::new(),
            execute: JobExecuteSection = JobExecuteSection::default(),
            log_mode: LogMode = LogMode::Normal,
            log: LogFlags = LogFlags::default(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
