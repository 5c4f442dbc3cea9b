// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository contract for job and task definitions.

use serde::{Deserialize, Serialize};
use sj_core::{Job, JobId, Task, TaskId};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("io error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed store {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

/// Lookup and persistence of job and task definitions, keyed by id.
///
/// Readers (validator, orchestrator) only use the lookup half. Deleting a
/// task does not touch jobs that reference it; such references dangle and
/// are skipped when a job's tasks are resolved.
pub trait Repository: Send + Sync {
    fn job(&self, id: &JobId) -> Option<Job>;
    fn task(&self, id: &TaskId) -> Option<Task>;
    /// All jobs, ordered by name then id.
    fn jobs(&self) -> Vec<Job>;
    /// All tasks, ordered by name then id.
    fn tasks(&self) -> Vec<Task>;
    fn put_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn put_task(&self, task: Task) -> Result<(), RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn delete_task(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError>;

    /// The job's tasks in list order, without dangling references.
    fn resolve_tasks(&self, job: &Job) -> Vec<Task> {
        job.resolve_tasks(|id| self.task(id))
    }

    /// Find a job by exact id, else by exact name.
    fn find_job(&self, name_or_id: &str) -> Option<Job> {
        self.job(&JobId::new(name_or_id))
            .or_else(|| self.jobs().into_iter().find(|j| j.name == name_or_id))
    }
}

/// In-memory contents of a store.
///
/// Serializes as `{ "jobs": [...], "tasks": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreData {
    pub jobs: BTreeMap<JobId, Job>,
    pub tasks: BTreeMap<TaskId, Task>,
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    jobs: Vec<Job>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl StoreData {
    pub(crate) fn sorted_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        jobs
    }

    pub(crate) fn sorted_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        tasks
    }
}

impl Serialize for StoreData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoreFile { jobs: self.sorted_jobs(), tasks: self.sorted_tasks() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StoreData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = StoreFile::deserialize(deserializer)?;
        Ok(StoreData {
            jobs: file.jobs.into_iter().map(|j| (j.id.clone(), j)).collect(),
            tasks: file.tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        })
    }
}
