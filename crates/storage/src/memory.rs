// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::repository::{Repository, RepositoryError, StoreData};
use parking_lot::RwLock;
use sj_core::{Job, JobId, Task, TaskId};

/// Repository held entirely in memory.
#[derive(Default)]
pub struct MemoryRepository {
    data: RwLock<StoreData>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: StoreData) -> Self {
        Self { data: RwLock::new(data) }
    }

    /// Seed with jobs and tasks.
    pub fn with(jobs: impl IntoIterator<Item = Job>, tasks: impl IntoIterator<Item = Task>) -> Self {
        let data = StoreData {
            jobs: jobs.into_iter().map(|j| (j.id.clone(), j)).collect(),
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        };
        Self::from_data(data)
    }
}

impl Repository for MemoryRepository {
    fn job(&self, id: &JobId) -> Option<Job> {
        self.data.read().jobs.get(id).cloned()
    }

    fn task(&self, id: &TaskId) -> Option<Task> {
        self.data.read().tasks.get(id).cloned()
    }

    fn jobs(&self) -> Vec<Job> {
        self.data.read().sorted_jobs()
    }

    fn tasks(&self) -> Vec<Task> {
        self.data.read().sorted_tasks()
    }

    fn put_job(&self, job: Job) -> Result<(), RepositoryError> {
        self.data.write().jobs.insert(job.id.clone(), job);
        Ok(())
    }

    fn put_task(&self, task: Task) -> Result<(), RepositoryError> {
        self.data.write().tasks.insert(task.id.clone(), task);
        Ok(())
    }

    fn delete_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.data.write().jobs.remove(id))
    }

    fn delete_task(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        Ok(self.data.write().tasks.remove(id))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
