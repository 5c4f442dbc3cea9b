// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-file JSON repository.

use crate::repository::{Repository, RepositoryError, StoreData};
use parking_lot::RwLock;
use sj_core::{Job, JobId, Task, TaskId};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Repository persisted as one JSON document.
///
/// The whole store is loaded at open and rewritten after every mutation.
/// Writes go to a sibling temp file that is fsynced and renamed over the
/// store, so a crash never leaves a truncated document behind.
pub struct FileRepository {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl FileRepository {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|source| RepositoryError::Json { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no store found, starting empty");
                StoreData::default()
            }
            Err(source) => return Err(RepositoryError::Io { path, source }),
        };
        Ok(Self { path, data: RwLock::new(data) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut StoreData) -> R) -> Result<R, RepositoryError> {
        let mut data = self.data.write();
        let mut next = data.clone();
        let result = f(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(result)
    }

    fn persist(&self, data: &StoreData) -> Result<(), RepositoryError> {
        let io_err = |source: std::io::Error| RepositoryError::Io { path: self.path.clone(), source };
        let json = serde_json::to_vec_pretty(data)
            .map_err(|source| RepositoryError::Json { path: self.path.clone(), source })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp).map_err(io_err)?;
            file.write_all(&json).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!(
            path = %self.path.display(),
            jobs = data.jobs.len(),
            tasks = data.tasks.len(),
            "saved store"
        );
        Ok(())
    }
}

impl Repository for FileRepository {
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
        self.mutate(|data| {
            data.jobs.insert(job.id.clone(), job);
        })
    }

    fn put_task(&self, task: Task) -> Result<(), RepositoryError> {
        self.mutate(|data| {
            data.tasks.insert(task.id.clone(), task);
        })
    }

    fn delete_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        self.mutate(|data| data.jobs.remove(id))
    }

    fn delete_task(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        self.mutate(|data| data.tasks.remove(id))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
