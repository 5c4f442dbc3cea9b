// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application context: configuration, repository and orchestrator, built
//! once and handed to whatever needs them.

use crate::command::PathStyle;
use crate::config::Config;
use crate::lock::{LockError, LockInfo};
use crate::orchestrator::{Orchestrator, RunReport, RunSettings, StartError};
use crate::sink::{FileLogSink, LogSink};
use crate::validate::{JobValidator, ValidationReport};
use sj_adapters::{ProcessAdapter, SystemProcessAdapter};
use sj_core::{Job, JobId, ProcessState};
use sj_storage::{FileRepository, Repository, RepositoryError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no job named `{0}`")]
    JobNotFound(String),
    #[error("{0}")]
    Validation(Box<ValidationReport>),
    #[error(transparent)]
    Start(#[from] StartError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// One line of `--list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub id: JobId,
    pub name: String,
    pub description: String,
    /// Resolvable tasks only
    pub task_count: usize,
    pub state: ProcessState,
    /// A lock file exists, possibly held by another process
    pub locked: bool,
}

pub struct AppContext<P: ProcessAdapter = SystemProcessAdapter> {
    config: Config,
    repository: Arc<dyn Repository>,
    adapter: P,
    orchestrator: Orchestrator<P>,
}

impl<P: ProcessAdapter> Clone for AppContext<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            repository: Arc::clone(&self.repository),
            adapter: self.adapter.clone(),
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl AppContext<SystemProcessAdapter> {
    /// Open the configured store and log directory.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let repository = FileRepository::open(&config.store)?;
        let sink = FileLogSink::new(&config.log_dir);
        Ok(Self::new(config, Arc::new(repository), SystemProcessAdapter, Arc::new(sink)))
    }
}

impl<P: ProcessAdapter> AppContext<P> {
    pub fn new(
        config: Config,
        repository: Arc<dyn Repository>,
        adapter: P,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        let settings = RunSettings {
            tool: config.tool.clone(),
            lock_dir: config.lock_dir.clone(),
            kill_timeout: config.kill_timeout,
            path_style: PathStyle::native(),
        };
        let orchestrator = Orchestrator::new(settings, adapter.clone(), sink);
        Self { config, repository, adapter, orchestrator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }

    pub fn orchestrator(&self) -> &Orchestrator<P> {
        &self.orchestrator
    }

    pub fn list_jobs(&self) -> Vec<JobSummary> {
        self.repository
            .jobs()
            .into_iter()
            .map(|job| JobSummary {
                task_count: self.repository.resolve_tasks(&job).len(),
                state: self.orchestrator.state(&job.id),
                locked: self.orchestrator.locks().is_locked(&job.id),
                id: job.id,
                name: job.name,
                description: job.description,
            })
            .collect()
    }

    /// Look a job up by id, then by name.
    pub fn find_job(&self, name_or_id: &str) -> Result<Job, AppError> {
        self.repository
            .find_job(name_or_id)
            .ok_or_else(|| AppError::JobNotFound(name_or_id.to_string()))
    }

    pub async fn validate_job(&self, job: &Job) -> ValidationReport {
        let tasks = self.repository.resolve_tasks(job);
        JobValidator::new(&self.adapter, &self.config.tool, self.config.version_timeout)
            .validate(job, &tasks)
            .await
    }

    /// Validate and run a job to completion.
    ///
    /// A held lock is reported before validation so nothing at all is
    /// spawned for a job that is already running.
    pub async fn start_job(&self, name_or_id: &str) -> Result<RunReport, AppError> {
        let job = self.find_job(name_or_id)?;
        if self.orchestrator.locks().is_locked(&job.id) {
            return Err(StartError::LockHeld { job_id: job.id }.into());
        }

        let report = self.validate_job(&job).await;
        if !report.is_valid() {
            return Err(AppError::Validation(Box::new(report)));
        }

        let tasks = self.repository.resolve_tasks(&job);
        Ok(self.orchestrator.start(&job, tasks).await?)
    }

    /// [`start_job`](Self::start_job) on its own tokio task.
    pub fn spawn_job(&self, name_or_id: &str) -> JoinHandle<Result<RunReport, AppError>> {
        let ctx = self.clone();
        let name_or_id = name_or_id.to_string();
        tokio::spawn(async move { ctx.start_job(&name_or_id).await })
    }

    /// Cancel a running job. False if it was not running here.
    pub fn cancel_job(&self, name_or_id: &str) -> Result<bool, AppError> {
        let job = self.find_job(name_or_id)?;
        Ok(self.orchestrator.cancel(&job.id))
    }

    /// Locks whose owning process is gone.
    pub fn stale_locks(&self) -> Result<Vec<LockInfo>, AppError> {
        Ok(self.orchestrator.locks().stale_locks()?)
    }

    /// Remove every lock file. For use after an abnormal shutdown, when no
    /// job can legitimately be running.
    pub fn clear_locks(&self) -> Result<Vec<LockInfo>, AppError> {
        Ok(self.orchestrator.locks().clear_all()?)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
