// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job execution: locking, hooks, sequential tasks, state transitions.
//!
//! The orchestrator is the single authority over each job's
//! [`ProcessState`]. A run goes:
//!
//! ```text
//! lock ─► Running ─► job before ─► tasks… ─► terminal state ─► job after hooks ─► unlock ─► Startable
//! ```
//!
//! The run body executes on its own tokio task, watched by a supervisor task
//! that owns the lock. A panic in the body, or a caller that stops waiting,
//! still ends with the job settled, unlocked and startable.

mod control;
mod process;
mod run;

use crate::bus::EventBus;
use crate::command::PathStyle;
use crate::lock::{JobLock, LockDir, LockError};
use crate::sink::LogSink;
use control::RunControl;
use parking_lot::Mutex;
use run::JobRun;
use sj_adapters::ProcessAdapter;
use sj_core::{
    transition, HookKind, HookOutcome, HookScope, Job, JobEvent, JobId, ProcessState, Task, TaskId,
    TaskOutcome, Transition, TransitionError,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinError;

/// Why a run could not be started.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("job {job_id} is already running")]
    LockHeld { job_id: JobId },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    State(#[from] TransitionError),
}

/// Static settings shared by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Sync tool executable
    pub tool: String,
    pub lock_dir: PathBuf,
    /// Grace period between SIGTERM and kill when cancelling
    pub kill_timeout: Duration,
    pub path_style: PathStyle,
}

impl RunSettings {
    pub fn new(tool: impl Into<String>, lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            lock_dir: lock_dir.into(),
            kill_timeout: Duration::from_secs(5),
            path_style: PathStyle::native(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task_id: TaskId,
    pub name: String,
    pub outcome: TaskOutcome,
}

/// A hook that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub scope: HookScope,
    pub kind: HookKind,
    pub outcome: HookOutcome,
}

/// What happened during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub job_id: JobId,
    /// Terminal state the run ended in (the job is startable again afterwards)
    pub final_state: ProcessState,
    pub tasks: Vec<TaskReport>,
    pub hook_failures: Vec<HookFailure>,
}

impl RunReport {
    pub(crate) fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            final_state: ProcessState::Running,
            tasks: Vec::new(),
            hook_failures: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.final_state == ProcessState::Finished
    }

    pub fn cancelled(&self) -> bool {
        self.final_state == ProcessState::Cancelled
    }
}

pub(crate) struct Inner<P> {
    pub(crate) settings: RunSettings,
    pub(crate) adapter: P,
    locks: LockDir,
    pub(crate) sink: Arc<dyn LogSink>,
    pub(crate) bus: EventBus,
    states: Mutex<HashMap<JobId, ProcessState>>,
    runs: Mutex<HashMap<JobId, Arc<RunControl>>>,
}

/// Runs jobs. Cheap to clone; clones share state.
pub struct Orchestrator<P: ProcessAdapter> {
    inner: Arc<Inner<P>>,
}

impl<P: ProcessAdapter> Clone for Orchestrator<P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<P: ProcessAdapter> Orchestrator<P> {
    pub fn new(settings: RunSettings, adapter: P, sink: Arc<dyn LogSink>) -> Self {
        let locks = LockDir::new(settings.lock_dir.clone());
        Self {
            inner: Arc::new(Inner {
                settings,
                adapter,
                locks,
                sink,
                bus: EventBus::new(),
                states: Mutex::new(HashMap::new()),
                runs: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.inner.settings
    }

    pub fn locks(&self) -> &LockDir {
        &self.inner.locks
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// Events for all jobs.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<JobEvent> {
        self.inner.bus.subscribe()
    }

    /// Events for one job.
    pub fn subscribe_job(&self, job_id: JobId) -> mpsc::UnboundedReceiver<JobEvent> {
        self.inner.bus.subscribe_job(job_id)
    }

    /// Current state of `job_id` in this process.
    pub fn state(&self, job_id: &JobId) -> ProcessState {
        self.inner.states.lock().get(job_id).copied().unwrap_or_default()
    }

    pub fn is_running(&self, job_id: &JobId) -> bool {
        self.inner.runs.lock().contains_key(job_id)
    }

    /// Run `job` over `tasks` (already resolved, in order) to completion.
    ///
    /// Fails fast with [`StartError::LockHeld`] if the job is running
    /// anywhere; nothing is spawned in that case.
    pub async fn start(&self, job: &Job, tasks: Vec<Task>) -> Result<RunReport, StartError> {
        let lock = match self.inner.locks.acquire(&job.id) {
            Ok(lock) => lock,
            Err(LockError::Held { job_id, .. }) => {
                tracing::info!(job_id = %job_id, "start refused, lock held");
                return Err(StartError::LockHeld { job_id });
            }
            Err(e) => return Err(e.into()),
        };
        self.apply(&job.id, Transition::Start)?;

        let control = Arc::new(RunControl::new());
        self.inner.runs.lock().insert(job.id.clone(), Arc::clone(&control));
        tracing::info!(job_id = %job.id, job = %job.name, tasks = tasks.len(), "job started");

        let run = JobRun::new(self.clone(), job.clone(), Arc::clone(&control));
        let this = self.clone();
        let job_id = job.id.clone();
        let supervisor = tokio::spawn(async move {
            let joined = tokio::spawn(run.execute(tasks)).await;
            this.finish(&job_id, &control, lock, joined)
        });

        // The supervisor owns the lock, so dropping this future leaves the
        // run and its cleanup going
        match supervisor.await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "job supervisor aborted");
                let mut report = RunReport::new(job.id.clone());
                report.final_state = ProcessState::Failed;
                Ok(report)
            }
        }
    }

    /// Settle a run whose body has returned or died: record a terminal
    /// state if the body did not, then unlock and reset.
    fn finish(
        &self,
        job_id: &JobId,
        control: &RunControl,
        lock: JobLock,
        joined: Result<RunReport, JoinError>,
    ) -> RunReport {
        let report = match joined {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "job run aborted");
                let cancelled = control.settle();
                let mut report = RunReport::new(job_id.clone());
                report.final_state = self.state(job_id);
                if report.final_state == ProcessState::Running {
                    let terminal = if cancelled { Transition::Cancel } else { Transition::Fail };
                    report.final_state = self.apply_logged(job_id, terminal);
                }
                report
            }
        };

        self.inner.runs.lock().remove(job_id);
        if let Err(e) = lock.release() {
            tracing::warn!(job_id = %job_id, error = %e, "failed to release lock");
        }
        self.apply_logged(job_id, Transition::Reset);
        tracing::info!(job_id = %job_id, state = %report.final_state, "job ended");
        report
    }

    /// Request cancellation of a running job.
    ///
    /// Returns false (and does nothing) if the job is not running here, was
    /// already cancelled, or is past the point where it can be cancelled.
    pub fn cancel(&self, job_id: &JobId) -> bool {
        let control = self.inner.runs.lock().get(job_id).cloned();
        let cancelled = control.is_some_and(|c| c.cancel());
        if cancelled {
            tracing::info!(job_id = %job_id, "cancel requested");
        }
        cancelled
    }

    /// Apply a transition, then notify the sink and subscribers.
    ///
    /// Notifications are sent while the state table is locked so they are
    /// delivered in transition order.
    pub(crate) fn apply(
        &self,
        job_id: &JobId,
        t: Transition,
    ) -> Result<ProcessState, TransitionError> {
        let mut states = self.inner.states.lock();
        let current = states.get(job_id).copied().unwrap_or_default();
        let step = transition(job_id, current, t)?;
        if step.state == ProcessState::Startable {
            states.remove(job_id);
        } else {
            states.insert(job_id.clone(), step.state);
        }
        for event in step.events {
            if let JobEvent::StateChanged { from, to, .. } = &event {
                self.inner.sink.state_changed(job_id, *from, *to);
            }
            self.inner.bus.publish(event);
        }
        Ok(step.state)
    }

    /// [`apply`](Self::apply) for paths that cannot return an error; an
    /// illegal transition is logged and the current state returned.
    pub(crate) fn apply_logged(&self, job_id: &JobId, t: Transition) -> ProcessState {
        match self.apply(job_id, t) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "unexpected state transition");
                self.state(job_id)
            }
        }
    }

    pub(crate) fn inner(&self) -> &Inner<P> {
        &self.inner
    }
}

#[cfg(test)]
#[path = "orchestrator_tests/mod.rs"]
mod tests;
