// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One run of one job.

use super::control::RunControl;
use super::process::{run_supervised, Emitter, Exit, OutputRoute};
use super::{HookFailure, Orchestrator, RunReport, TaskReport};
use crate::command::build_command_with;
use sj_adapters::{ProcessAdapter, ProcessSpec};
use sj_core::{
    Hook, HookKind, HookOutcome, HookScope, Job, JobEvent, LogMode, ProcessState, StreamKind,
    Task, TaskOutcome, Transition,
};
use std::sync::Arc;

pub(crate) struct JobRun<P: ProcessAdapter> {
    orchestrator: Orchestrator<P>,
    job: Job,
    control: Arc<RunControl>,
    emitter: Emitter,
}

impl<P: ProcessAdapter> JobRun<P> {
    pub(crate) fn new(orchestrator: Orchestrator<P>, job: Job, control: Arc<RunControl>) -> Self {
        let inner = orchestrator.inner();
        let emitter = Emitter::new(job.id.clone(), Arc::clone(&inner.sink), inner.bus.clone());
        Self { orchestrator, job, control, emitter }
    }

    /// Run the job body and its terminal transition. The caller releases
    /// the lock and resets the state.
    pub(crate) async fn execute(self, tasks: Vec<Task>) -> RunReport {
        let mut report = RunReport::new(self.job.id.clone());
        self.info(LogMode::Normal, format!("job {} started", self.job.name));

        let hooks = &self.job.execute;
        let env = self.hook_env(None);

        let before =
            self.run_hook(&mut report, HookScope::Job, HookKind::Before, &hooks.before, &env).await;
        let before_ok = !matches!(&before, Some(outcome) if !outcome.is_success());

        if before_ok {
            for task in &tasks {
                if self.control.is_cancelled() {
                    break;
                }
                let outcome = self.run_task(&mut report, task).await;
                report.tasks.push(TaskReport {
                    task_id: task.id.clone(),
                    name: task.name.clone(),
                    outcome,
                });
            }
        } else {
            tracing::warn!(job_id = %self.job.id, "job before hook failed, skipping tasks");
        }

        let cancelled = self.control.settle();
        let failed = !before_ok || report.tasks.iter().any(|t| t.outcome.is_failure());
        let terminal = if cancelled {
            Transition::Cancel
        } else if failed {
            Transition::Fail
        } else {
            Transition::Finish
        };
        report.final_state = self.orchestrator.apply_logged(&self.job.id, terminal);
        self.info(LogMode::Normal, format!("job {} {}", self.job.name, report.final_state));

        let (kind, hook) = if report.final_state == ProcessState::Finished {
            (HookKind::AfterSuccess, &hooks.after_success)
        } else {
            (HookKind::AfterFailure, &hooks.after_failure)
        };
        self.run_hook(&mut report, HookScope::Job, kind, hook, &env).await;
        self.run_hook(&mut report, HookScope::Job, HookKind::After, &hooks.after, &env).await;
        report
    }

    async fn run_task(&self, report: &mut RunReport, task: &Task) -> TaskOutcome {
        let inner = self.orchestrator.inner();
        let args = build_command_with(task, inner.settings.path_style);
        let env = task.env_vars();
        let scope = HookScope::Task(task.id.clone());

        self.emitter.publish(JobEvent::TaskStarted {
            job_id: self.job.id.clone(),
            task_id: task.id.clone(),
            args: args.clone(),
        });
        self.info(LogMode::Normal, format!("task {} started", task.name));
        tracing::info!(job_id = %self.job.id, task_id = %task.id, "task started");

        if !task.is_runnable() {
            tracing::warn!(job_id = %self.job.id, task_id = %task.id, "task lacks a source or destination, not syncing");
            let outcome = TaskOutcome::Failed { exit_code: None };
            self.finish_task(task, &outcome);
            return outcome;
        }

        let mut hook_env = env.clone();
        hook_env.extend(self.hook_env(Some(task)));

        let before = self
            .run_hook(report, scope.clone(), HookKind::Before, &task.execute.before, &hook_env)
            .await;
        let outcome = match before {
            Some(HookOutcome::Cancelled) => TaskOutcome::Cancelled,
            Some(ref outcome) if !outcome.is_success() => TaskOutcome::HookFailed,
            _ => {
                let spec = ProcessSpec::new(inner.settings.tool.clone(), args).with_env(env);
                self.info(LogMode::Verbose, format!("command: {}", spec.command_line()));
                let exit = run_supervised(
                    &inner.adapter,
                    &spec,
                    OutputRoute::for_tool(self.job.log),
                    &self.emitter,
                    Some(self.control.token()),
                    inner.settings.kill_timeout,
                )
                .await;
                task_outcome(exit)
            }
        };

        self.finish_task(task, &outcome);

        let hooks = &task.execute;
        let conditional = match outcome {
            TaskOutcome::Succeeded if self.control.is_cancelled() => None,
            TaskOutcome::Succeeded => Some((HookKind::AfterSuccess, &hooks.after_ok)),
            _ => Some((HookKind::AfterFailure, &hooks.after_fail)),
        };
        if let Some((kind, hook)) = conditional {
            self.run_hook(report, scope.clone(), kind, hook, &hook_env).await;
        }
        self.run_hook(report, scope, HookKind::After, &hooks.after, &hook_env).await;
        outcome
    }

    fn finish_task(&self, task: &Task, outcome: &TaskOutcome) {
        self.emitter.publish(JobEvent::TaskFinished {
            job_id: self.job.id.clone(),
            task_id: task.id.clone(),
            outcome: outcome.clone(),
        });
        self.info(LogMode::Normal, format!("task {} {outcome}", task.name));
        if outcome.is_failure() {
            tracing::warn!(job_id = %self.job.id, task_id = %task.id, %outcome, "task failed");
        } else {
            tracing::info!(job_id = %self.job.id, task_id = %task.id, %outcome, "task finished");
        }
    }

    /// Run an enabled hook; `None` if it is disabled.
    ///
    /// Before-hooks are killed on cancellation. After-hooks always run to
    /// completion.
    async fn run_hook(
        &self,
        report: &mut RunReport,
        scope: HookScope,
        kind: HookKind,
        hook: &Hook,
        env: &[(String, String)],
    ) -> Option<HookOutcome> {
        if !hook.is_enabled() {
            return None;
        }
        let program = hook.program()?;
        let inner = self.orchestrator.inner();
        let spec = ProcessSpec::new(program, hook.args().map(str::to_string).collect())
            .with_env(env.to_vec());
        self.info(LogMode::Verbose, format!("{scope} {kind} hook: {}", spec.command_line()));

        let cancel = (kind == HookKind::Before).then(|| self.control.token());
        let exit = run_supervised(
            &inner.adapter,
            &spec,
            OutputRoute::for_hook(self.job.log),
            &self.emitter,
            cancel,
            inner.settings.kill_timeout,
        )
        .await;
        let outcome = hook_outcome(exit);

        self.emitter.publish(JobEvent::HookFinished {
            job_id: self.job.id.clone(),
            scope: scope.clone(),
            kind,
            outcome: outcome.clone(),
        });
        if !outcome.is_success() {
            tracing::warn!(job_id = %self.job.id, %scope, %kind, %outcome, "hook did not succeed");
            self.info(LogMode::Normal, format!("{scope} {kind} hook {outcome}"));
            report.hook_failures.push(HookFailure { scope, kind, outcome: outcome.clone() });
        }
        Some(outcome)
    }

    /// Variables describing the run, exported to hooks.
    fn hook_env(&self, task: Option<&Task>) -> Vec<(String, String)> {
        let mut env = vec![
            ("SJ_JOB_ID".to_string(), self.job.id.to_string()),
            ("SJ_JOB_NAME".to_string(), self.job.name.clone()),
        ];
        if let Some(task) = task {
            env.push(("SJ_TASK_ID".to_string(), task.id.to_string()));
            env.push(("SJ_TASK_NAME".to_string(), task.name.clone()));
        }
        env
    }

    /// Orchestrator line on the job's sink, shown when the job's log mode is
    /// at least `level`.
    fn info(&self, level: LogMode, line: String) {
        if self.job.log_mode >= level {
            self.emitter.line(StreamKind::Info, &line);
        }
    }
}

fn task_outcome(exit: Exit) -> TaskOutcome {
    match exit {
        Exit::Code(0) => TaskOutcome::Succeeded,
        Exit::Code(code) => TaskOutcome::Failed { exit_code: Some(code) },
        Exit::Signal => TaskOutcome::Failed { exit_code: None },
        Exit::Lost(e) => {
            tracing::warn!(error = %e, "lost track of sync process");
            TaskOutcome::Failed { exit_code: None }
        }
        Exit::SpawnFailed(e) => TaskOutcome::SpawnFailed(e),
        Exit::Cancelled => TaskOutcome::Cancelled,
    }
}

fn hook_outcome(exit: Exit) -> HookOutcome {
    match exit {
        Exit::Code(0) => HookOutcome::Succeeded,
        Exit::Code(code) => HookOutcome::Failed { exit_code: Some(code) },
        Exit::Signal => HookOutcome::Failed { exit_code: None },
        Exit::Lost(e) => {
            tracing::warn!(error = %e, "lost track of hook process");
            HookOutcome::Failed { exit_code: None }
        }
        Exit::SpawnFailed(e) => HookOutcome::SpawnFailed(e),
        Exit::Cancelled => HookOutcome::Cancelled,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
