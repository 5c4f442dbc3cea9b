// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-core: Data model for the sync jobs (sj) tool

pub mod macros;

pub mod environment;
pub mod event;
pub mod id;
pub mod job;
pub mod state;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use environment::parse_env_assignments;
pub use event::{HookKind, HookOutcome, HookScope, JobEvent, StreamKind, TaskOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{Hook, Job, JobExecuteSection, JobId, LogFlags, LogMode};
pub use state::{transition, ProcessState, Step, Transition, TransitionError};
#[cfg(any(test, feature = "test-support"))]
pub use task::TaskBuilder;
pub use task::{ExcludeSection, OptionSection, Task, TaskExecuteSection, TaskId, TaskOption};
