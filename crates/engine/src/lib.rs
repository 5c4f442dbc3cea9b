// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-engine: Command building, validation, locking and job execution

pub mod bus;
pub mod command;
pub mod config;
pub mod context;
pub mod env;
pub mod lock;
pub mod orchestrator;
pub mod sink;
pub mod validate;

#[cfg(test)]
mod test_helpers;

pub use bus::EventBus;
pub use command::{build_command, build_command_with, to_cygwin_path, ArgList, PathStyle};
pub use config::{Config, ConfigError};
pub use context::{AppContext, AppError, JobSummary};
pub use lock::{JobLock, LockDir, LockError, LockInfo};
pub use orchestrator::{HookFailure, Orchestrator, RunReport, RunSettings, StartError, TaskReport};
#[cfg(any(test, feature = "test-support"))]
pub use sink::{MemoryLogSink, SinkEntry};
pub use sink::{FileLogSink, LogSink};
pub use validate::{Diagnostic, JobValidator, Summary, TaskValidator, ValidationReport};
