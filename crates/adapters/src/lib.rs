// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-adapters: Process spawning seam for the sync tool and hooks

pub mod process;
pub mod subprocess;

pub use process::{command_line, ProcessAdapter, ProcessSpec, SpawnError, SystemProcessAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use process::{RecordingProcessAdapter, SpawnRecord};
pub use subprocess::{process_alive, run_with_timeout, terminate, RunError};
