// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use sj_engine::{AppError, StartError};
use std::fmt;

/// Job failed or was cancelled, or did not validate
pub const FAILED: i32 = 1;
/// Another run holds the job's lock
pub const LOCK_HELD: i32 = 2;
pub const NOT_FOUND: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<AppError> for ExitError {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::JobNotFound(_) => NOT_FOUND,
            AppError::Start(StartError::LockHeld { .. }) => LOCK_HELD,
            _ => FAILED,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
