// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::exit_error::{ExitError, FAILED};
use crate::output::format_validation;
use anyhow::Result;
use sj_engine::AppContext;

/// Check a job without running it. Problems go to stderr and fail the
/// command.
pub async fn handle(ctx: &AppContext, name_or_id: &str) -> Result<()> {
    let job = ctx.find_job(name_or_id).map_err(ExitError::from)?;
    let report = ctx.validate_job(&job).await;
    if report.is_valid() {
        println!("{}", format_validation(&report));
        Ok(())
    } else {
        Err(ExitError::new(FAILED, format_validation(&report)).into())
    }
}
