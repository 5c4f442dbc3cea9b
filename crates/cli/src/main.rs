// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj: run rsync backup jobs from the command line

mod color;
mod commands;
mod exit_error;
mod logging;
mod output;
mod table;

use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser};
use exit_error::ExitError;
use output::OutputFormat;
use sj_engine::{AppContext, Config};
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SJ_BUILD_HASH"), ")");

#[derive(Parser)]
#[command(name = "sj", version = VERSION, about = "Run rsync backup jobs", styles = color::styles())]
#[command(group(ArgGroup::new("action").args(["list", "start", "validate", "clear_locks"])))]
struct Cli {
    /// List configured jobs
    #[arg(long)]
    list: bool,

    /// Run a job (by name or id) and wait for it to end
    #[arg(long, value_name = "JOB")]
    start: Option<String>,

    /// Check a job's tool, hooks and exclude files without running it
    #[arg(long, value_name = "JOB")]
    validate: Option<String>,

    /// Remove every job lock, e.g. after a crash
    #[arg(long)]
    clear_locks: bool,

    /// Output format for --list
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Config file (default: $SJ_CONFIG or <state dir>/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let code = err.downcast_ref::<ExitError>().map_or(exit_error::FAILED, |e| e.code);
        eprintln!("sj: {err:#}");
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if !(cli.list || cli.clear_locks || cli.start.is_some() || cli.validate.is_some()) {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let _log_guard = logging::init(&config.log_dir);
    tracing::debug!(state_dir = %config.state_dir.display(), tool = %config.tool, "config loaded");
    let ctx = AppContext::from_config(config).map_err(ExitError::from)?;

    if cli.list {
        commands::list::handle(&ctx, cli.format)
    } else if cli.clear_locks {
        commands::locks::handle(&ctx)
    } else if let Some(job) = &cli.start {
        commands::start::handle(&ctx, job).await
    } else if let Some(job) = &cli.validate {
        commands::validate::handle(&ctx, job).await
    } else {
        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    Ok(match path {
        Some(path) => Config::load_from(sj_engine::env::state_dir()?, path)?,
        None => Config::load()?,
    })
}
