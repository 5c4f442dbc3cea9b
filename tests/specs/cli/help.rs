//! Help and version output.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_every_action() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--list")
        .stdout_has("--start")
        .stdout_has("--validate")
        .stdout_has("--clear-locks")
        .stdout_has("--version");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("sj 0.1");
}

#[test]
fn actions_are_mutually_exclusive() {
    cli().args(&["--list", "--start", "nightly"]).fails().stderr_has("cannot be used with");
}
