// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compile a task's configuration into the sync tool's argument vector.
//!
//! Token order: options, excludes, extra options, source, destination.
//! No token ever appears twice; a later duplicate is dropped.

use sj_core::Task;

/// How local paths are spelled on the tool's command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Paths pass through unchanged
    Posix,
    /// Drive-letter paths (`C:\data`) are rewritten to `/cygdrive/c/data`
    DriveLetter,
}

impl PathStyle {
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::DriveLetter
        } else {
            PathStyle::Posix
        }
    }

    pub fn apply(self, path: &str) -> String {
        match self {
            PathStyle::Posix => path.to_string(),
            PathStyle::DriveLetter => to_cygwin_path(path),
        }
    }
}

/// Rewrite a drive-letter path to its cygwin form.
///
/// `C:\data\x` and `C:/data/x` both become `/cygdrive/c/data/x`; anything
/// without a drive prefix (including `host:path` remotes) is returned as is.
pub fn to_cygwin_path(path: &str) -> String {
    let mut chars = path.chars();
    let (Some(drive), Some(':')) = (chars.next(), chars.next()) else {
        return path.to_string();
    };
    if !drive.is_ascii_alphabetic() {
        return path.to_string();
    }
    let rest = chars.as_str();
    if !(rest.is_empty() || rest.starts_with('\\') || rest.starts_with('/')) {
        return path.to_string();
    }
    let rest = rest.replace('\\', "/");
    let rest = rest.trim_start_matches('/');
    let mut out = format!("/cygdrive/{}", drive.to_ascii_lowercase());
    if !rest.is_empty() {
        out.push('/');
        out.push_str(rest);
    } else if path.len() > 2 {
        // `C:\` keeps its trailing separator
        out.push('/');
    }
    out
}

/// Argument accumulator that silently drops duplicate tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList {
    args: Vec<String>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `token` unless it is blank or already present.
    pub fn push(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.trim().is_empty() || self.contains(&token) {
            return false;
        }
        self.args.push(token);
        true
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.push(token);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.args.iter().any(|a| a == token)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

/// Compile `task` for the current platform.
pub fn build_command(task: &Task) -> Vec<String> {
    build_command_with(task, PathStyle::native())
}

/// Compile `task` with an explicit path style.
pub fn build_command_with(task: &Task, style: PathStyle) -> Vec<String> {
    let mut args = ArgList::new();

    args.extend(task.options.tokens());
    args.extend(exclude_tokens(task, style));
    args.extend(task.extra_options.split_whitespace());

    let mut source = style.apply(task.source.trim());
    if task.no_additional_dir && !source.is_empty() && !source.ends_with('/') {
        source.push('/');
    }
    let destination = style.apply(task.destination.trim());

    args.push(source);
    args.push(destination);
    args.into_vec()
}

/// Inline patterns first, then the exclude file; the tool applies filter
/// rules in order, so inline patterns take precedence.
fn exclude_tokens(task: &Task, style: PathStyle) -> Vec<String> {
    let mut tokens: Vec<String> = task
        .exclude
        .patterns()
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("--exclude={p}"))
        .collect();
    if let Some(file) = &task.exclude.exclude_file {
        let file = file.to_string_lossy();
        if !file.trim().is_empty() {
            tokens.push(format!("--exclude-from={}", style.apply(file.trim())));
        }
    }
    tokens
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
