// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task definition: one source → destination synchronization unit.

use crate::job::Hook;
use crate::HookKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Stable identifier of a task definition.
    pub struct TaskId("tsk-");
}

/// A selected tool flag, optionally carrying a value.
///
/// `name` is the long option name without leading dashes (`archive`,
/// `bwlimit`); a leading `--` is tolerated and stripped when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TaskOption {
    pub fn flag(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }

    fn key(&self) -> &str {
        self.name.trim().trim_start_matches('-')
    }

    /// Render as a single argument: `--name` or `--name=value`.
    pub fn token(&self) -> Option<String> {
        let key = self.key();
        if key.is_empty() {
            return None;
        }
        Some(match &self.value {
            Some(value) => format!("--{key}={value}"),
            None => format!("--{key}"),
        })
    }
}

/// Ordered set of selected tool flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSection {
    options: Vec<TaskOption>,
}

impl OptionSection {
    /// Insert an option, replacing one with the same name in place.
    pub fn set(&mut self, option: TaskOption) {
        match self.options.iter_mut().find(|o| o.key() == option.key()) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim_start_matches('-');
        let before = self.options.len();
        self.options.retain(|o| o.key() != name);
        self.options.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&TaskOption> {
        let name = name.trim_start_matches('-');
        self.options.iter().find(|o| o.key() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskOption> {
        self.options.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.options.iter().filter_map(TaskOption::token).collect()
    }
}

impl FromIterator<TaskOption> for OptionSection {
    fn from_iter<I: IntoIterator<Item = TaskOption>>(iter: I) -> Self {
        let mut section = OptionSection::default();
        for option in iter {
            section.set(option);
        }
        section
    }
}

/// Exclusion rules: inline patterns plus an optional external exclude file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeSection {
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_file: Option<PathBuf>,
}

impl ExcludeSection {
    /// Add a pattern. Blank and already-present patterns are ignored.
    pub fn add_pattern(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        if pattern.trim().is_empty() || self.patterns.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    pub fn remove_pattern(&mut self, pattern: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p != pattern);
        self.patterns.len() != before
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.exclude_file.is_none()
    }
}

/// Task-level hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskExecuteSection {
    #[serde(default)]
    pub before: Hook,
    #[serde(default)]
    pub after_fail: Hook,
    #[serde(default)]
    pub after_ok: Hook,
    #[serde(default)]
    pub after: Hook,
}

impl TaskExecuteSection {
    /// Hooks paired with their kind, in lifecycle order.
    pub fn hooks(&self) -> [(HookKind, &Hook); 4] {
        [
            (HookKind::Before, &self.before),
            (HookKind::AfterSuccess, &self.after_ok),
            (HookKind::AfterFailure, &self.after_fail),
            (HookKind::After, &self.after),
        ]
    }
}

/// A synchronization task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    /// Whitespace-separated `KEY=VALUE` assignments for the tool's environment.
    #[serde(default)]
    pub environment: String,
    /// Sync the contents of the source directory rather than the directory
    /// itself (adds a trailing slash to the source path).
    #[serde(default)]
    pub no_additional_dir: bool,
    /// Free-text options, split on whitespace and passed through verbatim.
    #[serde(default)]
    pub extra_options: String,
    #[serde(default)]
    pub options: OptionSection,
    #[serde(default)]
    pub exclude: ExcludeSection,
    #[serde(default)]
    pub execute: TaskExecuteSection,
}

impl Task {
    /// Create an empty task with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(TaskId::generate(), name)
    }

    pub fn with_id(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            source: String::new(),
            destination: String::new(),
            environment: String::new(),
            no_additional_dir: false,
            extra_options: String::new(),
            options: OptionSection::default(),
            exclude: ExcludeSection::default(),
            execute: TaskExecuteSection::default(),
        }
    }

    /// Source and destination are both set.
    pub fn is_runnable(&self) -> bool {
        !self.source.trim().is_empty() && !self.destination.trim().is_empty()
    }

    /// Parsed environment assignments.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        crate::parse_env_assignments(&self.environment)
    }
}

crate::builder! {
    pub struct TaskBuilder => Task {
        into {
            id: TaskId = "tsk-test",
            name: String = "test-task",
            description: String = "",
            source: String = "/src",
            destination: String = "/dst",
            environment: String = "",
            extra_options: String = "",
        }
        set {
            no_additional_dir: bool = false,
            options: OptionSection = OptionSection::default(),
            exclude: ExcludeSection = ExcludeSection::default(),
            execute: TaskExecuteSection = TaskExecuteSection::default(),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
