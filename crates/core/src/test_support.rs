// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Hook, Task, TaskExecuteSection};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core model types.
pub mod strategies {
    use crate::state::{ProcessState, Transition};
    use crate::task::{ExcludeSection, OptionSection, Task, TaskOption};
    use proptest::prelude::*;

    pub fn arb_process_state() -> impl Strategy<Value = ProcessState> {
        prop_oneof![
            Just(ProcessState::Startable),
            Just(ProcessState::Running),
            Just(ProcessState::Finished),
            Just(ProcessState::Failed),
            Just(ProcessState::Cancelled),
        ]
    }

    pub fn arb_transition() -> impl Strategy<Value = Transition> {
        prop_oneof![
            Just(Transition::Start),
            Just(Transition::Finish),
            Just(Transition::Fail),
            Just(Transition::Cancel),
            Just(Transition::Reset),
        ]
    }

    /// Path-ish strings, including drive-letter forms and collisions.
    pub fn arb_path() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("/a".to_string()),
            Just("/b".to_string()),
            Just(r"C:\data".to_string()),
            Just("host:/backup/".to_string()),
            "/[a-z]{1,6}(/[a-z]{1,6}){0,2}",
        ]
    }

    fn arb_option() -> impl Strategy<Value = TaskOption> {
        (
            prop_oneof![Just("archive"), Just("delete"), Just("compress"), Just("bwlimit")],
            proptest::option::of("[0-9]{1,4}"),
        )
            .prop_map(|(name, value)| TaskOption { name: name.to_string(), value })
    }

    /// Tasks whose options, excludes and extra options may overlap with
    /// each other and with the paths.
    pub fn arb_task() -> impl Strategy<Value = Task> {
        (
            arb_path(),
            arb_path(),
            proptest::collection::vec(arb_option(), 0..4),
            proptest::collection::vec(arb_path(), 0..3),
            proptest::option::of(arb_path()),
            proptest::collection::vec(
                prop_oneof![Just("--archive".to_string()), Just("-v".to_string()), arb_path()],
                0..4,
            ),
            any::<bool>(),
        )
            .prop_map(|(source, destination, options, patterns, file, extra, no_dir)| {
                let mut exclude = ExcludeSection::default();
                for pattern in patterns {
                    exclude.add_pattern(pattern);
                }
                exclude.exclude_file = file.map(Into::into);
                Task::builder()
                    .source(source)
                    .destination(destination)
                    .options(options.into_iter().collect::<OptionSection>())
                    .exclude(exclude)
                    .extra_options(extra.join(" "))
                    .no_additional_dir(no_dir)
                    .build()
            })
    }
}

// ── Factory helpers ─────────────────────────────────────────────────────

/// A runnable task with the given id and paths.
pub fn sync_task(id: &str, source: &str, destination: &str) -> Task {
    Task::builder().id(id).name(id).source(source).destination(destination).build()
}

/// Task hooks with every hook enabled, each running `program` with the hook
/// name as its single argument.
pub fn all_task_hooks(program: &str) -> TaskExecuteSection {
    TaskExecuteSection {
        before: Hook::new(format!("{program} before")),
        after_fail: Hook::new(format!("{program} after_fail")),
        after_ok: Hook::new(format!("{program} after_ok")),
        after: Hook::new(format!("{program} after")),
    }
}
