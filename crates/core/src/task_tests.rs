// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    flag           = { TaskOption::flag("archive"),                  Some("--archive") },
    dashed_flag    = { TaskOption::flag("--delete"),                 Some("--delete") },
    with_value     = { TaskOption::with_value("bwlimit", "500"),     Some("--bwlimit=500") },
    empty_value    = { TaskOption::with_value("rsh", ""),            Some("--rsh=") },
    blank_name     = { TaskOption::flag("  "),                       None },
)]
fn option_token(option: TaskOption, expected: Option<&str>) {
    assert_eq!(option.token().as_deref(), expected);
}

#[test]
fn option_section_replaces_same_name_in_place() {
    let mut options = OptionSection::default();
    options.set(TaskOption::flag("archive"));
    options.set(TaskOption::with_value("bwlimit", "100"));
    options.set(TaskOption::flag("delete"));
    options.set(TaskOption::with_value("--bwlimit", "200"));

    assert_eq!(options.tokens(), vec!["--archive", "--bwlimit=200", "--delete"]);
    assert_eq!(options.get("bwlimit").and_then(|o| o.value.as_deref()), Some("200"));
}

#[test]
fn option_section_remove() {
    let mut options: OptionSection =
        vec![TaskOption::flag("archive"), TaskOption::flag("delete")].into_iter().collect();
    assert!(options.remove("--archive"));
    assert!(!options.remove("archive"));
    assert_eq!(options.tokens(), vec!["--delete"]);
}

#[test]
fn exclude_section_ignores_blank_and_duplicate_patterns() {
    let mut exclude = ExcludeSection::default();
    assert!(exclude.is_empty());
    assert!(exclude.add_pattern("*.tmp"));
    assert!(!exclude.add_pattern("*.tmp"));
    assert!(!exclude.add_pattern(" "));
    assert_eq!(exclude.patterns(), ["*.tmp".to_string()]);
    assert!(exclude.remove_pattern("*.tmp"));
    assert!(exclude.is_empty());

    exclude.exclude_file = Some("/etc/excludes".into());
    assert!(!exclude.is_empty());
}

#[yare::parameterized(
    both_set     = { "/a", "/b",  true },
    blank_source = { "  ", "/b",  false },
    blank_dest   = { "/a", "",    false },
)]
fn runnable_requires_both_paths(source: &str, destination: &str, runnable: bool) {
    let task = Task::builder().source(source).destination(destination).build();
    assert_eq!(task.is_runnable(), runnable);
}

#[test]
fn new_task_owns_fresh_sections() {
    let a = Task::new("a");
    let b = Task::new("b");
    assert_ne!(a.id, b.id);
    assert!(a.options.is_empty());
    assert!(a.exclude.is_empty());
    assert!(!a.execute.before.is_enabled());
}

#[test]
fn env_vars_parses_environment_string() {
    let task = Task::builder().environment("A=1 B=2").build();
    assert_eq!(
        task.env_vars(),
        vec![("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
    );
}

#[test]
fn task_deserializes_with_sections_defaulted() {
    let json = r#"{ "id": "tsk-1", "name": "docs", "source": "/a", "destination": "/b",
                    "options": [{ "name": "archive" }, { "name": "bwlimit", "value": "5" }] }"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(task.options.tokens(), vec!["--archive", "--bwlimit=5"]);
    assert!(task.exclude.is_empty());
    assert_eq!(task.execute, TaskExecuteSection::default());
}
