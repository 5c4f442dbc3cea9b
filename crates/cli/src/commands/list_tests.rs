// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use sj_core::JobId;

fn summary(id: &str, name: &str, tasks: usize, locked: bool) -> JobSummary {
    JobSummary {
        id: JobId::new(id),
        name: name.to_string(),
        description: format!("{name} backup"),
        task_count: tasks,
        state: ProcessState::Startable,
        locked,
    }
}

fn render(jobs: &[JobSummary]) -> String {
    let mut out = Vec::new();
    format_job_list(&mut out, jobs);
    String::from_utf8(out).unwrap()
}

#[test]
fn empty_list_says_so() {
    assert_eq!(render(&[]), "No jobs\n");
}

#[test]
#[serial]
fn lists_one_row_per_job() {
    std::env::set_var("NO_COLOR", "1");
    let out = render(&[summary("job-1", "home", 2, false), summary("job-2", "photos", 11, true)]);

    assert_eq!(
        out,
        "ID     NAME    TASKS  STATE      DESCRIPTION\n\
         job-1  home        2  startable  home backup\n\
         job-2  photos     11  running    photos backup\n"
    );
}

#[test]
fn json_carries_every_field() {
    let json = jobs_json(&[summary("job-1", "home", 2, true)]);
    assert_eq!(
        json,
        serde_json::json!([{
            "id": "job-1",
            "name": "home",
            "description": "home backup",
            "tasks": 2,
            "state": "startable",
            "locked": true,
        }])
    );
}
