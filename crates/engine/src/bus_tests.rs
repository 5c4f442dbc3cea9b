// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::{ProcessState, StreamKind};

fn output(job: &str, line: &str) -> JobEvent {
    JobEvent::Output { job_id: JobId::new(job), stream: StreamKind::Stdout, line: line.to_string() }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<JobEvent>) -> Vec<JobEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[test]
fn events_arrive_in_publish_order() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    let started = JobEvent::StateChanged {
        job_id: JobId::new("job-a"),
        from: ProcessState::Startable,
        to: ProcessState::Running,
    };
    bus.publish(started.clone());
    bus.publish(output("job-a", "1"));
    bus.publish(output("job-b", "2"));

    assert_eq!(drain(&mut rx), vec![started, output("job-a", "1"), output("job-b", "2")]);
}

#[test]
fn job_subscription_filters_other_jobs() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_job(JobId::new("job-a"));

    bus.publish(output("job-b", "skip"));
    bus.publish(output("job-a", "keep"));

    assert_eq!(drain(&mut rx), vec![output("job-a", "keep")]);
}

#[test]
fn dropped_subscribers_are_pruned() {
    let bus = EventBus::new();
    let rx_all = bus.subscribe();
    let rx_job = bus.subscribe_job(JobId::new("job-a"));
    let _kept = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 3);

    drop(rx_all);
    drop(rx_job);
    bus.publish(output("job-b", "x"));
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    EventBus::new().publish(output("job-a", "nobody listening"));
}
