// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fan-out of job events to attached listeners.

use parking_lot::Mutex;
use sj_core::{JobEvent, JobId};
use std::sync::Arc;
use tokio::sync::mpsc;

struct Subscriber {
    filter: Option<JobId>,
    tx: mpsc::UnboundedSender<JobEvent>,
}

/// Delivers every published event to each matching subscriber, in
/// publication order. Subscribers whose receiver was dropped are pruned on
/// the next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive events for all jobs.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<JobEvent> {
        self.register(None)
    }

    /// Receive events for one job only.
    pub fn subscribe_job(&self, job_id: JobId) -> mpsc::UnboundedReceiver<JobEvent> {
        self.register(Some(job_id))
    }

    fn register(&self, filter: Option<JobId>) -> mpsc::UnboundedReceiver<JobEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(Subscriber { filter, tx });
        rx
    }

    pub fn publish(&self, event: JobEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sub| {
            if sub.filter.as_ref().is_some_and(|id| id != event.job_id()) {
                return !sub.tx.is_closed();
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
