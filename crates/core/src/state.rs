// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job process state machine.
//!
//! ```text
//! Startable --Start--> Running --Finish--> Finished --Reset--> Startable
//!                              --Fail----> Failed   --Reset--> Startable
//!                              --Cancel--> Cancelled --Reset-> Startable
//! ```
//!
//! [`transition`] is pure: it computes the next state and the events to
//! publish. The orchestrator is the only caller that applies the result.

use crate::event::JobEvent;
use crate::job::JobId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transient lifecycle status of a job. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    #[default]
    Startable,
    Running,
    Finished,
    Failed,
    Cancelled,
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Finished | ProcessState::Failed | ProcessState::Cancelled)
    }
}

crate::simple_display! {
    ProcessState {
        Startable => "startable",
        Running => "running",
        Finished => "finished",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Requested state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Finish,
    Fail,
    Cancel,
    Reset,
}

crate::simple_display! {
    Transition {
        Start => "start",
        Finish => "finish",
        Fail => "fail",
        Cancel => "cancel",
        Reset => "reset",
    }
}

/// Result of a legal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: ProcessState,
    pub events: Vec<JobEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {transition} job {job_id} while {from}")]
    Illegal { job_id: JobId, from: ProcessState, transition: Transition },
}

/// Compute the state following `current` under `transition`.
pub fn transition(
    job_id: &JobId,
    current: ProcessState,
    transition: Transition,
) -> Result<Step, TransitionError> {
    use ProcessState::*;

    let next = match (current, transition) {
        (Startable, Transition::Start) => Running,
        (Running, Transition::Finish) => Finished,
        (Running, Transition::Fail) => Failed,
        (Running, Transition::Cancel) => Cancelled,
        (Finished | Failed | Cancelled, Transition::Reset) => Startable,
        (from, transition) => {
            return Err(TransitionError::Illegal { job_id: job_id.clone(), from, transition })
        }
    };

    Ok(Step {
        state: next,
        events: vec![JobEvent::StateChanged { job_id: job_id.clone(), from: current, to: next }],
    })
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
