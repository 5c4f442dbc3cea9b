// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use proptest::prelude::*;

fn job() -> JobId {
    JobId::new("job-1")
}

#[yare::parameterized(
    start          = { ProcessState::Startable, Transition::Start,  ProcessState::Running },
    finish         = { ProcessState::Running,   Transition::Finish, ProcessState::Finished },
    fail           = { ProcessState::Running,   Transition::Fail,   ProcessState::Failed },
    cancel         = { ProcessState::Running,   Transition::Cancel, ProcessState::Cancelled },
    reset_finished = { ProcessState::Finished,  Transition::Reset,  ProcessState::Startable },
    reset_failed   = { ProcessState::Failed,    Transition::Reset,  ProcessState::Startable },
    reset_cancel   = { ProcessState::Cancelled, Transition::Reset,  ProcessState::Startable },
)]
fn legal_transitions(from: ProcessState, t: Transition, to: ProcessState) {
    let step = transition(&job(), from, t).unwrap();
    assert_eq!(step.state, to);
    assert_eq!(step.events, vec![JobEvent::StateChanged { job_id: job(), from, to }]);
}

#[yare::parameterized(
    start_while_running  = { ProcessState::Running,   Transition::Start },
    start_while_finished = { ProcessState::Finished,  Transition::Start },
    finish_idle          = { ProcessState::Startable, Transition::Finish },
    cancel_idle          = { ProcessState::Startable, Transition::Cancel },
    cancel_twice         = { ProcessState::Cancelled, Transition::Cancel },
    reset_running        = { ProcessState::Running,   Transition::Reset },
)]
fn illegal_transitions(from: ProcessState, t: Transition) {
    let err = transition(&job(), from, t).unwrap_err();
    assert_eq!(err, TransitionError::Illegal { job_id: job(), from, transition: t });
}

#[test]
fn illegal_transition_message_names_job_and_state() {
    let err = transition(&job(), ProcessState::Running, Transition::Start).unwrap_err();
    assert_eq!(err.to_string(), "cannot start job job-1 while running");
}

#[test]
fn terminal_states() {
    assert!(!ProcessState::Startable.is_terminal());
    assert!(!ProcessState::Running.is_terminal());
    assert!(ProcessState::Finished.is_terminal());
    assert!(ProcessState::Failed.is_terminal());
    assert!(ProcessState::Cancelled.is_terminal());
}

proptest! {
    #[test]
    fn legal_steps_emit_exactly_one_state_change(
        from in arb_process_state(),
        t in arb_transition(),
    ) {
        if let Ok(step) = transition(&job(), from, t) {
            prop_assert_ne!(step.state, from);
            prop_assert_eq!(step.events.len(), 1);
        }
    }

    #[test]
    fn every_terminal_state_returns_to_startable(t in arb_transition()) {
        let Ok(running) = transition(&job(), ProcessState::Startable, Transition::Start) else {
            return Err(TestCaseError::fail("start must be legal from startable"));
        };
        if let Ok(done) = transition(&job(), running.state, t) {
            if done.state.is_terminal() {
                let reset = transition(&job(), done.state, Transition::Reset);
                prop_assert_eq!(reset.map(|s| s.state), Ok(ProcessState::Startable));
            }
        }
    }
}
