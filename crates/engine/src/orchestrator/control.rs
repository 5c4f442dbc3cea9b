// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancel-versus-completion arbitration for one run.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunPhase {
    Running,
    /// A cancel request won; the run ends as cancelled
    Cancelling,
    /// The run reached its natural end; later cancels are ignored
    Settled,
}

/// Shared between a run and whoever may cancel it.
///
/// Whichever of [`cancel`](Self::cancel) and [`settle`](Self::settle) takes
/// the phase out of `Running` first decides how the run ends.
#[derive(Debug)]
pub(crate) struct RunControl {
    phase: Mutex<RunPhase>,
    token: CancellationToken,
}

impl RunControl {
    pub(crate) fn new() -> Self {
        Self { phase: Mutex::new(RunPhase::Running), token: CancellationToken::new() }
    }

    /// Request cancellation. Returns false if the run was already
    /// cancelled or has settled.
    pub(crate) fn cancel(&self) -> bool {
        let mut phase = self.phase.lock();
        if *phase != RunPhase::Running {
            return false;
        }
        *phase = RunPhase::Cancelling;
        self.token.cancel();
        true
    }

    /// Mark the natural end of the run. Returns true if a cancel got there
    /// first.
    pub(crate) fn settle(&self) -> bool {
        let mut phase = self.phase.lock();
        match *phase {
            RunPhase::Running => {
                *phase = RunPhase::Settled;
                false
            }
            RunPhase::Cancelling => true,
            RunPhase::Settled => false,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> RunPhase {
        *self.phase.lock()
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
