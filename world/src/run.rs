//! Run controller phase machine.

use arrow_quest_core::{RunPhase, Verdict};

/// Guards the `Idle -> Running -> Idle | Terminated` transitions.
///
/// Only [`RunController::reset`] leaves `Terminated`; the world calls it when
/// a level is (re)loaded.
#[derive(Clone, Debug)]
pub(crate) struct RunController {
    phase: RunPhase,
}

impl RunController {
    pub(crate) const fn new() -> Self {
        Self {
            phase: RunPhase::Idle,
        }
    }

    pub(crate) const fn phase(&self) -> RunPhase {
        self.phase
    }

    pub(crate) fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Enters `Running`; reports the blocking phase when not idle.
    pub(crate) fn start(&mut self) -> Result<(), RunPhase> {
        if !self.phase.is_idle() {
            return Err(self.phase);
        }
        self.phase = RunPhase::Running;
        Ok(())
    }

    /// Returns to `Idle` after the program ran dry.
    pub(crate) fn exhaust(&mut self) {
        if self.is_running() {
            self.phase = RunPhase::Idle;
        }
    }

    pub(crate) fn terminate(&mut self, verdict: Verdict) {
        if self.is_running() {
            self.phase = RunPhase::Terminated(verdict);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.phase = RunPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_only_valid_from_idle() {
        let mut run = RunController::new();

        assert_eq!(run.start(), Ok(()));
        assert_eq!(run.start(), Err(RunPhase::Running));

        run.terminate(Verdict::Died);
        assert_eq!(run.start(), Err(RunPhase::Terminated(Verdict::Died)));

        run.reset();
        assert_eq!(run.start(), Ok(()));
    }

    #[test]
    fn exhaustion_returns_to_idle() {
        let mut run = RunController::new();
        run.start().expect("idle controller starts");

        run.exhaust();

        assert_eq!(run.phase(), RunPhase::Idle);
    }

    #[test]
    fn terminate_requires_an_active_run() {
        let mut run = RunController::new();

        run.terminate(Verdict::Won);

        assert_eq!(run.phase(), RunPhase::Idle);
    }
}
