//! Single-step move resolution against the board.

use arrow_quest_core::{CellCoord, CellKind, Direction, RunOutcome};

use crate::board::Board;

/// Owns the avatar's logical position and resolves one direction at a time.
#[derive(Clone, Debug)]
pub(crate) struct MoveExecutor {
    position: CellCoord,
}

impl MoveExecutor {
    pub(crate) const fn new(start: CellCoord) -> Self {
        Self { position: start }
    }

    pub(crate) fn reset(&mut self, start: CellCoord) {
        self.position = start;
    }

    pub(crate) const fn position(&self) -> CellCoord {
        self.position
    }

    /// Resolves `direction` from the current position.
    ///
    /// Position and goal state change together or not at all. Off-board
    /// targets and obstacles leave the avatar where it stands.
    pub(crate) fn apply(&mut self, board: &mut Board, direction: Direction) -> RunOutcome {
        let Some(target) = board.step(self.position, direction) else {
            return RunOutcome::Blocked;
        };

        match board.kind_at(target) {
            None => RunOutcome::Blocked,
            Some(CellKind::Obstacle) => RunOutcome::Died,
            Some(CellKind::Empty) => {
                self.position = target;
                RunOutcome::Moved(target)
            }
            Some(CellKind::Goal) => {
                self.position = target;
                if !board.claim_goal(target) {
                    return RunOutcome::Moved(target);
                }

                let goals = board.goals();
                if goals.is_complete() {
                    RunOutcome::Won
                } else {
                    RunOutcome::GoalReached(goals.remaining())
                }
            }
        }
    }
}
