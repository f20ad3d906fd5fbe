//! Per-level grid of cell kinds with mutable goal bookkeeping.

use arrow_quest_core::{CellCoord, CellKind, Direction, GoalTally, LevelLayout};

/// Board loaded from a level layout.
///
/// `unclaimed` mirrors `cells` and is `true` for goal cells the avatar has not
/// visited yet. `goals_remaining` always equals the number of `true` entries.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    rows: u32,
    columns: u32,
    cells: Vec<CellKind>,
    unclaimed: Vec<bool>,
    goals_total: u32,
    goals_remaining: u32,
}

impl Board {
    /// Builds a fresh board with every goal unclaimed.
    pub(crate) fn load(layout: &LevelLayout) -> Self {
        let cells: Vec<CellKind> = layout.cells().map(|(_, kind)| kind).collect();
        let unclaimed: Vec<bool> = cells.iter().map(|kind| *kind == CellKind::Goal).collect();
        let goals_total = layout.goal_count();

        Self {
            rows: layout.rows(),
            columns: layout.columns(),
            cells,
            unclaimed,
            goals_total,
            goals_remaining: goals_total,
        }
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Neighbour of `cell` in `direction`, or `None` when it lies off the board.
    pub(crate) fn step(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.offset(direction).filter(|target| self.contains(*target))
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    pub(crate) fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    pub(crate) fn is_unclaimed(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.unclaimed[index])
    }

    /// Marks the goal at `cell` as visited.
    ///
    /// Returns `true` only for the first visit; revisits and non-goal cells
    /// leave the tally untouched.
    pub(crate) fn claim_goal(&mut self, cell: CellCoord) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };

        if !self.unclaimed[index] {
            return false;
        }

        self.unclaimed[index] = false;
        self.goals_remaining -= 1;
        true
    }

    pub(crate) const fn goals(&self) -> GoalTally {
        GoalTally::new(self.goals_total, self.goals_remaining)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_quest_core::LevelId;

    #[test]
    fn load_counts_goals_and_leaves_them_unclaimed() {
        let board = Board::load(LevelId::FIRST.layout());

        assert_eq!(board.dimensions(), (3, 4));
        assert_eq!(board.goals(), GoalTally::new(3, 3));
        assert!(board.is_unclaimed(CellCoord::new(1, 0)));
        assert!(!board.is_unclaimed(CellCoord::new(0, 0)));
    }

    #[test]
    fn claim_goal_is_idempotent() {
        let mut board = Board::load(LevelId::FIRST.layout());
        let goal = CellCoord::new(1, 1);

        assert!(board.claim_goal(goal));
        assert_eq!(board.goals().remaining(), 2);
        assert!(!board.claim_goal(goal));
        assert_eq!(board.goals().remaining(), 2);
        assert!(!board.is_unclaimed(goal));
    }

    #[test]
    fn claim_goal_ignores_non_goal_cells() {
        let mut board = Board::load(LevelId::FIRST.layout());

        assert!(!board.claim_goal(CellCoord::new(0, 0)));
        assert!(!board.claim_goal(CellCoord::new(9, 9)));
        assert_eq!(board.goals().remaining(), 3);
    }

    #[test]
    fn step_stays_within_bounds() {
        let board = Board::load(LevelId::FIRST.layout());

        assert_eq!(board.step(CellCoord::ORIGIN, Direction::Up), None);
        assert_eq!(board.step(CellCoord::new(2, 3), Direction::Down), None);
        assert_eq!(board.step(CellCoord::new(2, 3), Direction::Right), None);
        assert_eq!(
            board.step(CellCoord::new(2, 3), Direction::Left),
            Some(CellCoord::new(2, 2))
        );
        assert_eq!(board.kind_at(CellCoord::new(2, 0)), Some(CellKind::Obstacle));
    }
}
