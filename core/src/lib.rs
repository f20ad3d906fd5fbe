#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arrow Quest engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.

mod levels;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use levels::{LevelId, LevelLayout, LEVEL_COUNT};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Arrow Quest.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the board with a fresh copy of the provided level.
    ///
    /// Resets the avatar, discards any pending program and returns the run
    /// controller to idle regardless of its current phase.
    LoadLevel {
        /// Level whose layout should be loaded.
        level: LevelId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Appends a direction to the tail of the pending program.
    EnqueueDirection {
        /// Direction the avatar should attempt when the entry executes.
        direction: Direction,
    },
    /// Discards every pending direction.
    ClearProgram,
    /// Starts draining the pending program.
    StartRun,
    /// Executes the next pending direction of the active run.
    AdvanceRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a level was (re)loaded and is ready for programming.
    LevelLoaded {
        /// Level that became active.
        level: LevelId,
        /// Goal bookkeeping of the fresh board.
        goals: GoalTally,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a direction was appended to the pending program.
    DirectionEnqueued {
        /// Direction that was appended.
        direction: Direction,
        /// Number of directions pending after the append.
        queued: usize,
    },
    /// Reports that an enqueue request arrived outside the idle phase.
    EnqueueRejected {
        /// Direction carried by the rejected request.
        direction: Direction,
        /// Phase the run controller was in when the request arrived.
        phase: RunPhase,
    },
    /// Confirms that the pending program and its visual buffer were emptied.
    ProgramCleared,
    /// Reports that a clear request arrived outside the idle phase.
    ClearRejected {
        /// Phase the run controller was in when the request arrived.
        phase: RunPhase,
    },
    /// Announces that a run began draining the pending program.
    RunStarted {
        /// Number of directions pending when the run began.
        queued: usize,
    },
    /// Reports that a start request arrived outside the idle phase.
    RunRejected {
        /// Phase the run controller was in when the request arrived.
        phase: RunPhase,
    },
    /// Reports the outcome of a single executed direction.
    StepResolved {
        /// Direction consumed from the head of the program.
        direction: Direction,
        /// Cell the avatar occupied before the step.
        from: CellCoord,
        /// Outcome produced by the move executor.
        outcome: RunOutcome,
    },
    /// Reports that an advance request arrived while no run was active.
    AdvanceRejected {
        /// Phase the run controller was in when the request arrived.
        phase: RunPhase,
    },
    /// Announces that the active run finished.
    ///
    /// `outcome` is [`RunOutcome::Won`], [`RunOutcome::Died`] or
    /// [`RunOutcome::SequenceExhausted`].
    RunSettled {
        /// Level the run was played on.
        level: LevelId,
        /// Result that ended the run.
        outcome: RunOutcome,
        /// Goal bookkeeping at the moment the run ended.
        goals: GoalTally,
    },
}

/// Kind of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable cell without side effects.
    Empty,
    /// Lethal cell; entering it ends the run.
    Obstacle,
    /// Cell that must be visited to clear the level.
    Goal,
}

impl CellKind {
    /// Numeric code used by the level tables (`0`, `1`, `2`).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Obstacle => 1,
            Self::Goal => 2,
        }
    }
}

/// Cardinal movement directions available to the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in palette order.
    pub const ALL: [Direction; 4] = [Self::Right, Self::Up, Self::Down, Self::Left];

    /// Unit offset expressed as `(row delta, column delta)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Single-letter symbol used in textual programs.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// Arrow glyph used when presenting programs.
    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }

    /// Parses a letter or arrow glyph into a direction.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'U' | '↑' => Some(Self::Up),
            'D' | '↓' => Some(Self::Down),
            'L' | '←' => Some(Self::Left),
            'R' | '→' => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arrow())
    }
}

/// Ordered list of directions parsed from text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    directions: Vec<Direction>,
}

impl Program {
    /// Creates a program from the provided directions.
    #[must_use]
    pub fn new(directions: Vec<Direction>) -> Self {
        Self { directions }
    }

    /// Directions in execution order.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of directions contained in the program.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Reports whether the program contains no directions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl FromStr for Program {
    type Err = ParseProgramError;

    /// Parses letters (`U`, `D`, `L`, `R`, any case) or arrow glyphs.
    ///
    /// Whitespace and commas are ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut directions = Vec::new();
        for (position, symbol) in text.chars().enumerate() {
            if symbol.is_whitespace() || symbol == ',' {
                continue;
            }
            let direction = Direction::from_symbol(symbol)
                .ok_or(ParseProgramError::UnknownSymbol { symbol, position })?;
            directions.push(direction);
        }
        Ok(Self { directions })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in &self.directions {
            write!(f, "{}", direction.symbol())?;
        }
        Ok(())
    }
}

/// Errors produced while parsing textual programs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseProgramError {
    /// The text contained a character that names no direction.
    #[error("unknown direction symbol '{symbol}' at position {position}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based character offset within the text.
        position: usize,
    },
}

/// Errors raised when level configuration is invalid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The requested index does not name a predefined level.
    #[error("level {index} does not exist (only {count} levels are defined)")]
    UnknownLevel {
        /// Requested level index.
        index: usize,
        /// Number of predefined levels.
        count: usize,
    },
}

/// Location of a single board cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Upper-left cell where every level starts the avatar.
    pub const ORIGIN: CellCoord = CellCoord::new(0, 0);

    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Neighbouring cell one unit away in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// upper bounds are the board's concern.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<CellCoord> {
        let (row_delta, column_delta) = direction.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        Some(CellCoord::new(row, column))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Goal bookkeeping for a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalTally {
    total: u32,
    remaining: u32,
}

impl GoalTally {
    /// Creates a tally. `remaining` must not exceed `total`.
    #[must_use]
    pub const fn new(total: u32, remaining: u32) -> Self {
        debug_assert!(remaining <= total, "more goals remaining than exist");
        Self { total, remaining }
    }

    /// Number of goal cells on the board.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Number of goal cells not yet visited.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Number of goal cells already visited.
    #[must_use]
    pub const fn claimed(&self) -> u32 {
        self.total.saturating_sub(self.remaining)
    }

    /// Reports whether every goal was claimed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Outcome of a single step or of a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The avatar moved onto the provided cell.
    Moved(CellCoord),
    /// The target lay outside the board; the direction was skipped.
    Blocked,
    /// The target was an obstacle; the avatar stays on its previous cell.
    Died,
    /// A new goal was claimed; carries the number of goals still unclaimed.
    GoalReached(u32),
    /// The final goal was claimed.
    Won,
    /// The program ran out before a terminal outcome.
    SequenceExhausted,
}

impl RunOutcome {
    /// Reports whether the outcome ends the run on the spot.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.verdict().is_some()
    }

    /// Verdict carried by a terminal outcome.
    #[must_use]
    pub const fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Died => Some(Verdict::Died),
            Self::Won => Some(Verdict::Won),
            _ => None,
        }
    }
}

/// Terminal verdict of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Every goal was claimed.
    Won,
    /// The avatar walked into an obstacle.
    Died,
}

/// Phase of the run controller state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// Program editing is allowed and no run is active.
    Idle,
    /// A run is draining the program.
    Running,
    /// The last run ended with a verdict; only a level load leaves this phase.
    Terminated(Verdict),
}

impl RunPhase {
    /// Reports whether the program may be edited or a run started.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, GoalTally, ParseProgramError, Program, RunOutcome, Verdict};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        assert_eq!(CellCoord::ORIGIN.offset(Direction::Up), None);
        assert_eq!(CellCoord::ORIGIN.offset(Direction::Left), None);
        assert_eq!(
            CellCoord::ORIGIN.offset(Direction::Down),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            CellCoord::new(2, 3).offset(Direction::Right),
            Some(CellCoord::new(2, 4))
        );
    }

    #[test]
    fn program_parses_letters_and_arrows() {
        let program: Program = "d, D r ←↑".parse().expect("program parses");
        assert_eq!(
            program.directions(),
            &[
                Direction::Down,
                Direction::Down,
                Direction::Right,
                Direction::Left,
                Direction::Up,
            ]
        );
        assert_eq!(program.to_string(), "DDRLU");
    }

    #[test]
    fn program_rejects_unknown_symbols() {
        let error = "UDX".parse::<Program>().expect_err("X is not a direction");
        assert_eq!(
            error,
            ParseProgramError::UnknownSymbol {
                symbol: 'X',
                position: 2
            }
        );
    }

    #[test]
    fn goal_tally_counts_claimed_goals() {
        let tally = GoalTally::new(3, 1);
        assert_eq!(tally.claimed(), 2);
        assert!(!tally.is_complete());
        assert!(GoalTally::new(3, 0).is_complete());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "more goals remaining than exist")]
    fn goal_tally_refuses_more_remaining_than_total() {
        let _ = GoalTally::new(2, 5);
    }

    #[test]
    fn only_died_and_won_are_terminal() {
        assert!(RunOutcome::Died.is_terminal());
        assert!(RunOutcome::Won.is_terminal());
        assert!(!RunOutcome::Blocked.is_terminal());
        assert!(!RunOutcome::GoalReached(1).is_terminal());
        assert!(!RunOutcome::SequenceExhausted.is_terminal());
    }

    #[test]
    fn verdict_exists_only_for_terminal_outcomes() {
        assert_eq!(RunOutcome::Died.verdict(), Some(Verdict::Died));
        assert_eq!(RunOutcome::Won.verdict(), Some(Verdict::Won));
        assert_eq!(RunOutcome::Moved(CellCoord::ORIGIN).verdict(), None);
        assert_eq!(RunOutcome::GoalReached(2).verdict(), None);
        assert_eq!(RunOutcome::Blocked.verdict(), None);
        assert_eq!(RunOutcome::SequenceExhausted.verdict(), None);
    }

    #[test]
    fn program_round_trips_through_bincode() {
        assert_round_trip(&Program::new(vec![Direction::Down, Direction::Right]));
    }
}
