#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Arrow Quest.

mod board;
mod executor;
mod program;
mod run;

use arrow_quest_core::{
    Command, Direction, Event, LevelId, RunOutcome, Verdict, WELCOME_BANNER,
};
use tracing::debug;

use self::{board::Board, executor::MoveExecutor, program::CommandQueue, run::RunController};

/// Represents the authoritative Arrow Quest world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level: LevelId,
    board: Board,
    program: CommandQueue,
    executor: MoveExecutor,
    run: RunController,
}

impl World {
    /// Creates a new world with the first level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(LevelId::FIRST)
    }

    /// Creates a new world with the provided level loaded.
    #[must_use]
    pub fn with_level(level: LevelId) -> Self {
        let layout = level.layout();
        Self {
            banner: WELCOME_BANNER,
            level,
            board: Board::load(layout),
            program: CommandQueue::default(),
            executor: MoveExecutor::new(layout.start()),
            run: RunController::new(),
        }
    }

    fn load_level(&mut self, level: LevelId, out_events: &mut Vec<Event>) {
        let layout = level.layout();
        self.level = level;
        self.board = Board::load(layout);
        self.executor.reset(layout.start());
        self.program.clear();
        self.run.reset();

        let goals = self.board.goals();
        debug!(level_index = level.get(), goals = goals.total(), "level loaded");
        out_events.push(Event::LevelLoaded { level, goals });
    }

    fn enqueue(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let phase = self.run.phase();
        if !phase.is_idle() {
            out_events.push(Event::EnqueueRejected { direction, phase });
            return;
        }

        self.program.push(direction);
        out_events.push(Event::DirectionEnqueued {
            direction,
            queued: self.program.len(),
        });
    }

    fn clear_program(&mut self, out_events: &mut Vec<Event>) {
        let phase = self.run.phase();
        if !phase.is_idle() {
            out_events.push(Event::ClearRejected { phase });
            return;
        }

        self.program.clear();
        out_events.push(Event::ProgramCleared);
    }

    fn start_run(&mut self, out_events: &mut Vec<Event>) {
        if let Err(phase) = self.run.start() {
            out_events.push(Event::RunRejected { phase });
            return;
        }

        if self.program.is_empty() {
            debug!("run started without pending directions");
        }
        let queued = self.program.len();
        debug!(level_index = self.level.get(), queued, "run started");
        out_events.push(Event::RunStarted { queued });
    }

    /// Consumes directions until one produces visible progress.
    ///
    /// Blocked directions are discarded and the next one is tried within the
    /// same advance. Terminal outcomes stop draining and discard the rest of
    /// the program.
    fn advance_run(&mut self, out_events: &mut Vec<Event>) {
        if !self.run.is_running() {
            out_events.push(Event::AdvanceRejected {
                phase: self.run.phase(),
            });
            return;
        }

        loop {
            let Some(direction) = self.program.pop_front() else {
                self.run.exhaust();
                out_events.push(Event::ProgramCleared);
                self.settle(RunOutcome::SequenceExhausted, out_events);
                return;
            };

            let from = self.executor.position();
            let outcome = self.executor.apply(&mut self.board, direction);
            out_events.push(Event::StepResolved {
                direction,
                from,
                outcome,
            });

            if outcome == RunOutcome::Blocked {
                continue;
            }
            if let Some(verdict) = outcome.verdict() {
                self.finish(verdict, outcome, out_events);
            }
            return;
        }
    }

    fn finish(&mut self, verdict: Verdict, outcome: RunOutcome, out_events: &mut Vec<Event>) {
        self.run.terminate(verdict);
        self.program.clear();
        out_events.push(Event::ProgramCleared);
        self.settle(outcome, out_events);
    }

    fn settle(&self, outcome: RunOutcome, out_events: &mut Vec<Event>) {
        let goals = self.board.goals();
        debug!(
            level_index = self.level.get(),
            ?outcome,
            remaining = goals.remaining(),
            "run settled"
        );
        out_events.push(Event::RunSettled {
            level: self.level,
            outcome,
            goals,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level } => world.load_level(level, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::EnqueueDirection { direction } => world.enqueue(direction, out_events),
        Command::ClearProgram => world.clear_program(out_events),
        Command::StartRun => world.start_run(out_events),
        Command::AdvanceRun => world.advance_run(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arrow_quest_core::{CellCoord, CellKind, Direction, GoalTally, LevelId, RunPhase};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Level currently loaded into the world.
    #[must_use]
    pub fn level(world: &World) -> LevelId {
        world.level
    }

    /// Goal bookkeeping of the active board.
    #[must_use]
    pub fn goals(world: &World) -> GoalTally {
        world.board.goals()
    }

    /// Cell currently occupied by the avatar.
    #[must_use]
    pub fn avatar(world: &World) -> CellCoord {
        world.executor.position()
    }

    /// Phase of the run controller.
    #[must_use]
    pub fn run_phase(world: &World) -> RunPhase {
        world.run.phase()
    }

    /// Directions still waiting in the program, head first.
    #[must_use]
    pub fn pending_directions(world: &World) -> Vec<Direction> {
        world.program.iter().collect()
    }

    /// Captures a read-only view of the board for presentation.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView {
        let (rows, columns) = world.board.dimensions();
        let mut cells = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(row, column);
                let Some(kind) = world.board.kind_at(cell) else {
                    continue;
                };
                cells.push(CellView {
                    cell,
                    kind,
                    claimed: kind == CellKind::Goal && !world.board.is_unclaimed(cell),
                });
            }
        }

        BoardView {
            rows,
            columns,
            cells,
        }
    }

    /// Read-only snapshot of the board in row-major order.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BoardView {
        rows: u32,
        columns: u32,
        cells: Vec<CellView>,
    }

    impl BoardView {
        /// Number of rows on the board.
        #[must_use]
        pub const fn rows(&self) -> u32 {
            self.rows
        }

        /// Number of columns on the board.
        #[must_use]
        pub const fn columns(&self) -> u32 {
            self.columns
        }

        /// Iterator over the captured cells in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &CellView> {
            self.cells.iter()
        }

        /// Cells belonging to the provided row.
        #[must_use]
        pub fn row(&self, row: u32) -> &[CellView] {
            let width = self.columns as usize;
            let start = row as usize * width;
            self.cells.get(start..start + width).unwrap_or(&[])
        }
    }

    /// Immutable representation of a single board cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellView {
        /// Location of the cell.
        pub cell: CellCoord,
        /// Static kind of the cell.
        pub kind: CellKind,
        /// Whether the cell is a goal the avatar already visited.
        pub claimed: bool,
    }
}
