use std::{mem, time::Duration};

use arrow_quest_core::{
    CellCoord, Command, Direction, Event, GoalTally, LevelId, Program, RunOutcome, RunPhase,
};
use arrow_quest_system_campaign::{Campaign, LevelReport};
use arrow_quest_system_pacing::Pacing;
use arrow_quest_system_programmer::{ProgramInput, Programmer};
use arrow_quest_world::{self as world, query, World};
use tracing::{debug, warn};

use crate::config::Settings;

/// Simulated time that passes between two frames.
const FRAME: Duration = Duration::from_millis(50);

/// Receives notifications while a session advances.
pub(crate) trait SessionObserver {
    /// Called after a level has been loaded into the world.
    fn on_level_loaded(&mut self, world: &World);

    /// Called for every step the executor resolved.
    fn on_step(
        &mut self,
        direction: Direction,
        from: CellCoord,
        outcome: RunOutcome,
        world: &World,
    );

    /// Called when a run ends, before the campaign reloads the board.
    fn on_settled(&mut self, outcome: RunOutcome, goals: GoalTally, world: &World);

    /// Called when the campaign reports a won or lost attempt.
    fn on_report(&mut self, report: &LevelReport);
}

/// Summary of a single attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Attempt {
    /// Directions that fit into the drop zone.
    pub(crate) accepted: usize,
    /// Directions the player asked for.
    pub(crate) requested: usize,
    /// How the run ended, if it started at all.
    pub(crate) outcome: Option<RunOutcome>,
    /// Simulated time spent between play and the last step.
    pub(crate) elapsed: Duration,
}

#[derive(Default)]
struct Frame {
    settled: Option<RunOutcome>,
}

/// Couples the world with the program editor, pacing and campaign systems.
///
/// Each frame feeds the events of the previous frame to every system and
/// applies the commands they emit, exactly as an interactive adapter would.
pub(crate) struct Session<O> {
    world: World,
    programmer: Programmer,
    pacing: Pacing,
    campaign: Campaign,
    observer: O,
    events: Vec<Event>,
}

impl<O: SessionObserver> Session<O> {
    /// Creates a session with `start` loaded.
    pub(crate) fn new(settings: &Settings, start: LevelId, observer: O) -> Self {
        let mut session = Self {
            world: World::new(),
            programmer: Programmer::new(settings.program.slot_capacity),
            pacing: Pacing::new(settings.pacing.config()),
            campaign: Campaign::new(start),
            observer,
            events: Vec::new(),
        };
        session.load(start);
        session
    }

    /// World driven by the session.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Level the next attempt is played on.
    pub(crate) fn level(&self) -> LevelId {
        query::level(&self.world)
    }

    /// Number of levels won during the session.
    pub(crate) fn levels_cleared(&self) -> u32 {
        self.campaign.levels_cleared()
    }

    /// Replaces the active level with a fresh board.
    pub(crate) fn load(&mut self, level: LevelId) {
        world::apply(&mut self.world, Command::LoadLevel { level }, &mut self.events);
        let _ = self.frame(ProgramInput::default());
    }

    /// Drops `program` into the editor, presses play and runs until the run settles.
    pub(crate) fn attempt(&mut self, program: &Program) -> Attempt {
        let _ = self.frame(ProgramInput::clear());
        for &direction in program.directions() {
            let _ = self.frame(ProgramInput::drop(direction));
        }
        let accepted = query::pending_directions(&self.world).len();
        if accepted < program.len() {
            warn!(
                accepted,
                requested = program.len(),
                "program does not fit into the drop zone"
            );
        }
        let _ = self.frame(ProgramInput::play());

        let mut elapsed = Duration::ZERO;
        let mut outcome = None;
        while !self.events.is_empty() || query::run_phase(&self.world) == RunPhase::Running {
            if self.events.is_empty() {
                world::apply(&mut self.world, Command::Tick { dt: FRAME }, &mut self.events);
                elapsed += FRAME;
            }
            let frame = self.frame(ProgramInput::default());
            outcome = outcome.or(frame.settled);
        }

        debug!(accepted, ?outcome, ?elapsed, "attempt finished");
        Attempt {
            accepted,
            requested: program.len(),
            outcome,
            elapsed,
        }
    }

    fn frame(&mut self, input: ProgramInput) -> Frame {
        let events = mem::take(&mut self.events);
        let mut frame = Frame::default();
        for event in &events {
            self.observe(event, &mut frame);
        }

        let mut commands = Vec::new();
        self.programmer.handle(&events, input, &mut commands);
        self.pacing.handle(&events, &mut commands);
        if let Some(report) = self.campaign.handle(&events, &mut commands) {
            self.observer.on_report(&report);
        }

        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
        frame
    }

    fn observe(&mut self, event: &Event, frame: &mut Frame) {
        match event {
            Event::LevelLoaded { .. } => self.observer.on_level_loaded(&self.world),
            Event::StepResolved {
                direction,
                from,
                outcome,
            } => self
                .observer
                .on_step(*direction, *from, *outcome, &self.world),
            Event::RunSettled { outcome, goals, .. } => {
                frame.settled = Some(*outcome);
                self.observer.on_settled(*outcome, *goals, &self.world);
            }
            Event::EnqueueRejected { .. }
            | Event::ClearRejected { .. }
            | Event::RunRejected { .. }
            | Event::AdvanceRejected { .. } => warn!(?event, "world rejected a command"),
            Event::TimeAdvanced { .. }
            | Event::DirectionEnqueued { .. }
            | Event::ProgramCleared
            | Event::RunStarted { .. } => {}
        }
    }

    #[cfg(test)]
    fn observer(&self) -> &O {
        &self.observer
    }
}
