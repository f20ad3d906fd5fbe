#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure program-editor system that turns palette interactions into program commands.

use arrow_quest_core::{Command, Direction, Event, RunOutcome, RunPhase, Verdict};

/// Number of arrow slots available in the program drop zone.
pub const DEFAULT_SLOT_CAPACITY: usize = 10;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramInput {
    /// Direction dropped onto the program zone on this frame, if any.
    pub dropped: Option<Direction>,
    /// Indicates whether the player pressed the clear button on this frame.
    pub clear_action: bool,
    /// Indicates whether the player pressed the play button on this frame.
    pub play_action: bool,
}

impl ProgramInput {
    /// Input that drops a single direction onto the program zone.
    #[must_use]
    pub const fn drop(direction: Direction) -> Self {
        Self {
            dropped: Some(direction),
            clear_action: false,
            play_action: false,
        }
    }

    /// Input that presses the play button.
    #[must_use]
    pub const fn play() -> Self {
        Self {
            dropped: None,
            clear_action: false,
            play_action: true,
        }
    }

    /// Input that presses the clear button.
    #[must_use]
    pub const fn clear() -> Self {
        Self {
            dropped: None,
            clear_action: true,
            play_action: false,
        }
    }
}

/// Program-editor system that translates palette input into world commands.
///
/// The world accepts programs of any length; the visual slot capacity is
/// enforced here. Input is ignored unless the run controller is idle.
#[derive(Debug, Clone)]
pub struct Programmer {
    slot_capacity: usize,
    slots_used: usize,
    phase: RunPhase,
}

impl Default for Programmer {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_CAPACITY)
    }
}

impl Programmer {
    /// Creates a new editor with the provided number of slots.
    #[must_use]
    pub const fn new(slot_capacity: usize) -> Self {
        Self {
            slot_capacity,
            slots_used: 0,
            phase: RunPhase::Idle,
        }
    }

    /// Number of slots in the drop zone.
    #[must_use]
    pub const fn slot_capacity(&self) -> usize {
        self.slot_capacity
    }

    /// Number of slots occupied by arrows since the last clear.
    #[must_use]
    pub const fn slots_used(&self) -> usize {
        self.slots_used
    }

    /// Run controller phase as last observed through events.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Consumes world events and adapter-derived input to emit program commands.
    ///
    /// Within one frame the clear button is handled before a drop, and the
    /// play button last.
    pub fn handle(&mut self, events: &[Event], input: ProgramInput, out: &mut Vec<Command>) {
        for event in events {
            self.observe(event);
        }

        if !self.phase.is_idle() {
            return;
        }

        if input.clear_action {
            out.push(Command::ClearProgram);
            self.slots_used = 0;
        }

        if let Some(direction) = input.dropped {
            if self.slots_used < self.slot_capacity {
                out.push(Command::EnqueueDirection { direction });
                self.slots_used += 1;
            }
        }

        if input.play_action {
            out.push(Command::StartRun);
            self.phase = RunPhase::Running;
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::LevelLoaded { .. } => {
                self.phase = RunPhase::Idle;
                self.slots_used = 0;
            }
            Event::ProgramCleared => self.slots_used = 0,
            Event::DirectionEnqueued { queued, .. } => self.slots_used = *queued,
            Event::EnqueueRejected { phase, .. } => {
                self.slots_used = self.slots_used.saturating_sub(1);
                self.phase = *phase;
            }
            Event::ClearRejected { phase }
            | Event::RunRejected { phase }
            | Event::AdvanceRejected { phase } => self.phase = *phase,
            Event::RunStarted { .. } => self.phase = RunPhase::Running,
            Event::RunSettled { outcome, .. } => {
                self.phase = match outcome {
                    RunOutcome::Won => RunPhase::Terminated(Verdict::Won),
                    RunOutcome::Died => RunPhase::Terminated(Verdict::Died),
                    _ => RunPhase::Idle,
                };
            }
            Event::TimeAdvanced { .. } | Event::StepResolved { .. } => {}
        }
    }
}
