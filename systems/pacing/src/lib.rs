#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pacing system responsible for emitting run advance commands.

use std::time::Duration;

use arrow_quest_core::{Command, Event};

const DEFAULT_MOVE_DURATION: Duration = Duration::from_millis(500);
const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(300);

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    move_duration: Duration,
    step_delay: Duration,
}

impl Config {
    /// Creates a new configuration from the move animation length and the pause after it.
    #[must_use]
    pub const fn new(move_duration: Duration, step_delay: Duration) -> Self {
        Self {
            move_duration,
            step_delay,
        }
    }

    /// Simulated time between two consecutive steps of a run.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        self.move_duration.saturating_add(self.step_delay)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_DURATION, DEFAULT_STEP_DELAY)
    }
}

/// Pure system that spaces the steps of an active run over simulated time.
///
/// The first step executes as soon as the run starts. Each later step waits
/// for one step interval, and a single tick never releases more than one
/// step, so a terminal outcome is always observed before the next advance.
#[derive(Debug)]
pub struct Pacing {
    step_interval: Duration,
    accumulator: Duration,
    active: bool,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step_interval: config.step_interval(),
            accumulator: Duration::ZERO,
            active: false,
        }
    }

    /// Reports whether a run is currently being paced.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Consumes world events and emits advance commands for the active run.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunStarted { .. } => {
                    self.active = true;
                    self.accumulator = Duration::ZERO;
                    out.push(Command::AdvanceRun);
                }
                Event::RunSettled { .. } | Event::LevelLoaded { .. } => {
                    self.active = false;
                    self.accumulator = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } if self.active => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    if self.accumulator >= self.step_interval {
                        let leftover = self.accumulator.saturating_sub(self.step_interval);
                        // A tick spanning several intervals must not bank the surplus.
                        self.accumulator = if leftover < self.step_interval {
                            leftover
                        } else {
                            Duration::ZERO
                        };
                        out.push(Command::AdvanceRun);
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
