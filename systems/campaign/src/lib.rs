#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign bookkeeping system that turns settled runs into level reports.
//!
//! A won level advances to the next layout (wrapping after the last one),
//! a lost level is retried. Either way the system asks the world to reload
//! a fresh board, so goals claimed during a lost attempt are restored.

use arrow_quest_core::{Command, Event, GoalTally, LevelId, RunOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Result shown on the results screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelResult {
    /// Every goal was claimed.
    Win,
    /// The avatar walked into an obstacle.
    Loss,
}

/// Summary of a finished level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelReport {
    /// Level the attempt was played on.
    pub level: LevelId,
    /// Whether the attempt cleared the level.
    pub result: LevelResult,
    /// Goals claimed during the attempt; all goals on a win.
    pub stars_earned: u32,
    /// One-based attempt number on this level.
    pub attempts: u32,
}

/// Tracks level progression across attempts.
#[derive(Debug, Clone)]
pub struct Campaign {
    level: LevelId,
    failures: u32,
    levels_cleared: u32,
}

impl Default for Campaign {
    fn default() -> Self {
        Self::new(LevelId::FIRST)
    }
}

impl Campaign {
    /// Creates a campaign that starts on the provided level.
    #[must_use]
    pub const fn new(start: LevelId) -> Self {
        Self {
            level: start,
            failures: 0,
            levels_cleared: 0,
        }
    }

    /// Level the next attempt is played on.
    #[must_use]
    pub const fn level(&self) -> LevelId {
        self.level
    }

    /// Number of lost attempts on the current level.
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }

    /// Number of levels won since the campaign started.
    #[must_use]
    pub const fn levels_cleared(&self) -> u32 {
        self.levels_cleared
    }

    /// Consumes world events, emitting level loads for the next attempt.
    ///
    /// Returns the report of the attempt that settled in `events`, if any.
    /// Runs that merely exhaust their program are not reported. The level
    /// named by the settled run wins over the one tracked from level loads.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) -> Option<LevelReport> {
        let mut report = None;
        for event in events {
            match event {
                Event::LevelLoaded { level, .. } if *level != self.level => {
                    self.level = *level;
                    self.failures = 0;
                }
                Event::RunSettled {
                    level,
                    outcome,
                    goals,
                } => {
                    if let Some(settled) = self.settle(*level, *outcome, *goals, out) {
                        report = Some(settled);
                    }
                }
                _ => {}
            }
        }
        report
    }

    fn settle(
        &mut self,
        played: LevelId,
        outcome: RunOutcome,
        goals: GoalTally,
        out: &mut Vec<Command>,
    ) -> Option<LevelReport> {
        if played != self.level {
            self.level = played;
            self.failures = 0;
        }
        let attempts = self.failures + 1;

        let report = match outcome {
            RunOutcome::Won => {
                self.level = played.next();
                self.failures = 0;
                self.levels_cleared += 1;
                LevelReport {
                    level: played,
                    result: LevelResult::Win,
                    stars_earned: goals.total(),
                    attempts,
                }
            }
            RunOutcome::Died => {
                self.failures = attempts;
                LevelReport {
                    level: played,
                    result: LevelResult::Loss,
                    stars_earned: goals.claimed(),
                    attempts,
                }
            }
            _ => return None,
        };

        info!(
            level_index = played.get(),
            result = ?report.result,
            stars = report.stars_earned,
            next_level = self.level.get(),
            "level attempt finished"
        );
        out.push(Command::LoadLevel { level: self.level });
        Some(report)
    }
}
