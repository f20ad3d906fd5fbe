//! Plain-text presentation of boards, steps and results.

use arrow_quest_core::{CellCoord, CellKind, Direction, GoalTally, RunOutcome};
use arrow_quest_system_campaign::{LevelReport, LevelResult};
use arrow_quest_world::{query, World};

use crate::session::Attempt;

const AVATAR: char = '@';
const EMPTY: char = '.';
const OBSTACLE: char = '#';
const GOAL: char = '*';
const CLAIMED_GOAL: char = '+';

/// Title line naming the loaded level and its goal count.
pub(crate) fn level_header(world: &World) -> String {
    let level = query::level(world);
    let goals = query::goals(world);
    format!("Level {} ({} goals)", level.get(), goals.total())
}

/// Board as a glyph grid, one line per row.
pub(crate) fn board(world: &World) -> String {
    let view = query::board_view(world);
    let avatar = query::avatar(world);
    let lines: Vec<String> = (0..view.rows())
        .map(|row| {
            view.row(row)
                .iter()
                .map(|cell| {
                    if cell.cell == avatar {
                        AVATAR
                    } else {
                        glyph(cell.kind, cell.claimed)
                    }
                })
                .collect()
        })
        .collect();
    lines.join("\n")
}

fn glyph(kind: CellKind, claimed: bool) -> char {
    match kind {
        CellKind::Empty => EMPTY,
        CellKind::Obstacle => OBSTACLE,
        CellKind::Goal if claimed => CLAIMED_GOAL,
        CellKind::Goal => GOAL,
    }
}

/// One line describing a resolved step.
pub(crate) fn step(direction: Direction, from: CellCoord, outcome: RunOutcome) -> String {
    let target = from
        .offset(direction)
        .map_or_else(String::new, |cell| cell.to_string());
    match outcome {
        RunOutcome::Moved(to) => format!("{direction} {from} -> {to}"),
        RunOutcome::Blocked => format!("{direction} {from} blocked by the edge, skipped"),
        RunOutcome::Died => format!("{direction} {from} -> {target} hit an obstacle"),
        RunOutcome::GoalReached(remaining) => {
            format!("{direction} {from} -> {target} goal claimed, {remaining} left")
        }
        RunOutcome::Won => format!("{direction} {from} -> {target} last goal claimed"),
        _ => format!("{direction} {from}"),
    }
}

/// Line printed when a run ends.
pub(crate) fn settled(outcome: RunOutcome, goals: GoalTally) -> String {
    match outcome {
        RunOutcome::Won => "Every goal reached.".to_owned(),
        RunOutcome::Died => format!(
            "The avatar died with {} of {} goals claimed.",
            goals.claimed(),
            goals.total()
        ),
        _ => format!(
            "Program finished with {} of {} goals still unclaimed.",
            goals.remaining(),
            goals.total()
        ),
    }
}

/// Results screen for a won or lost attempt.
pub(crate) fn report(report: &LevelReport) -> String {
    let total = report.level.layout().goal_count();
    let mut stars = String::new();
    for index in 0..total {
        stars.push(if index < report.stars_earned { '★' } else { '☆' });
    }

    let headline = match (report.result, report.stars_earned) {
        (LevelResult::Win, _) => "Level cleared!",
        (LevelResult::Loss, 0) => "Crashed before the first goal.",
        (LevelResult::Loss, _) => "Crashed, but not empty handed.",
    };
    let result = match report.result {
        LevelResult::Win => "Win",
        LevelResult::Loss => "Loss",
    };

    format!(
        "Results: {result} {stars} {headline} (level {}, attempt {})",
        report.level.get(),
        report.attempts
    )
}

/// Summary printed after each attempt.
pub(crate) fn attempt(attempt: &Attempt) -> String {
    let outcome = match attempt.outcome {
        Some(RunOutcome::Won) => "won",
        Some(RunOutcome::Died) => "died",
        Some(_) => "exhausted",
        None => "did not start",
    };
    let mut text = format!(
        "{} of {} directions placed, run {outcome} after {:.1}s",
        attempt.accepted,
        attempt.requested,
        attempt.elapsed.as_secs_f32()
    );
    if attempt.accepted < attempt.requested {
        text.push_str(" (drop zone full)");
    }
    text
}
