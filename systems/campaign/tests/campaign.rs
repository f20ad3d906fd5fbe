use arrow_quest_core::{Command, Direction, Event, GoalTally, LevelId, RunOutcome, RunPhase};
use arrow_quest_system_campaign::{Campaign, LevelReport, LevelResult};
use arrow_quest_world::{self as world, query, World};

/// Runs `program` on the world's current level and lets the campaign react.
fn attempt(
    world: &mut World,
    campaign: &mut Campaign,
    program: &[Direction],
) -> Option<LevelReport> {
    let mut events = Vec::new();
    for &direction in program {
        world::apply(world, Command::EnqueueDirection { direction }, &mut events);
    }
    world::apply(world, Command::StartRun, &mut events);
    while query::run_phase(world) == RunPhase::Running {
        world::apply(world, Command::AdvanceRun, &mut events);
    }

    let mut commands = Vec::new();
    let report = campaign.handle(&events, &mut commands);

    let mut follow_up = Vec::new();
    for command in commands {
        world::apply(world, command, &mut follow_up);
    }
    let _ = campaign.handle(&follow_up, &mut Vec::new());
    report
}

#[test]
fn death_after_one_goal_reports_one_star_and_retries() {
    let mut world = World::new();
    let mut campaign = Campaign::default();

    let report = attempt(
        &mut world,
        &mut campaign,
        &[Direction::Down, Direction::Down, Direction::Right],
    );

    assert_eq!(
        report,
        Some(LevelReport {
            level: LevelId::FIRST,
            result: LevelResult::Loss,
            stars_earned: 1,
            attempts: 1,
        })
    );
    assert_eq!(campaign.level(), LevelId::FIRST);
    assert_eq!(query::level(&world), LevelId::FIRST);
    assert_eq!(query::goals(&world), GoalTally::new(3, 3), "retry restores goals");
    assert_eq!(query::run_phase(&world), RunPhase::Idle);
}

#[test]
fn exhausted_program_is_not_reported() {
    let mut world = World::new();
    let mut campaign = Campaign::default();

    let report = attempt(
        &mut world,
        &mut campaign,
        &[Direction::Down, Direction::Right, Direction::Down],
    );

    assert_eq!(report, None);
    assert_eq!(campaign.failures(), 0);
    assert_eq!(query::goals(&world).remaining(), 1, "board is left as is");
}

#[test]
fn win_awards_all_stars_and_advances() {
    let mut world = World::new();
    let mut campaign = Campaign::default();

    let report = attempt(
        &mut world,
        &mut campaign,
        &[Direction::Down, Direction::Right, Direction::Down, Direction::Right],
    );

    assert_eq!(
        report,
        Some(LevelReport {
            level: LevelId::FIRST,
            result: LevelResult::Win,
            stars_earned: 3,
            attempts: 1,
        })
    );
    let second = LevelId::new(1).expect("second level exists");
    assert_eq!(campaign.level(), second);
    assert_eq!(campaign.levels_cleared(), 1);
    assert_eq!(query::level(&world), second);
    assert_eq!(query::avatar(&world), LevelId::FIRST.layout().start());
}

#[test]
fn attempts_count_losses_until_the_level_is_won() {
    let mut world = World::new();
    let mut campaign = Campaign::default();

    for expected in 1..=2 {
        let report = attempt(&mut world, &mut campaign, &[Direction::Right])
            .expect("walking into the spike is reported");
        assert_eq!(report.attempts, expected);
        assert_eq!(report.stars_earned, 0);
    }

    let report = attempt(
        &mut world,
        &mut campaign,
        &[Direction::Down, Direction::Right, Direction::Down, Direction::Right],
    )
    .expect("win is reported");

    assert_eq!(report.result, LevelResult::Win);
    assert_eq!(report.attempts, 3);
    assert_eq!(campaign.failures(), 0);
}

#[test]
fn winning_the_last_level_wraps_to_the_first() {
    let last = LevelId::new(5).expect("sixth level exists");
    let mut campaign = Campaign::new(last);
    let mut commands = Vec::new();

    let report = campaign.handle(
        &[Event::RunSettled {
            level: last,
            outcome: RunOutcome::Won,
            goals: GoalTally::new(3, 0),
        }],
        &mut commands,
    );

    assert_eq!(report.map(|report| report.level), Some(last));
    assert_eq!(campaign.level(), LevelId::FIRST);
    assert_eq!(
        commands,
        vec![Command::LoadLevel {
            level: LevelId::FIRST,
        }]
    );
}

#[test]
fn loss_on_a_level_the_campaign_never_saw_load_retries_that_level() {
    let fourth = LevelId::new(3).expect("fourth level exists");
    let mut world = World::with_level(fourth);
    let mut campaign = Campaign::default();

    let report = attempt(&mut world, &mut campaign, &[Direction::Down])
        .expect("walking into the spike is reported");

    assert_eq!(report.level, fourth);
    assert_eq!(report.result, LevelResult::Loss);
    assert_eq!(report.attempts, 1);
    assert_eq!(campaign.level(), fourth);
    assert_eq!(query::level(&world), fourth, "retry stays on the same level");
}

#[test]
fn manual_level_load_resets_failures() {
    let mut campaign = Campaign::default();
    let mut commands = Vec::new();
    let _ = campaign.handle(
        &[Event::RunSettled {
            level: LevelId::FIRST,
            outcome: RunOutcome::Died,
            goals: GoalTally::new(3, 3),
        }],
        &mut commands,
    );
    assert_eq!(campaign.failures(), 1);

    let third = LevelId::new(2).expect("third level exists");
    let _ = campaign.handle(
        &[Event::LevelLoaded {
            level: third,
            goals: GoalTally::new(3, 3),
        }],
        &mut commands,
    );

    assert_eq!(campaign.level(), third);
    assert_eq!(campaign.failures(), 0);
}

#[test]
fn every_level_has_a_winning_program() {
    let solutions: [&[Direction]; 6] = {
        use Direction::{Down as D, Left as L, Right as R, Up as U};
        [
            &[D, R, D, R],
            &[R, R, R, D, D, L, L, L],
            &[D, D, R, R, U],
            &[R, D, D, R, R, U, U],
            &[R, L, D, D, R, R, R, U, U],
            &[R, D, L],
        ]
    };
    let mut world = World::new();
    let mut campaign = Campaign::default();

    for (index, solution) in solutions.iter().enumerate() {
        let report = attempt(&mut world, &mut campaign, solution)
            .unwrap_or_else(|| panic!("level {index} solution did not settle"));
        assert_eq!(report.result, LevelResult::Win, "level {index}");
        assert_eq!(report.level.get(), index);
    }

    assert_eq!(campaign.level(), LevelId::FIRST, "campaign wraps around");
    assert_eq!(campaign.levels_cleared(), 6);
}
