#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Arrow Quest in the terminal.

mod config;
mod program_transfer;
mod render;
mod session;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use arrow_quest_core::{CellCoord, Direction, GoalTally, LevelId, Program, RunOutcome};
use arrow_quest_system_campaign::LevelReport;
use arrow_quest_world::{query, World};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use self::{
    config::Settings,
    program_transfer::ProgramShare,
    session::{Session, SessionObserver},
};

/// Arrow Quest: queue arrows, press play, reach every goal without touching an obstacle.
#[derive(Debug, Parser)]
#[command(name = "arrow-quest", version)]
struct Cli {
    /// Configuration file; defaults to ./arrow-quest.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print every level layout.
    Levels,
    /// Run a single program on a level.
    Run {
        /// Level index; defaults to the configured start level.
        #[arg(long)]
        level: Option<usize>,
        /// Directions as letters (U, D, L, R) or arrows.
        #[arg(long, required_unless_present = "code")]
        program: Option<Program>,
        /// Share code carrying both level and program.
        #[arg(long, conflicts_with_all = ["level", "program"])]
        code: Option<String>,
    },
    /// Play the campaign interactively, one program per line.
    Play {
        /// Level index to start on; defaults to the configured start level.
        #[arg(long)]
        level: Option<usize>,
    },
    /// Print a share code for a program.
    Share {
        /// Level index the program is written for.
        #[arg(long)]
        level: usize,
        /// Directions as letters (U, D, L, R) or arrows.
        #[arg(long)]
        program: Program,
    },
    /// Print the level and program stored in a share code.
    Decode {
        /// Code produced by `share`.
        code: String,
    },
}

/// Observer that prints the session to standard output.
#[derive(Debug, Default)]
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_level_loaded(&mut self, world: &World) {
        println!("{}", render::level_header(world));
        println!("{}", render::board(world));
    }

    fn on_step(&mut self, direction: Direction, from: CellCoord, outcome: RunOutcome, _: &World) {
        println!("{}", render::step(direction, from, outcome));
    }

    fn on_settled(&mut self, outcome: RunOutcome, goals: GoalTally, world: &World) {
        println!("{}", render::board(world));
        println!("{}", render::settled(outcome, goals));
    }

    fn on_report(&mut self, report: &LevelReport) {
        println!("{}", render::report(report));
    }
}

fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arrow_quest=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")
}

/// Entry point for the Arrow Quest command-line interface.
fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Levels => {
            print_levels();
            Ok(())
        }
        CliCommand::Run {
            level,
            program,
            code,
        } => {
            let (level, program) = match (code, program) {
                (Some(code), _) => {
                    let share = ProgramShare::decode(&code).context("invalid share code")?;
                    (share.level, share.program)
                }
                (None, Some(program)) => (start_level(&settings, level)?, program),
                (None, None) => bail!("either --program or --code is required"),
            };
            run_once(&settings, level, &program);
            Ok(())
        }
        CliCommand::Play { level } => play(&settings, start_level(&settings, level)?),
        CliCommand::Share { level, program } => {
            let share = ProgramShare {
                level: level_id(level)?,
                program,
            };
            println!("{}", share.encode()?);
            Ok(())
        }
        CliCommand::Decode { code } => {
            let share = ProgramShare::decode(&code).context("invalid share code")?;
            println!("level {}: {}", share.level.get(), share.program);
            Ok(())
        }
    }
}

fn level_id(index: usize) -> Result<LevelId> {
    LevelId::new(index).with_context(|| format!("cannot select level {index}"))
}

fn start_level(settings: &Settings, requested: Option<usize>) -> Result<LevelId> {
    match requested {
        Some(index) => level_id(index),
        None => settings.campaign.start_level(),
    }
}

fn print_levels() {
    for level in LevelId::all() {
        let world = World::with_level(level);
        println!("{}", render::level_header(&world));
        println!("{}", render::board(&world));
        println!();
    }
}

fn run_once(settings: &Settings, level: LevelId, program: &Program) {
    let mut session = Session::new(settings, level, ConsoleObserver);
    let attempt = session.attempt(program);
    println!("{}", render::attempt(&attempt));
}

fn play(settings: &Settings, start: LevelId) -> Result<()> {
    let mut session = Session::new(settings, start, ConsoleObserver);
    println!("{}", query::welcome_banner(session.world()));
    print_help();
    prompt(&session)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let input = line.trim();
        match input {
            "" => {}
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_help(),
            "board" => println!("{}", render::board(session.world())),
            _ => {
                if let Some(index) = input.strip_prefix("level ") {
                    match index.trim().parse::<usize>().map(LevelId::new) {
                        Ok(Ok(level)) => session.load(level),
                        Ok(Err(error)) => println!("{error}"),
                        Err(_) => println!("'{}' is not a level number", index.trim()),
                    }
                } else {
                    match input.parse::<Program>() {
                        Ok(program) => {
                            let attempt = session.attempt(&program);
                            println!("{}", render::attempt(&attempt));
                        }
                        Err(error) => println!("{error}"),
                    }
                }
            }
        }
        prompt(&session)?;
    }

    println!();
    println!("Levels cleared: {}", session.levels_cleared());
    Ok(())
}

fn print_help() {
    println!("Type a program such as DRDR (or ↓→↓→) and press enter to run it.");
    println!("Commands: board, level <n>, help, quit");
}

fn prompt(session: &Session<ConsoleObserver>) -> Result<()> {
    print!("level {}> ", session.level().get());
    io::stdout().flush().context("failed to flush stdout")
}
