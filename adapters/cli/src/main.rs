#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Survival Arena simulation headless.

mod config;

use std::{cell::Cell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use survival_arena_core::{Event, Phase, Vec3};
use survival_arena_simulation::{PlayerInput, Simulation};
use survival_arena_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::FileConfig;

/// Command-line arguments accepted by the runner.
#[derive(Debug, Parser)]
#[command(name = "survival-arena", about = "Runs the Survival Arena simulation headless")]
struct CliArgs {
    /// Optional TOML file describing timings, tuning and the arena layout.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated time to run, in seconds.
    #[arg(long, default_value_t = 180.0)]
    duration: f32,

    /// Length of a single simulation step, in milliseconds.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    /// Overrides the spawn seed from the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the round duration, in seconds.
    #[arg(long, value_name = "SECONDS")]
    round_duration: Option<f32>,

    /// Keeps the player still instead of walking towards objectives.
    #[arg(long)]
    idle: bool,
}

/// Entry point for the Survival Arena command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("survival_arena=info"))
                .context("failed to build log filter")?,
        )
        .init();

    let args = CliArgs::parse();
    ensure!(args.step_ms > 0, "--step-ms must be positive");

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let mut config = file.into_simulation_config()?;
    if let Some(seconds) = args.round_duration {
        config.round.round = seconds_arg(seconds, "--round-duration")?;
    }
    if let Some(seed) = args.seed {
        config.round.rng_seed = seed;
        config.spawning.rng_seed = seed;
    }

    let mut simulation = Simulation::new(config);
    info!("{}", query::welcome_banner(simulation.world()));

    let deaths = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&deaths);
    simulation.on_enemy_death(move |_, _| counter.set(counter.get().saturating_add(1)));

    let step = Duration::from_millis(args.step_ms);
    let total = seconds_arg(args.duration, "--duration")?;
    let mut elapsed = Duration::ZERO;
    let mut summary = Summary::default();

    while elapsed < total {
        let input = if args.idle {
            PlayerInput::default()
        } else {
            autopilot(&simulation)
        };
        let previous = simulation.round().phase();
        let events = simulation.step(step, &input);
        summary.record(previous, &simulation, &events);
        elapsed = elapsed.saturating_add(step);
    }

    let progress = simulation.round().progress();
    println!("simulated {:.1}s", elapsed.as_secs_f32());
    println!("rounds won: {}", summary.victories);
    println!("rounds lost: {}", summary.defeats);
    println!("enemies killed: {}", deaths.get());
    println!("enemies spawned: {}", summary.spawned);
    println!("final level: {}", progress.level);
    println!("kills this round: {}", progress.kills);
    Ok(())
}

fn seconds_arg(seconds: f32, flag: &str) -> Result<Duration> {
    Duration::try_from_secs_f32(seconds)
        .with_context(|| format!("{flag} must be a non-negative number of seconds"))
}

/// Walks the player towards the key, then the door.
fn autopilot(simulation: &Simulation) -> PlayerInput {
    let world = simulation.world();
    let objectives = query::objectives(world);
    let player = query::player(world);
    let movement = objectives
        .key
        .or(objectives.door)
        .map_or(Vec3::ZERO, |goal| goal.position - player.position);
    PlayerInput {
        movement,
        ..PlayerInput::default()
    }
}

#[derive(Debug, Default)]
struct Summary {
    victories: u32,
    defeats: u32,
    spawned: u32,
}

impl Summary {
    fn record(&mut self, previous: Phase, simulation: &Simulation, events: &[Event]) {
        self.spawned = self.spawned.saturating_add(
            u32::try_from(
                events
                    .iter()
                    .filter(|event| matches!(event, Event::EnemySpawned { .. }))
                    .count(),
            )
            .unwrap_or(u32::MAX),
        );

        let round = simulation.round();
        if previous == Phase::GameOver || round.phase() != Phase::GameOver {
            return;
        }
        match round.outcome() {
            Some(outcome) if outcome.is_victory() => self.victories += 1,
            Some(_) => self.defeats += 1,
            None => {}
        }
    }
}
