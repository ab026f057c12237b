#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use survival_arena_core::{select_spawn_point, Command, Event, PlayerSnapshot, SpawnPoint, Vec3};
use tracing::{debug, warn};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Time between two spawn attempts.
    pub spawn_interval: Duration,
    /// Spawn points closer than this to the player are avoided.
    pub min_distance: f32,
    /// Seed of the generator used to pick spawn points.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, keep-away
    /// distance and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, min_distance: f32, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            min_distance,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 30.0, 0x5eed_a7e4_a0b1_c2d3)
    }
}

/// Pure system that periodically emits spawn commands while spawning is enabled.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    timer: Duration,
    running: bool,
    min_distance: f32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            timer: config.spawn_interval,
            running: false,
            min_distance: config.min_distance,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Reports whether the spawn timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Events are processed in order, so a batch that starts spawning and
    /// advances time already counts the advance.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        spawn_points: &[SpawnPoint],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SpawningStarted => {
                    self.running = true;
                    self.timer = self.spawn_interval;
                }
                Event::SpawningStopped => self.running = false,
                Event::TimeAdvanced { dt } => {
                    if self.running && player.is_alive() {
                        self.advance(*dt, player.position, spawn_points, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        center: Vec3,
        spawn_points: &[SpawnPoint],
        out: &mut Vec<Command>,
    ) {
        self.timer = self.timer.saturating_sub(dt);
        if !self.timer.is_zero() {
            return;
        }
        self.timer = self.spawn_interval;
        self.try_spawn(center, spawn_points, out);
    }

    fn try_spawn(&mut self, center: Vec3, spawn_points: &[SpawnPoint], out: &mut Vec<Command>) {
        let Some(point) = select_spawn_point(spawn_points, center, self.min_distance, &mut self.rng)
        else {
            warn!("no enemy spawn points configured; skipping spawn");
            return;
        };
        debug!(x = point.position.x, z = point.position.z, "requesting enemy spawn");
        out.push(Command::SpawnEnemy { point });
    }
}
