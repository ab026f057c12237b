#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic per-tick orchestration of the world and its systems.
//!
//! Each [`Simulation::step`] translates host input into commands, applies a
//! `Tick`, and then pumps the resulting events through the round, spawning
//! and combat systems in that order until no system emits further commands.
//! The simulation also stands in for the host's navigation by walking free
//! enemies straight towards the player.

use std::time::Duration;

use survival_arena_core::{
    ArenaLayout, Command, EnemyId, EnemyState, Event, Objective, Vec3,
};
use survival_arena_system_combat::{self as combat, Combat};
use survival_arena_system_round::{self as round, Round, RoundView};
use survival_arena_system_spawning::{self as spawning, Spawning};
use survival_arena_world::{self as world, query, World};
use tracing::warn;

const MAX_PUMP_ROUNDS: usize = 64;

/// Tuning for the whole simulation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Tuning for the authoritative world.
    pub world: world::Config,
    /// Round timing and objective placement.
    pub round: round::Config,
    /// Spawn cadence and keep-away distance.
    pub spawning: spawning::Config,
    /// Target acquisition and contact ranges.
    pub combat: combat::Config,
    /// Spawn point sets of the arena.
    pub layout: ArenaLayout,
    /// Player movement speed in world units per second.
    pub player_speed: f32,
    /// Enemy movement speed in world units per second.
    pub enemy_speed: f32,
    /// Distance at which the player touches the key or the door.
    pub objective_reach: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: world::Config::default(),
            round: round::Config::default(),
            spawning: spawning::Config::default(),
            combat: combat::Config::default(),
            layout: ArenaLayout::default(),
            player_speed: 6.0,
            enemy_speed: 3.0,
            objective_reach: 1.5,
        }
    }
}

/// Host input sampled for a single step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired movement direction; only the horizontal part is used.
    pub movement: Vec3,
    /// Requests a weapon switch.
    pub switch_weapon: bool,
    /// Objectives the host reports as overlapping the player.
    pub contacts: Vec<Objective>,
}

type DeathCallback = Box<dyn FnMut(EnemyId, Vec3)>;

/// Owns the world and every system, and advances them together.
pub struct Simulation {
    world: World,
    round: Round,
    spawning: Spawning,
    combat: Combat,
    player_speed: f32,
    enemy_speed: f32,
    contact_range: f32,
    objective_reach: f32,
    death_callbacks: Vec<DeathCallback>,
}

impl Simulation {
    /// Builds the world, configures the arena and starts the first round.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut simulation = Self {
            world: World::with_config(config.world),
            round: Round::new(config.round),
            spawning: Spawning::new(config.spawning),
            combat: Combat::new(config.combat),
            player_speed: config.player_speed,
            enemy_speed: config.enemy_speed,
            contact_range: config.combat.contact_range,
            objective_reach: config.objective_reach,
            death_callbacks: Vec::new(),
        };

        let mut events = Vec::new();
        world::apply(
            &mut simulation.world,
            Command::ConfigureArena {
                layout: config.layout,
            },
            &mut events,
        );

        let mut commands = Vec::new();
        let player = query::player(&simulation.world);
        let view = RoundView {
            player: &player,
            layout: query::layout(&simulation.world),
            objectives: query::objectives(&simulation.world),
        };
        simulation.round.start(&view, &mut commands);
        for command in commands {
            world::apply(&mut simulation.world, command, &mut events);
        }

        let _ = simulation.pump(events);
        simulation
    }

    /// Registers a callback invoked once for every enemy death.
    pub fn on_enemy_death<F>(&mut self, callback: F)
    where
        F: FnMut(EnemyId, Vec3) + 'static,
    {
        self.death_callbacks.push(Box::new(callback));
    }

    /// Advances the simulation by `dt` and returns every event it produced.
    pub fn step(&mut self, dt: Duration, input: &PlayerInput) -> Vec<Event> {
        let mut events = Vec::new();

        if input.switch_weapon {
            world::apply(&mut self.world, Command::SwitchWeapon, &mut events);
        }
        self.move_player(dt, input.movement, &mut events);
        self.steer_enemies(dt, &mut events);
        self.report_contacts(&input.contacts, &mut events);

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.pump(events)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the round state machine.
    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    fn move_player(&mut self, dt: Duration, movement: Vec3, events: &mut Vec<Event>) {
        let direction = Vec3::new(movement.x, 0.0, movement.z).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        let player = query::player(&self.world);
        if !player.is_alive() {
            return;
        }
        let position = player.position + direction * self.player_speed * dt.as_secs_f32();
        world::apply(
            &mut self.world,
            Command::SetPlayerPosition { position },
            events,
        );
    }

    fn steer_enemies(&mut self, dt: Duration, events: &mut Vec<Event>) {
        let player = query::player(&self.world);
        if !player.is_alive() {
            return;
        }
        let stride = self.enemy_speed * dt.as_secs_f32();
        let stop_distance = self.contact_range * 0.8;

        let mut commands = Vec::new();
        for enemy in query::spawn_registry(&self.world).iter() {
            if enemy.state != EnemyState::Free {
                continue;
            }
            let mut offset = player.position - enemy.position;
            offset.y = 0.0;
            let distance = offset.length();
            let travel = (distance - stop_distance).clamp(0.0, stride);
            if travel <= 0.0 {
                continue;
            }
            commands.push(Command::SetEnemyPosition {
                enemy: enemy.id,
                position: enemy.position + offset.normalize_or_zero() * travel,
            });
        }

        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn report_contacts(&mut self, reported: &[Objective], events: &mut Vec<Event>) {
        let player = query::player(&self.world);
        let objectives = query::objectives(&self.world);

        let mut contacts = reported.to_vec();
        for objective in [Objective::Key, Objective::Door] {
            let touching = objectives.placement(objective).map_or(false, |point| {
                point.position.distance(player.position) <= self.objective_reach
            });
            if touching && !contacts.contains(&objective) {
                contacts.push(objective);
            }
        }

        for objective in contacts {
            world::apply(
                &mut self.world,
                Command::ReportObjectiveContact { objective },
                events,
            );
        }
    }

    fn pump(&mut self, mut batch: Vec<Event>) -> Vec<Event> {
        let mut log = Vec::new();

        for _ in 0..MAX_PUMP_ROUNDS {
            if batch.is_empty() {
                return log;
            }
            self.notify_deaths(&batch);

            let mut commands = Vec::new();
            let player = query::player(&self.world);
            let view = RoundView {
                player: &player,
                layout: query::layout(&self.world),
                objectives: query::objectives(&self.world),
            };
            self.round.handle(&batch, &view, &mut commands);
            self.spawning.handle(
                &batch,
                &player,
                query::enemy_spawn_points(&self.world),
                &mut commands,
            );
            let registry = query::spawn_registry(&self.world);
            self.combat
                .handle(&batch, &player, &registry, &mut commands);

            log.append(&mut batch);
            for command in commands {
                world::apply(&mut self.world, command, &mut batch);
            }
        }

        warn!(pending = batch.len(), "event pump did not settle");
        log.append(&mut batch);
        log
    }

    fn notify_deaths(&mut self, events: &[Event]) {
        if self.death_callbacks.is_empty() {
            return;
        }
        for event in events {
            if let Event::EnemyDied { enemy, position } = event {
                for callback in &mut self.death_callbacks {
                    callback(*enemy, *position);
                }
            }
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("phase", &self.round.phase())
            .field("tick", &query::tick_index(&self.world))
            .field("death_callbacks", &self.death_callbacks.len())
            .finish_non_exhaustive()
    }
}
