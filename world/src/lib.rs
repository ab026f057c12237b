#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Survival Arena.

mod effects;
mod enemies;
mod player;

use std::time::Duration;

use survival_arena_core::{
    ArenaLayout, Command, EffectId, EffectKind, EnemyId, Event, Objective, ObjectiveView,
    SpawnFailure, SpawnPoint, StatusMessage, Vec3, WELCOME_BANNER,
};
use survival_arena_pool::{Pool, PoolConfig, PoolId};
use tracing::{debug, info, warn};

use effects::Effect;
use enemies::{DamageOutcome, Enemy, Expiry};
use player::{Player, PlayerHit};

pub use enemies::EnemyConfig;
pub use player::PlayerConfig;

/// Tuning for every entity owned by the world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    /// Player avatar tuning.
    pub player: PlayerConfig,
    /// Template applied to every pooled enemy.
    pub enemy: EnemyConfig,
    /// Sizing of the enemy pool.
    pub enemy_pool: PoolConfig,
    /// Sizing of the visual effect pool.
    pub effect_pool: PoolConfig,
}

/// Represents the authoritative Survival Arena world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    layout: ArenaLayout,
    player: Player,
    enemies: Pool<Enemy>,
    effects: Pool<Effect>,
    objectives: ObjectiveView,
    spawning: bool,
    status: Option<StatusMessage>,
    tick_index: u64,
}

impl World {
    /// Creates a new Survival Arena world with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new world using the provided tuning.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            layout: ArenaLayout::default(),
            player: Player::new(config.player),
            enemies: Pool::new(Enemy::prefab(config.enemy), config.enemy_pool),
            effects: Pool::new(Effect::default(), config.effect_pool),
            objectives: ObjectiveView::default(),
            spawning: false,
            status: None,
            tick_index: 0,
        }
    }

    fn live_enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        let id = pool_id(enemy);
        if !self.enemies.is_live(id) {
            debug!(enemy = enemy.get(), "ignoring command for an enemy that is not live");
            return None;
        }
        self.enemies.get_mut(id)
    }

    fn spawn_enemy(&mut self, point: SpawnPoint, out_events: &mut Vec<Event>) {
        if !self.spawning {
            debug!("ignoring spawn request while spawning is stopped");
            return;
        }
        match self.enemies.acquire() {
            Ok(id) => {
                if let Some(enemy) = self.enemies.get_mut(id) {
                    enemy.reset(point);
                }
                out_events.push(Event::EnemySpawned {
                    enemy: enemy_id(id),
                    point,
                });
            }
            Err(error) => {
                warn!(%error, "skipping enemy spawn");
                out_events.push(Event::SpawnFailed {
                    reason: SpawnFailure::PoolExhausted,
                });
            }
        }
    }

    fn damage_enemy(
        &mut self,
        enemy: EnemyId,
        amount: u32,
        source: Vec3,
        knockback_force: f32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(entity) = self.live_enemy_mut(enemy) else {
            return;
        };
        let outcome = entity.apply_damage(amount, source, knockback_force);
        let position = entity.position();

        match outcome {
            DamageOutcome::Ignored => {
                debug!(enemy = enemy.get(), "ignoring damage to a dead enemy");
            }
            DamageOutcome::Survived { health, knockback } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    health,
                });
                if let Some(velocity) = knockback {
                    out_events.push(Event::EnemyKnockedBack { enemy, velocity });
                }
                self.start_effect(EffectKind::Hit, position, out_events);
            }
            DamageOutcome::Killed { health, position } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    health,
                });
                out_events.push(Event::EnemyDied { enemy, position });
                self.start_effect(EffectKind::Death, position, out_events);
            }
        }
    }

    fn player_attack(&mut self, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self.player.attack_ready() {
            debug!(target = target.get(), "ignoring attack while the weapon is not ready");
            return;
        }

        let Some(target_position) = self
            .enemies
            .get(pool_id(target))
            .filter(|enemy| self.enemies.is_live(pool_id(target)) && enemy.is_alive())
            .map(Enemy::position)
        else {
            debug!(target = target.get(), "ignoring attack on an invalid target");
            return;
        };

        let origin = self.player.position();
        let weapon = self.player.weapon();
        if origin.distance(target_position) > weapon.range() {
            debug!(target = target.get(), "ignoring attack on a target out of range");
            return;
        }

        self.player.consume_shot();
        out_events.push(Event::PlayerFired { weapon, target });

        let mut victims = vec![target];
        if let Some(spread) = weapon.spread() {
            let aim = horizontal(target_position - origin);
            let half_angle = spread.half_angle_degrees.to_radians();
            for (id, enemy) in self.enemies.iter_live() {
                let candidate = enemy_id(id);
                if candidate == target || !enemy.is_alive() {
                    continue;
                }
                let offset = horizontal(enemy.position() - origin);
                if offset.length() > spread.radius {
                    continue;
                }
                if within_cone(aim, offset, half_angle) {
                    victims.push(candidate);
                }
            }
        }

        for victim in victims {
            self.damage_enemy(
                victim,
                weapon.damage(),
                origin,
                weapon.knockback_force(),
                out_events,
            );
        }
    }

    fn enemy_attack(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            debug!(enemy = enemy.get(), "ignoring attack on a dead player");
            return;
        }
        let target = self.player.position();
        let Some(entity) = self.live_enemy_mut(enemy) else {
            return;
        };
        if !entity.reaches(target) {
            debug!(enemy = enemy.get(), "ignoring attack on a player out of reach");
            return;
        }
        let Some(damage) = entity.try_attack() else {
            debug!(enemy = enemy.get(), "ignoring attack before the cooldown elapsed");
            return;
        };

        out_events.push(Event::EnemyAttacked { enemy, damage });
        match self.player.take_damage(damage) {
            PlayerHit::Ignored => {}
            PlayerHit::Wounded(health) => {
                out_events.push(Event::PlayerDamaged {
                    amount: damage,
                    health,
                });
            }
            PlayerHit::Killed(health) => {
                out_events.push(Event::PlayerDamaged {
                    amount: damage,
                    health,
                });
                info!("player died");
                out_events.push(Event::PlayerDied);
            }
        }
    }

    fn start_effect(&mut self, kind: EffectKind, position: Vec3, out_events: &mut Vec<Event>) {
        match self.effects.acquire() {
            Ok(id) => {
                if let Some(effect) = self.effects.get_mut(id) {
                    effect.start(kind, position);
                }
                out_events.push(Event::EffectStarted {
                    effect: EffectId::new(id.get()),
                    kind,
                    position,
                });
            }
            Err(error) => debug!(%error, "skipping visual effect"),
        }
    }

    fn set_spawning(&mut self, enabled: bool, out_events: &mut Vec<Event>) {
        if self.spawning == enabled {
            debug!(enabled, "spawning already in requested state");
            return;
        }
        self.spawning = enabled;
        if enabled {
            info!("enemy spawning started");
            out_events.push(Event::SpawningStarted);
        } else {
            info!("enemy spawning stopped");
            out_events.push(Event::SpawningStopped);
        }
    }

    fn objective_contact(&mut self, objective: Objective, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            debug!(?objective, "ignoring objective contact from a dead player");
            return;
        }
        match objective {
            Objective::Key => {
                if self.objectives.key.take().is_some() {
                    out_events.push(Event::ObjectiveHidden {
                        objective: Objective::Key,
                    });
                    out_events.push(Event::KeyCollected);
                } else {
                    debug!("ignoring contact with a hidden key");
                }
            }
            Objective::Door => {
                if self.objectives.door.is_some() {
                    out_events.push(Event::DoorReached);
                } else {
                    debug!("ignoring contact with a hidden door");
                }
            }
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.player.advance(dt);

        let live: Vec<PoolId> = self.enemies.live_ids().to_vec();
        for id in live {
            let Some(expiry) = self.enemies.get_mut(id).and_then(|enemy| enemy.advance(dt)) else {
                continue;
            };
            let enemy = enemy_id(id);
            match expiry {
                Expiry::Recovered => out_events.push(Event::EnemyRecovered { enemy }),
                Expiry::StartedSinking => out_events.push(Event::EnemySinking { enemy }),
                Expiry::ReadyForReturn => {
                    if self.enemies.release(id) {
                        out_events.push(Event::EnemyReturned { enemy });
                    }
                }
            }
        }

        let playing: Vec<PoolId> = self.effects.live_ids().to_vec();
        for id in playing {
            let finished = self
                .effects
                .get_mut(id)
                .map_or(false, |effect| effect.advance(dt));
            if finished && self.effects.release(id) {
                out_events.push(Event::EffectFinished {
                    effect: EffectId::new(id.get()),
                });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { layout } => {
            if layout.enemy_spawn_points.is_empty() {
                warn!("arena has no enemy spawn points; spawning will be skipped");
            }
            if layout.key_spawn_points.is_empty() {
                warn!("arena has no key spawn points; the key will not be placed");
            }
            if layout.door_spawn_points.is_empty() {
                warn!("arena has no door spawn points; the door will not be placed");
            }
            world.layout = layout;
            out_events.push(Event::ArenaConfigured);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt, out_events);
        }
        Command::StartSpawning => world.set_spawning(true, out_events),
        Command::StopSpawning => world.set_spawning(false, out_events),
        Command::SpawnEnemy { point } => world.spawn_enemy(point, out_events),
        Command::ReleaseAllEnemies => {
            for id in world.enemies.release_all() {
                out_events.push(Event::EnemyReturned {
                    enemy: enemy_id(id),
                });
            }
        }
        Command::ResetPlayer => {
            let position = world.player.reset();
            out_events.push(Event::PlayerReset { position });
        }
        Command::SetPlayerPosition { position } => {
            if !world.player.move_to(position) {
                debug!("ignoring movement of a dead player");
            }
        }
        Command::SetEnemyPosition { enemy, position } => {
            if let Some(entity) = world.live_enemy_mut(enemy) {
                if !entity.steer_to(position) {
                    debug!(enemy = enemy.get(), "ignoring navigation while not under control");
                }
            }
        }
        Command::SwitchWeapon => match world.player.switch_weapon() {
            Some(weapon) => out_events.push(Event::WeaponSwitched { weapon }),
            None => debug!("ignoring weapon switch of a dead player"),
        },
        Command::PlayerAttack { target } => world.player_attack(target, out_events),
        Command::EnemyAttack { enemy } => world.enemy_attack(enemy, out_events),
        Command::DamageEnemy {
            enemy,
            amount,
            source,
            knockback_force,
        } => world.damage_enemy(enemy, amount, source, knockback_force, out_events),
        Command::PlaceObjective { objective, point } => {
            match objective {
                Objective::Key => world.objectives.key = Some(point),
                Objective::Door => world.objectives.door = Some(point),
            }
            out_events.push(Event::ObjectivePlaced { objective, point });
        }
        Command::HideObjective { objective } => {
            let previous = match objective {
                Objective::Key => world.objectives.key.take(),
                Objective::Door => world.objectives.door.take(),
            };
            if previous.is_some() {
                out_events.push(Event::ObjectiveHidden { objective });
            }
        }
        Command::ReportObjectiveContact { objective } => {
            world.objective_contact(objective, out_events);
        }
        Command::ShowStatus { message } => {
            world.status = Some(message.clone());
            out_events.push(Event::StatusShown { message });
        }
        Command::ClearStatus => {
            if world.status.take().is_some() {
                out_events.push(Event::StatusCleared);
            }
        }
        Command::AnnounceCountdown { seconds } => {
            out_events.push(Event::CountdownChanged { seconds });
        }
    }
}

fn enemy_id(id: PoolId) -> EnemyId {
    EnemyId::new(id.get())
}

fn pool_id(enemy: EnemyId) -> PoolId {
    PoolId::new(enemy.get())
}

fn horizontal(mut vector: Vec3) -> Vec3 {
    vector.y = 0.0;
    vector
}

fn within_cone(aim: Vec3, offset: Vec3, half_angle: f32) -> bool {
    if aim.length_squared() <= f32::EPSILON || offset.length_squared() <= f32::EPSILON {
        return true;
    }
    aim.angle_between(offset) <= half_angle
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use survival_arena_core::{
        ArenaLayout, EffectId, EffectKind, EnemyId, EnemySnapshot, ObjectiveView,
        PlayerSnapshot, SpawnPoint, SpawnRegistry, StatusMessage, Vec3,
    };

    use super::{enemy_id, pool_id, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures every live enemy, in the pool's live order.
    #[must_use]
    pub fn spawn_registry(world: &World) -> SpawnRegistry {
        SpawnRegistry::from_snapshots(
            world
                .enemies
                .iter_live()
                .map(|(id, enemy)| enemy.snapshot(enemy_id(id)))
                .collect(),
        )
    }

    /// Captures a single enemy while it is live.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        let id = pool_id(enemy);
        if !world.enemies.is_live(id) {
            return None;
        }
        world.enemies.get(id).map(|entity| entity.snapshot(enemy))
    }

    /// Provides read-only access to the configured arena layout.
    #[must_use]
    pub fn layout(world: &World) -> &ArenaLayout {
        &world.layout
    }

    /// Spawn points enemies may be placed at.
    #[must_use]
    pub fn enemy_spawn_points(world: &World) -> &[SpawnPoint] {
        &world.layout.enemy_spawn_points
    }

    /// Placement of the key and door while visible.
    #[must_use]
    pub fn objectives(world: &World) -> ObjectiveView {
        world.objectives
    }

    /// Reports whether periodic spawning is enabled.
    #[must_use]
    pub fn spawning_enabled(world: &World) -> bool {
        world.spawning
    }

    /// Status message currently displayed, if any.
    #[must_use]
    pub fn status(world: &World) -> Option<&StatusMessage> {
        world.status.as_ref()
    }

    /// Reports how the enemy pool is currently partitioned.
    #[must_use]
    pub fn enemy_pool_usage(world: &World) -> PoolUsage {
        PoolUsage {
            idle: world.enemies.idle_len(),
            live: world.enemies.live_len(),
            capacity: world.enemies.capacity(),
        }
    }

    /// Captures every visual effect that is still playing.
    #[must_use]
    pub fn active_effects(world: &World) -> Vec<EffectSnapshot> {
        world
            .effects
            .iter_live()
            .filter_map(|(id, effect)| {
                effect.kind().map(|kind| EffectSnapshot {
                    id: EffectId::new(id.get()),
                    kind,
                    position: effect.position(),
                })
            })
            .collect()
    }

    /// Partition of a pool between idle and live instances.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PoolUsage {
        /// Instances waiting to be acquired.
        pub idle: usize,
        /// Instances currently in use.
        pub live: usize,
        /// Instances ever created.
        pub capacity: usize,
    }

    /// Immutable representation of a playing visual effect.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EffectSnapshot {
        /// Identifier of the effect instance.
        pub id: EffectId,
        /// Visual effect being played.
        pub kind: EffectKind,
        /// World position of the effect.
        pub position: Vec3,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use survival_arena_core::{EnemyState, Health, Weapon};

    use super::*;

    fn spawn_at(world: &mut World, position: Vec3) -> EnemyId {
        apply(world, Command::StartSpawning, &mut Vec::new());
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                point: SpawnPoint::at(position),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn damage(world: &mut World, enemy: EnemyId, amount: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::DamageEnemy {
                enemy,
                amount,
                source: Vec3::ZERO,
                knockback_force: 1.0,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn damage_sequence_knocks_back_then_kills_once() {
        let mut world = World::new();
        let enemy = spawn_at(&mut world, Vec3::new(2.0, 0.0, 0.0));

        let events = damage(&mut world, enemy, 40);
        assert!(events.contains(&Event::EnemyDamaged {
            enemy,
            amount: 40,
            health: Health::new(60),
        }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyKnockedBack { .. })));
        assert_eq!(
            query::enemy(&world, enemy).map(|snapshot| snapshot.state),
            Some(EnemyState::KnockedBack)
        );

        let events = damage(&mut world, enemy, 70);
        assert!(events.contains(&Event::EnemyDamaged {
            enemy,
            amount: 70,
            health: Health::new(-10),
        }));
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDied { .. }))
            .count();
        assert_eq!(deaths, 1);

        assert!(damage(&mut world, enemy, 70).is_empty());
    }

    #[test]
    fn dead_enemy_sinks_and_returns_to_pool() {
        let mut world = World::new();
        let enemy = spawn_at(&mut world, Vec3::ZERO);
        let _ = damage(&mut world, enemy, 100);

        let events = tick(&mut world, 100);
        assert!(events.contains(&Event::EnemySinking { enemy }));

        let _ = tick(&mut world, 1_000);
        assert!(query::enemy(&world, enemy).is_some());

        let events = tick(&mut world, 1_000);
        assert!(events.contains(&Event::EnemyReturned { enemy }));
        assert!(query::enemy(&world, enemy).is_none());
        assert_eq!(query::enemy_pool_usage(&world).live, 0);
    }

    #[test]
    fn recycled_enemy_keeps_identity_and_resets() {
        let mut world = World::new();
        let first = spawn_at(&mut world, Vec3::ZERO);
        let _ = damage(&mut world, first, 500);

        let mut events = Vec::new();
        apply(&mut world, Command::ReleaseAllEnemies, &mut events);
        assert_eq!(events, vec![Event::EnemyReturned { enemy: first }]);

        let mut world_events = Vec::new();
        for _ in 0..9 {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    point: SpawnPoint::at(Vec3::X),
                },
                &mut world_events,
            );
        }
        let recycled = spawn_at(&mut world, Vec3::X);
        assert_eq!(recycled, first);
        let snapshot = query::enemy(&world, recycled).expect("recycled enemy is live");
        assert_eq!(snapshot.health, Health::new(100));
        assert_eq!(snapshot.state, EnemyState::Free);
    }

    #[test]
    fn exhausted_enemy_pool_reports_spawn_failure() {
        let mut world = World::with_config(Config {
            enemy_pool: PoolConfig {
                initial_capacity: 1,
                expansion_batch: 0,
                max_capacity: None,
            },
            ..Config::default()
        });
        let _ = spawn_at(&mut world, Vec3::ZERO);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                point: SpawnPoint::at(Vec3::ZERO),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::SpawnFailed {
                reason: SpawnFailure::PoolExhausted,
            }]
        );
    }

    #[test]
    fn spawning_toggles_emit_only_on_change() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::StartSpawning, &mut events);
        apply(&mut world, Command::StartSpawning, &mut events);
        apply(&mut world, Command::StopSpawning, &mut events);
        apply(&mut world, Command::StopSpawning, &mut events);

        assert_eq!(events, vec![Event::SpawningStarted, Event::SpawningStopped]);
        assert!(!query::spawning_enabled(&world));
    }

    #[test]
    fn spawn_requests_after_release_are_dropped_while_stopped() {
        let mut world = World::new();
        let _ = spawn_at(&mut world, Vec3::X);

        let mut events = Vec::new();
        apply(&mut world, Command::StopSpawning, &mut events);
        apply(&mut world, Command::ReleaseAllEnemies, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                point: SpawnPoint::at(Vec3::Z),
            },
            &mut events,
        );

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { .. })));
        assert_eq!(query::enemy_pool_usage(&world).live, 0);
    }

    #[test]
    fn enemy_attacks_beyond_reach_are_ignored() {
        let mut world = World::new();
        let far = spawn_at(&mut world, Vec3::new(5.0, 0.0, 0.0));
        let near = spawn_at(&mut world, Vec3::new(1.5, 0.0, 0.0));
        let _ = tick(&mut world, 500);

        let mut events = Vec::new();
        apply(&mut world, Command::EnemyAttack { enemy: far }, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::player(&world).health, Health::new(100));

        apply(&mut world, Command::EnemyAttack { enemy: near }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::EnemyAttacked {
                    enemy: near,
                    damage: 10,
                },
                Event::PlayerDamaged {
                    amount: 10,
                    health: Health::new(90),
                },
            ]
        );
    }

    #[test]
    fn dead_player_cannot_move_switch_or_attack() {
        let mut world = World::new();
        let enemy = spawn_at(&mut world, Vec3::new(1.0, 0.0, 0.0));
        let mut events = Vec::new();

        for _ in 0..10 {
            let _ = tick(&mut world, 500);
            apply(&mut world, Command::EnemyAttack { enemy }, &mut events);
        }
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::PlayerDied))
                .count(),
            1
        );
        assert!(!query::player(&world).is_alive());

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayerPosition {
                position: Vec3::splat(5.0),
            },
            &mut events,
        );
        apply(&mut world, Command::SwitchWeapon, &mut events);
        apply(&mut world, Command::PlayerAttack { target: enemy }, &mut events);
        apply(&mut world, Command::EnemyAttack { enemy }, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::player(&world).position, Vec3::ZERO);

        apply(&mut world, Command::ResetPlayer, &mut events);
        let player = query::player(&world);
        assert_eq!(player.health, player.starting_health);
        assert_eq!(events, vec![Event::PlayerReset { position: Vec3::ZERO }]);
    }

    #[test]
    fn rifle_ignores_targets_beyond_range() {
        let mut world = World::new();
        let far = spawn_at(&mut world, Vec3::new(30.0, 0.0, 0.0));
        let mut events = Vec::new();

        apply(&mut world, Command::PlayerAttack { target: far }, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn shotgun_hits_every_living_enemy_inside_the_cone() {
        let mut world = World::new();
        let aimed = spawn_at(&mut world, Vec3::new(4.0, 0.0, 0.0));
        let flanking = spawn_at(&mut world, Vec3::new(4.0, 0.0, 1.0));
        let behind = spawn_at(&mut world, Vec3::new(-4.0, 0.0, 0.0));
        let distant = spawn_at(&mut world, Vec3::new(10.0, 0.0, 0.0));

        let mut events = Vec::new();
        apply(&mut world, Command::SwitchWeapon, &mut events);
        assert_eq!(
            events,
            vec![Event::WeaponSwitched {
                weapon: Weapon::Shotgun,
            }]
        );

        let mut events = Vec::new();
        apply(&mut world, Command::PlayerAttack { target: aimed }, &mut events);
        let damaged: Vec<EnemyId> = events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDamaged { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();

        assert_eq!(damaged, vec![aimed, flanking]);
        assert!(!damaged.contains(&behind));
        assert!(!damaged.contains(&distant));
        assert!(!query::player(&world).attack_ready);
    }

    #[test]
    fn hits_start_effects_that_finish_on_later_ticks() {
        let mut world = World::new();
        let enemy = spawn_at(&mut world, Vec3::X);
        let events = damage(&mut world, enemy, 10);
        let effect = events
            .iter()
            .find_map(|event| match event {
                Event::EffectStarted {
                    effect,
                    kind: EffectKind::Hit,
                    ..
                } => Some(*effect),
                _ => None,
            })
            .expect("hit effect started");
        assert_eq!(query::active_effects(&world).len(), 1);

        let events = tick(&mut world, 500);
        assert!(events.contains(&Event::EffectFinished { effect }));
        assert!(query::active_effects(&world).is_empty());
    }

    #[test]
    fn key_contact_hides_key_and_reports_collection_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        let point = SpawnPoint::at(Vec3::new(40.0, 0.0, 0.0));

        apply(
            &mut world,
            Command::PlaceObjective {
                objective: Objective::Key,
                point,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ReportObjectiveContact {
                objective: Objective::Key,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ReportObjectiveContact {
                objective: Objective::Key,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ReportObjectiveContact {
                objective: Objective::Door,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ObjectivePlaced {
                    objective: Objective::Key,
                    point,
                },
                Event::ObjectiveHidden {
                    objective: Objective::Key,
                },
                Event::KeyCollected,
            ]
        );
        assert!(query::objectives(&world).key.is_none());
    }

    #[test]
    fn status_clear_is_idempotent() {
        let mut world = World::new();
        let mut events = Vec::new();
        let message = StatusMessage {
            text: "Game Over".to_owned(),
            display_for: Duration::from_secs(3),
        };

        apply(
            &mut world,
            Command::ShowStatus {
                message: message.clone(),
            },
            &mut events,
        );
        apply(&mut world, Command::ClearStatus, &mut events);
        apply(&mut world, Command::ClearStatus, &mut events);

        assert_eq!(
            events,
            vec![Event::StatusShown { message }, Event::StatusCleared]
        );
        assert!(query::status(&world).is_none());
    }
}
