use std::time::Duration;

use survival_arena_core::{
    ArenaLayout, Command, Event, Health, PlayerSnapshot, SpawnPoint, Vec3, Weapon,
};
use survival_arena_system_spawning::{Config, Spawning};
use survival_arena_world::{self as world, query, World};

fn alive_player_at(position: Vec3) -> PlayerSnapshot {
    PlayerSnapshot {
        position,
        health: Health::new(100),
        starting_health: Health::new(100),
        weapon: Weapon::Rifle,
        attack_ready: true,
    }
}

fn quarter_tick() -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(250),
    }
}

fn far_point() -> SpawnPoint {
    SpawnPoint::at(Vec3::new(0.0, 0.0, 45.0))
}

#[test]
fn one_second_interval_spawns_once_over_four_quarter_ticks() {
    let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 30.0, 0x1234_5678));
    let points = [far_point()];
    let player = alive_player_at(Vec3::ZERO);
    let mut commands = Vec::new();

    spawning.handle(&[Event::SpawningStarted], &player, &points, &mut commands);
    for _ in 0..4 {
        spawning.handle(&[quarter_tick()], &player, &points, &mut commands);
    }

    assert_eq!(
        commands,
        vec![Command::SpawnEnemy {
            point: far_point(),
        }]
    );
}

#[test]
fn point_beyond_minimum_distance_is_always_chosen() {
    let near = SpawnPoint::at(Vec3::new(5.0, 0.0, 0.0));
    let points = [near, far_point()];
    let player = alive_player_at(Vec3::ZERO);
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(100), 30.0, 0xdead_beef));
    let mut commands = Vec::new();

    spawning.handle(&[Event::SpawningStarted], &player, &points, &mut commands);
    for _ in 0..50 {
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(100),
            }],
            &player,
            &points,
            &mut commands,
        );
    }

    assert_eq!(commands.len(), 50);
    assert!(commands.iter().all(|command| *command
        == Command::SpawnEnemy {
            point: far_point(),
        }));
}

#[test]
fn stopping_halts_and_restart_resets_timer() {
    let points = [far_point()];
    let player = alive_player_at(Vec3::ZERO);
    let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 30.0, 7));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::SpawningStarted, quarter_tick(), quarter_tick(), quarter_tick()],
        &player,
        &points,
        &mut commands,
    );
    spawning.handle(
        &[Event::SpawningStopped, quarter_tick(), quarter_tick()],
        &player,
        &points,
        &mut commands,
    );
    assert!(commands.is_empty(), "stopped spawner must stay silent");

    spawning.handle(
        &[Event::SpawningStarted, quarter_tick()],
        &player,
        &points,
        &mut commands,
    );
    assert!(commands.is_empty(), "restart begins a fresh interval");
}

#[test]
fn dead_player_blocks_spawning() {
    let points = [far_point()];
    let mut player = alive_player_at(Vec3::ZERO);
    player.health = Health::new(0);
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(250), 30.0, 11));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::SpawningStarted, quarter_tick(), quarter_tick()],
        &player,
        &points,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn spawn_commands_populate_the_world_registry() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            layout: ArenaLayout {
                enemy_spawn_points: vec![
                    SpawnPoint::at(Vec3::new(40.0, 0.0, 0.0)),
                    SpawnPoint::at(Vec3::new(-40.0, 0.0, 0.0)),
                ],
                ..ArenaLayout::default()
            },
        },
        &mut events,
    );
    world::apply(&mut world, Command::StartSpawning, &mut events);

    let mut spawning = Spawning::new(Config::new(Duration::from_millis(500), 30.0, 0x4d59));
    for _ in 0..6 {
        events.clear();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        let mut commands = Vec::new();
        spawning.handle(
            &events,
            &query::player(&world),
            query::enemy_spawn_points(&world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let registry = query::spawn_registry(&world);
    assert_eq!(registry.len(), 3);
    assert!(registry
        .iter()
        .all(|enemy| enemy.position.x.abs() == 40.0));
}

#[test]
fn identical_seeds_replay_identical_spawns() {
    let points: Vec<SpawnPoint> = (0..8)
        .map(|index| {
            let angle = index as f32 * std::f32::consts::FRAC_PI_4;
            SpawnPoint::at(Vec3::new(angle.cos() * 50.0, 0.0, angle.sin() * 50.0))
        })
        .collect();

    let run = |seed: u64| {
        let mut spawning = Spawning::new(Config::new(Duration::from_millis(200), 30.0, seed));
        let player = alive_player_at(Vec3::ZERO);
        let mut commands = Vec::new();
        spawning.handle(&[Event::SpawningStarted], &player, &points, &mut commands);
        for _ in 0..40 {
            spawning.handle(
                &[Event::TimeAdvanced {
                    dt: Duration::from_millis(100),
                }],
                &player,
                &points,
                &mut commands,
            );
        }
        commands
    };

    let first = run(0x00c0_ffee);
    assert_eq!(first.len(), 20);
    assert_eq!(first, run(0x00c0_ffee));
}
