use std::time::Duration;

use survival_arena_core::{Command, EnemyId, Event, Health, SpawnPoint, Vec3};
use survival_arena_system_combat::{Combat, Config};
use survival_arena_world::{self as world, query, World};

fn spawn(world: &mut World, position: Vec3) -> EnemyId {
    let mut events = Vec::new();
    world::apply(world, Command::StartSpawning, &mut events);
    world::apply(
        world,
        Command::SpawnEnemy {
            point: SpawnPoint::at(position),
        },
        &mut events,
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("enemy spawned")
}

fn step(world: &mut World, combat: &mut Combat, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );
    let mut commands = Vec::new();
    combat.handle(
        &events,
        &query::player(world),
        &query::spawn_registry(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn player_kills_approaching_enemy_with_rifle() {
    let mut world = World::new();
    let mut combat = Combat::new(Config::default());
    let enemy = spawn(&mut world, Vec3::new(5.0, 0.0, 0.0));

    let mut deaths = 0;
    for _ in 0..40 {
        let events = step(&mut world, &mut combat, 150);
        deaths += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDied { enemy: died, .. } if *died == enemy))
            .count();
    }

    assert_eq!(deaths, 1, "death must be reported exactly once");
    assert!(query::enemy(&world, enemy).is_none(), "corpse returned to pool");
}

#[test]
fn enemy_in_contact_damages_player_on_cooldown() {
    let mut world = World::new();
    let mut combat = Combat::new(Config {
        target_range: 0.0,
        ..Config::default()
    });
    let _ = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0));

    let mut player_hits = Vec::new();
    for _ in 0..4 {
        let events = step(&mut world, &mut combat, 250);
        player_hits.extend(events.into_iter().filter_map(|event| match event {
            Event::PlayerDamaged { health, .. } => Some(health),
            _ => None,
        }));
    }

    assert_eq!(player_hits, vec![Health::new(90), Health::new(80)]);
}

#[test]
fn distant_enemy_is_neither_targeted_nor_attacking() {
    let mut world = World::new();
    let mut combat = Combat::new(Config::default());
    let _ = spawn(&mut world, Vec3::new(20.0, 0.0, 0.0));

    for _ in 0..10 {
        let events = step(&mut world, &mut combat, 500);
        assert!(events.iter().all(|event| !matches!(
            event,
            Event::PlayerFired { .. } | Event::EnemyAttacked { .. }
        )));
    }
}
