//! TOML configuration file for the headless runner.
//!
//! Every duration is written in seconds. Omitted tables and keys keep the
//! library defaults.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use survival_arena_core::{ArenaLayout, Health, SpawnPoint, Vec3};
use survival_arena_simulation::Config;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    version: Option<u32>,
    #[serde(default)]
    round: RoundSection,
    #[serde(default)]
    spawning: SpawningSection,
    #[serde(default)]
    enemy: EnemySection,
    #[serde(default)]
    player: PlayerSection,
    arena: Option<ArenaLayout>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoundSection {
    pre_game: Option<f32>,
    duration: Option<f32>,
    result: Option<f32>,
    objective_min_distance: Option<f32>,
    key_reposition_interval: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawningSection {
    interval: Option<f32>,
    min_distance: Option<f32>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnemySection {
    health: Option<i32>,
    attack_damage: Option<u32>,
    attack_cooldown: Option<f32>,
    attack_range: Option<f32>,
    knockback_duration: Option<f32>,
    knockback_resistance: Option<f32>,
    sink_delay: Option<f32>,
    return_delay: Option<f32>,
    speed: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayerSection {
    health: Option<i32>,
    speed: Option<f32>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse configuration toml contents")?;
        if let Some(version) = config.version {
            if version != SUPPORTED_CONFIG_VERSION {
                bail!(
                    "unsupported configuration version {version}; expected {SUPPORTED_CONFIG_VERSION}"
                );
            }
        }
        Ok(config)
    }

    /// Overlays the file values onto the library defaults.
    pub(crate) fn into_simulation_config(self) -> Result<Config> {
        let mut config = Config::default();

        let round = &mut config.round;
        apply_seconds(&mut round.pre_game, self.round.pre_game, "round.pre_game")?;
        apply_seconds(&mut round.round, self.round.duration, "round.duration")?;
        apply_seconds(&mut round.result, self.round.result, "round.result")?;
        apply_seconds(
            &mut round.key_reposition_interval,
            self.round.key_reposition_interval,
            "round.key_reposition_interval",
        )?;
        if let Some(distance) = self.round.objective_min_distance {
            round.objective_min_distance = distance;
        }

        let spawn = &mut config.spawning;
        apply_seconds(
            &mut spawn.spawn_interval,
            self.spawning.interval,
            "spawning.interval",
        )?;
        if let Some(distance) = self.spawning.min_distance {
            spawn.min_distance = distance;
        }
        if let Some(seed) = self.spawning.seed {
            spawn.rng_seed = seed;
        }

        let enemy = &mut config.world.enemy;
        if let Some(health) = self.enemy.health {
            enemy.starting_health = Health::new(health);
        }
        if let Some(damage) = self.enemy.attack_damage {
            enemy.attack_damage = damage;
        }
        apply_seconds(
            &mut enemy.attack_cooldown,
            self.enemy.attack_cooldown,
            "enemy.attack_cooldown",
        )?;
        if let Some(range) = self.enemy.attack_range {
            enemy.attack_range = range;
        }
        apply_seconds(
            &mut enemy.knockback_duration,
            self.enemy.knockback_duration,
            "enemy.knockback_duration",
        )?;
        if let Some(resistance) = self.enemy.knockback_resistance {
            enemy.knockback_resistance = resistance;
        }
        apply_seconds(&mut enemy.sink_delay, self.enemy.sink_delay, "enemy.sink_delay")?;
        apply_seconds(
            &mut enemy.return_delay,
            self.enemy.return_delay,
            "enemy.return_delay",
        )?;
        if let Some(speed) = self.enemy.speed {
            config.enemy_speed = speed;
        }

        if let Some(health) = self.player.health {
            config.world.player.starting_health = Health::new(health);
        }
        if let Some(speed) = self.player.speed {
            config.player_speed = speed;
        }

        config.layout = self.arena.unwrap_or_else(demo_arena);
        Ok(config)
    }
}

fn apply_seconds(target: &mut Duration, seconds: Option<f32>, key: &str) -> Result<()> {
    let Some(seconds) = seconds else {
        return Ok(());
    };
    *target = Duration::try_from_secs_f32(seconds)
        .with_context(|| format!("`{key}` must be a non-negative number of seconds"))?;
    Ok(())
}

/// Arena used when the configuration does not describe one: enemy points on
/// an outer ring, key and door points on an inner ring.
fn demo_arena() -> ArenaLayout {
    ArenaLayout {
        enemy_spawn_points: ring(8, 45.0),
        key_spawn_points: ring(6, 35.0),
        door_spawn_points: ring(4, 40.0),
    }
}

fn ring(count: u16, radius: f32) -> Vec<SpawnPoint> {
    (0..count)
        .map(|index| {
            let angle = f32::from(index) / f32::from(count) * std::f32::consts::TAU;
            SpawnPoint {
                position: Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius),
                yaw: angle + std::f32::consts::PI,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults_and_demo_arena() {
        let config = FileConfig::parse("")
            .and_then(FileConfig::into_simulation_config)
            .expect("empty configuration is valid");

        assert_eq!(config.round.pre_game, Duration::from_secs(10));
        assert_eq!(config.round.round, Duration::from_secs(150));
        assert_eq!(config.layout.enemy_spawn_points.len(), 8);
    }

    #[test]
    fn sections_override_defaults() {
        let contents = r#"
            version = 1

            [round]
            pre_game = 2.5
            duration = 30

            [enemy]
            health = 40
            sink_delay = 0.5

            [player]
            speed = 8.0

            [arena]
            enemy_spawn_points = [{ position = [40.0, 0.0, 0.0] }]
            key_spawn_points = [{ position = [0.0, 0.0, 35.0], yaw = 1.5 }]
        "#;
        let config = FileConfig::parse(contents)
            .and_then(FileConfig::into_simulation_config)
            .expect("valid configuration");

        assert_eq!(config.round.pre_game, Duration::from_millis(2_500));
        assert_eq!(config.round.round, Duration::from_secs(30));
        assert_eq!(config.world.enemy.starting_health, Health::new(40));
        assert_eq!(config.world.enemy.sink_delay, Duration::from_millis(500));
        assert!((config.player_speed - 8.0).abs() < f32::EPSILON);
        assert_eq!(config.layout.enemy_spawn_points.len(), 1);
        assert!(config.layout.door_spawn_points.is_empty());
    }

    #[test]
    fn unknown_keys_and_versions_are_rejected() {
        assert!(FileConfig::parse("[round]\nlength = 3").is_err());
        assert!(FileConfig::parse("version = 7").is_err());
    }

    #[test]
    fn negative_durations_are_rejected() {
        let error = FileConfig::parse("[round]\nresult = -1.0")
            .and_then(FileConfig::into_simulation_config)
            .expect_err("negative duration");
        assert!(error.to_string().contains("round.result"));
    }
}
