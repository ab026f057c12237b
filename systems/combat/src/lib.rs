#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits attack commands from player and enemy snapshots.

use survival_arena_core::{Command, Event, PlayerSnapshot, SpawnRegistry};
use tracing::trace;

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Radius within which the player automatically acquires a target.
    pub target_range: f32,
    /// Distance at which an enemy touches the player.
    pub contact_range: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_range: 10.0,
            contact_range: 1.5,
        }
    }
}

/// Combat system that queues attacks for ready attackers.
#[derive(Debug, Default)]
pub struct Combat {
    config: Config,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Emits `Command::PlayerAttack` and `Command::EnemyAttack` entries for
    /// attackers whose cooldown elapsed and whose target is in range.
    ///
    /// Attacks are only considered for batches that advanced time.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        registry: &SpawnRegistry,
        out: &mut Vec<Command>,
    ) {
        let advanced = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !advanced || !player.is_alive() || registry.is_empty() {
            return;
        }

        self.scratch.clear();

        if player.attack_ready {
            let range = self.config.target_range.min(player.weapon.range());
            if let Some(target) = registry.find_nearest_target(player.position, range) {
                trace!(target = target.id.get(), "player acquired target");
                self.scratch.push(Command::PlayerAttack { target: target.id });
            }
        }

        for enemy in registry.iter() {
            if !enemy.attack_ready {
                continue;
            }
            if enemy.position.distance(player.position) <= self.config.contact_range {
                self.scratch.push(Command::EnemyAttack { enemy: enemy.id });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
