//! Player avatar state: health, weapon selection and shot cadence.

use std::time::Duration;

use survival_arena_core::{Health, PlayerSnapshot, Vec3, Weapon};

/// Tuning for the player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Health restored on every reset.
    pub starting_health: Health,
    /// Location the player is moved to on reset.
    pub spawn_position: Vec3,
    /// Weapon equipped when the world is created.
    pub starting_weapon: Weapon,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_health: Health::new(100),
            spawn_position: Vec3::ZERO,
            starting_weapon: Weapon::Rifle,
        }
    }
}

/// Outcome of [`Player::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerHit {
    Ignored,
    Wounded(Health),
    Killed(Health),
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    config: PlayerConfig,
    position: Vec3,
    health: Health,
    weapon: Weapon,
    since_last_shot: Duration,
}

impl Player {
    pub(crate) fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            position: config.spawn_position,
            health: config.starting_health,
            weapon: config.starting_weapon,
            since_last_shot: Duration::MAX,
        }
    }

    /// Restores health and position. The equipped weapon is kept.
    pub(crate) fn reset(&mut self) -> Vec3 {
        self.position = self.config.spawn_position;
        self.health = self.config.starting_health;
        self.since_last_shot = Duration::MAX;
        self.position
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.position
    }

    pub(crate) fn weapon(&self) -> Weapon {
        self.weapon
    }

    pub(crate) fn move_to(&mut self, position: Vec3) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.position = position;
        true
    }

    pub(crate) fn switch_weapon(&mut self) -> Option<Weapon> {
        if !self.is_alive() {
            return None;
        }
        self.weapon = self.weapon.toggled();
        Some(self.weapon)
    }

    pub(crate) fn take_damage(&mut self, amount: u32) -> PlayerHit {
        if !self.is_alive() {
            return PlayerHit::Ignored;
        }
        self.health = self.health.damaged(amount);
        if self.health.is_depleted() {
            PlayerHit::Killed(self.health)
        } else {
            PlayerHit::Wounded(self.health)
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.since_last_shot = self.since_last_shot.saturating_add(dt);
    }

    pub(crate) fn attack_ready(&self) -> bool {
        self.is_alive() && self.since_last_shot >= self.weapon.cooldown()
    }

    pub(crate) fn consume_shot(&mut self) {
        self.since_last_shot = Duration::ZERO;
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            health: self.health,
            starting_health: self.config.starting_health,
            weapon: self.weapon,
            attack_ready: self.attack_ready(),
        }
    }
}
