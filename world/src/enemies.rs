//! Enemy combat state: damage, knockback, death and the sink-then-return delay.

use std::time::Duration;

use survival_arena_core::{EnemyId, EnemySnapshot, EnemyState, Health, SpawnPoint, Vec3};
use survival_arena_pool::Poolable;

/// Tuning applied to every enemy instantiated from the pool prefab.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyConfig {
    /// Health each enemy starts with after a reset.
    pub starting_health: Health,
    /// Damage dealt to the player by one contact attack.
    pub attack_damage: u32,
    /// Minimum time between two contact attacks.
    pub attack_cooldown: Duration,
    /// Farthest distance from which a contact attack lands.
    pub attack_range: f32,
    /// Time an enemy stays knocked back after a surviving hit.
    pub knockback_duration: Duration,
    /// Divisor applied to incoming knockback force. Non-positive values pin
    /// the enemy in place.
    pub knockback_resistance: f32,
    /// Time between death and the start of the sinking descent.
    pub sink_delay: Duration,
    /// Time spent sinking before the enemy returns to the pool.
    pub return_delay: Duration,
    /// Downward speed while sinking, in world units per second.
    pub sink_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            starting_health: Health::new(100),
            attack_damage: 10,
            attack_cooldown: Duration::from_millis(500),
            attack_range: 1.5,
            knockback_duration: Duration::from_millis(400),
            knockback_resistance: 1.0,
            sink_delay: Duration::ZERO,
            return_delay: Duration::from_secs(2),
            sink_speed: 2.5,
        }
    }
}

/// Result of [`Enemy::apply_damage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DamageOutcome {
    /// The enemy was already dead; nothing changed.
    Ignored,
    /// The enemy survived; `knockback` holds the impulse when one started.
    Survived {
        health: Health,
        knockback: Option<Vec3>,
    },
    /// The hit was lethal.
    Killed { health: Health, position: Vec3 },
}

/// Timer expiries reported by [`Enemy::advance`]. Each fires exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expiry {
    Recovered,
    StartedSinking,
    ReadyForReturn,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Free,
    KnockedBack { remaining: Duration },
    Dead { elapsed: Duration },
    Sinking { remaining: Duration },
}

/// Pooled enemy entity.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    config: EnemyConfig,
    position: Vec3,
    yaw: f32,
    health: Health,
    velocity: Vec3,
    motion: Motion,
    attack_elapsed: Duration,
}

impl Enemy {
    pub(crate) fn prefab(config: EnemyConfig) -> Self {
        Self {
            config,
            position: Vec3::ZERO,
            yaw: 0.0,
            health: config.starting_health,
            velocity: Vec3::ZERO,
            motion: Motion::Free,
            attack_elapsed: Duration::ZERO,
        }
    }

    /// Restores a fresh, alive enemy at the provided point.
    pub(crate) fn reset(&mut self, point: SpawnPoint) {
        *self = Self::prefab(self.config);
        self.position = point.position;
        self.yaw = point.yaw;
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.position
    }

    pub(crate) fn is_alive(&self) -> bool {
        matches!(self.motion, Motion::Free | Motion::KnockedBack { .. })
    }

    /// Moves the enemy on behalf of navigation. Ignored unless under AI control.
    pub(crate) fn steer_to(&mut self, position: Vec3) -> bool {
        if self.motion != Motion::Free {
            return false;
        }
        self.position = position;
        true
    }

    pub(crate) fn apply_damage(&mut self, amount: u32, source: Vec3, force: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.damaged(amount);

        if self.health.is_depleted() {
            self.velocity = Vec3::ZERO;
            self.motion = Motion::Dead {
                elapsed: Duration::ZERO,
            };
            return DamageOutcome::Killed {
                health: self.health,
                position: self.position,
            };
        }

        DamageOutcome::Survived {
            health: self.health,
            knockback: self.start_knockback(source, force),
        }
    }

    fn start_knockback(&mut self, source: Vec3, force: f32) -> Option<Vec3> {
        if matches!(self.motion, Motion::KnockedBack { .. }) {
            return None;
        }

        let mut away = self.position - source;
        away.y = 0.0;
        let direction = away.normalize_or_zero();
        let resistance = self.config.knockback_resistance;
        self.velocity = if resistance > 0.0 {
            direction * (force / resistance)
        } else {
            Vec3::ZERO
        };
        self.motion = Motion::KnockedBack {
            remaining: self.config.knockback_duration,
        };
        Some(self.velocity)
    }

    /// Advances knockback, attack and death timers by `dt`.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<Expiry> {
        let seconds = dt.as_secs_f32();

        match self.motion {
            Motion::Free => {
                self.attack_elapsed = self.attack_elapsed.saturating_add(dt);
                None
            }
            Motion::KnockedBack { remaining } => {
                self.position += self.velocity * seconds;
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.velocity = Vec3::ZERO;
                    self.motion = Motion::Free;
                    Some(Expiry::Recovered)
                } else {
                    self.motion = Motion::KnockedBack { remaining };
                    None
                }
            }
            Motion::Dead { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= self.config.sink_delay {
                    self.motion = Motion::Sinking {
                        remaining: self.config.return_delay,
                    };
                    Some(Expiry::StartedSinking)
                } else {
                    self.motion = Motion::Dead { elapsed };
                    None
                }
            }
            Motion::Sinking { remaining } => {
                self.position.y -= self.config.sink_speed * seconds;
                let remaining = remaining.saturating_sub(dt);
                self.motion = Motion::Sinking { remaining };
                remaining.is_zero().then_some(Expiry::ReadyForReturn)
            }
        }
    }

    pub(crate) fn reaches(&self, target: Vec3) -> bool {
        self.position.distance(target) <= self.config.attack_range
    }

    /// Consumes the attack cooldown, returning the damage dealt when ready.
    pub(crate) fn try_attack(&mut self) -> Option<u32> {
        if self.motion != Motion::Free || !self.attack_ready() {
            return None;
        }
        self.attack_elapsed = Duration::ZERO;
        Some(self.config.attack_damage)
    }

    fn attack_ready(&self) -> bool {
        self.attack_elapsed >= self.config.attack_cooldown
    }

    fn state(&self) -> EnemyState {
        match self.motion {
            Motion::Free => EnemyState::Free,
            Motion::KnockedBack { .. } => EnemyState::KnockedBack,
            Motion::Dead { .. } => EnemyState::Dead,
            Motion::Sinking { .. } => EnemyState::Sinking,
        }
    }

    pub(crate) fn snapshot(&self, id: EnemyId) -> EnemySnapshot {
        EnemySnapshot {
            id,
            position: self.position,
            yaw: self.yaw,
            health: self.health,
            state: self.state(),
            attack_ready: self.motion == Motion::Free && self.attack_ready(),
        }
    }
}

impl Poolable for Enemy {
    fn on_release(&mut self) {
        self.velocity = Vec3::ZERO;
        self.attack_elapsed = Duration::ZERO;
    }
}
