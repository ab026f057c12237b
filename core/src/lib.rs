#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Survival Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots such as [`SpawnRegistry`] and [`PlayerSnapshot`],
//! and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod spawn;

pub use glam::Vec3;
pub use spawn::{select_spawn_point, SpawnRegistry};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Survival Arena.";

/// Phases of the round-level state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Transient phase entered once when the process starts.
    Init,
    /// Preparation countdown before combat begins.
    PreGame,
    /// Active combat while enemies spawn and the round timer runs.
    Playing,
    /// Result display after the round was won or lost.
    GameOver,
}

/// Reason a round ended in defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefeatReason {
    /// The player's health dropped to zero or below.
    PlayerDied,
    /// The round timer ran out before the objective was reached.
    TimeExpired,
}

/// Reason a round ended in victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryReason {
    /// The player entered the door revealed by the key.
    ReachedDoor,
}

/// Final result of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The round was won.
    Victory(VictoryReason),
    /// The round was lost.
    Defeat(DefeatReason),
}

impl RoundOutcome {
    /// Reports whether the outcome is a victory.
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory(_))
    }

    /// Human readable reason used in diagnostics.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Victory(VictoryReason::ReachedDoor) => "Reached Door",
            Self::Defeat(DefeatReason::PlayerDied) => "Player Died",
            Self::Defeat(DefeatReason::TimeExpired) => "Time Expired",
        }
    }

    /// Status line surfaced to the player when the round ends.
    #[must_use]
    pub const fn status_text(self) -> &'static str {
        if self.is_victory() {
            "Next Level"
        } else {
            "Game Over"
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the spawn point sets used by enemies and objectives.
    ConfigureArena {
        /// Spawn point sets describing the arena.
        layout: ArenaLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Enables periodic enemy spawning. Repeated requests are ignored.
    StartSpawning,
    /// Disables periodic enemy spawning. Repeated requests are ignored.
    StopSpawning,
    /// Requests that an enemy be taken from the pool and placed at a point.
    SpawnEnemy {
        /// Location and orientation assigned to the spawned enemy.
        point: SpawnPoint,
    },
    /// Forces every live enemy back into the pool.
    ReleaseAllEnemies,
    /// Restores the player to full health at the spawn location.
    ResetPlayer,
    /// Host transform update for the player.
    SetPlayerPosition {
        /// New world position of the player.
        position: Vec3,
    },
    /// Host navigation update for an enemy.
    SetEnemyPosition {
        /// Enemy being moved.
        enemy: EnemyId,
        /// New world position of the enemy.
        position: Vec3,
    },
    /// Toggles the player's weapon between rifle and shotgun.
    SwitchWeapon,
    /// Requests that the player fire at the provided enemy.
    PlayerAttack {
        /// Enemy the player is aiming at.
        target: EnemyId,
    },
    /// Requests that an enemy perform its contact attack against the player.
    EnemyAttack {
        /// Enemy performing the attack.
        enemy: EnemyId,
    },
    /// Applies raw damage to an enemy, as dealt by an arbitrary source.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: u32,
        /// World position the damage originated from.
        source: Vec3,
        /// Impulse strength applied when the enemy survives.
        knockback_force: f32,
    },
    /// Places an objective at the provided spawn point and makes it visible.
    PlaceObjective {
        /// Objective being placed.
        objective: Objective,
        /// Location and orientation assigned to the objective.
        point: SpawnPoint,
    },
    /// Hides an objective.
    HideObjective {
        /// Objective being hidden.
        objective: Objective,
    },
    /// Host overlap notification: the player touched an objective.
    ReportObjectiveContact {
        /// Objective the player touched.
        objective: Objective,
    },
    /// Displays a transient status message.
    ShowStatus {
        /// Message to display.
        message: StatusMessage,
    },
    /// Clears the current status message.
    ClearStatus,
    /// Announces the integer countdown shown before a round starts.
    AnnounceCountdown {
        /// Whole seconds remaining before combat begins.
        seconds: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the arena layout was replaced.
    ArenaConfigured,
    /// Announces that periodic spawning was enabled.
    SpawningStarted,
    /// Announces that periodic spawning was disabled.
    SpawningStopped,
    /// Confirms that an enemy left the pool and entered the arena.
    EnemySpawned {
        /// Identifier of the spawned enemy.
        enemy: EnemyId,
        /// Location and orientation the enemy was placed at.
        point: SpawnPoint,
    },
    /// Reports that a spawn request could not be satisfied.
    SpawnFailed {
        /// Specific reason the spawn failed.
        reason: SpawnFailure,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit; may be negative.
        health: Health,
    },
    /// Reports that an enemy was pushed away and its AI suspended.
    EnemyKnockedBack {
        /// Enemy that was pushed.
        enemy: EnemyId,
        /// Horizontal velocity applied by the impulse.
        velocity: Vec3,
    },
    /// Reports that an enemy's knockback expired and control resumed.
    EnemyRecovered {
        /// Enemy that recovered.
        enemy: EnemyId,
    },
    /// Reports that an enemy was killed. Emitted exactly once per death.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Position at which the enemy died.
        position: Vec3,
    },
    /// Reports that a dead enemy began its cosmetic descent.
    EnemySinking {
        /// Enemy that started sinking.
        enemy: EnemyId,
    },
    /// Reports that an enemy was returned to the pool.
    EnemyReturned {
        /// Enemy that became idle.
        enemy: EnemyId,
    },
    /// Reports that an enemy performed its contact attack.
    EnemyAttacked {
        /// Enemy that attacked.
        enemy: EnemyId,
        /// Damage dealt to the player.
        damage: u32,
    },
    /// Reports that the player fired its weapon.
    PlayerFired {
        /// Weapon that was fired.
        weapon: Weapon,
        /// Enemy the shot was aimed at.
        target: EnemyId,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit; may be negative.
        health: Health,
    },
    /// Reports that the player died. Emitted exactly once per death.
    PlayerDied,
    /// Confirms that the player was restored to its starting state.
    PlayerReset {
        /// Position the player was moved to.
        position: Vec3,
    },
    /// Confirms that the player switched weapons.
    WeaponSwitched {
        /// Weapon that became active.
        weapon: Weapon,
    },
    /// Confirms that an objective was placed and is visible.
    ObjectivePlaced {
        /// Objective that was placed.
        objective: Objective,
        /// Location and orientation of the objective.
        point: SpawnPoint,
    },
    /// Confirms that an objective was hidden.
    ObjectiveHidden {
        /// Objective that was hidden.
        objective: Objective,
    },
    /// Reports that the player picked up the key.
    KeyCollected,
    /// Reports that the player entered the door.
    DoorReached,
    /// Signals presentation to start a pooled visual effect.
    EffectStarted {
        /// Identifier of the effect instance.
        effect: EffectId,
        /// Visual effect to play.
        kind: EffectKind,
        /// World position of the effect.
        position: Vec3,
    },
    /// Signals presentation that a pooled effect finished.
    EffectFinished {
        /// Identifier of the effect instance.
        effect: EffectId,
    },
    /// Signals presentation to display a status message.
    StatusShown {
        /// Message to display.
        message: StatusMessage,
    },
    /// Signals presentation to hide the status message.
    StatusCleared,
    /// Signals presentation that the pre-round countdown changed.
    CountdownChanged {
        /// Whole seconds remaining before combat begins.
        seconds: u32,
    },
}

/// Reasons a spawn request may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnFailure {
    /// The enemy pool had no idle entity and could not expand.
    PoolExhausted,
}

/// Unique identifier assigned to an enemy when its pool slot is created.
///
/// The identifier survives recycling: a reused enemy keeps its identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pooled visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u32);

impl EffectId {
    /// Creates a new effect identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Signed health value. Only the `<= 0` comparison carries meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw health value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the value is at or below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }

    /// Returns the health remaining after removing `amount`.
    ///
    /// The result is not floored at zero.
    #[must_use]
    pub fn damaged(self, amount: u32) -> Self {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        Self(self.0.saturating_sub(amount))
    }
}

/// Candidate world location, with orientation, for placing an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// World position of the point.
    pub position: Vec3,
    /// Rotation around the vertical axis, in radians.
    #[serde(default)]
    pub yaw: f32,
}

impl SpawnPoint {
    /// Creates a spawn point at the provided position facing the default direction.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self { position, yaw: 0.0 }
    }
}

/// Spawn point sets describing an arena.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    /// Points enemies may be spawned at.
    #[serde(default)]
    pub enemy_spawn_points: Vec<SpawnPoint>,
    /// Points the key may be placed at.
    #[serde(default)]
    pub key_spawn_points: Vec<SpawnPoint>,
    /// Points the door may be placed at.
    #[serde(default)]
    pub door_spawn_points: Vec<SpawnPoint>,
}

/// Round objectives placed in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Objective {
    /// Collectible that reveals the door.
    Key,
    /// Exit that wins the round once revealed.
    Door,
}

/// Read-only snapshot of objective placements. `None` means hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObjectiveView {
    /// Placement of the key while visible.
    pub key: Option<SpawnPoint>,
    /// Placement of the door while visible.
    pub door: Option<SpawnPoint>,
}

impl ObjectiveView {
    /// Returns the placement of the provided objective while visible.
    #[must_use]
    pub const fn placement(&self, objective: Objective) -> Option<SpawnPoint> {
        match objective {
            Objective::Key => self.key,
            Objective::Door => self.door,
        }
    }
}

/// Cone of a spread weapon around the aimed direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeSpread {
    /// Maximum distance at which pellets hit.
    pub radius: f32,
    /// Half of the total cone angle, in degrees.
    pub half_angle_degrees: f32,
}

/// Weapons available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Single-target weapon with long range and light knockback.
    Rifle,
    /// Cone weapon with short range and heavy knockback.
    Shotgun,
}

impl Weapon {
    /// Damage dealt to every enemy hit.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Rifle => 15,
            Self::Shotgun => 25,
        }
    }

    /// Maximum distance between the player and the aimed enemy.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Rifle => 25.0,
            Self::Shotgun => 15.0,
        }
    }

    /// Impulse strength applied to surviving enemies.
    #[must_use]
    pub const fn knockback_force(self) -> f32 {
        match self {
            Self::Rifle => 1.0,
            Self::Shotgun => 5.0,
        }
    }

    /// Minimum time between two shots.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::Rifle => Duration::from_millis(150),
            Self::Shotgun => Duration::from_millis(500),
        }
    }

    /// Cone hit by the weapon, if it damages more than the aimed enemy.
    #[must_use]
    pub const fn spread(self) -> Option<ConeSpread> {
        match self {
            Self::Rifle => None,
            Self::Shotgun => Some(ConeSpread {
                radius: 6.0,
                half_angle_degrees: 30.0,
            }),
        }
    }

    /// Weapon selected by the next switch.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Rifle => Self::Shotgun,
            Self::Shotgun => Self::Rifle,
        }
    }
}

/// Visual effects backed by the effect pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Spark shown where an enemy was hit.
    Hit,
    /// Burst shown where an enemy died.
    Death,
}

/// Transient status line shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Text to display.
    pub text: String,
    /// How long the message remains visible before fading.
    pub display_for: Duration,
}

/// Lifecycle of a live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Alive and under normal AI control.
    Free,
    /// Alive, pushed by an impulse, AI suspended.
    KnockedBack,
    /// Killed; waiting to start sinking.
    Dead,
    /// Killed and descending until returned to the pool.
    Sinking,
}

impl EnemyState {
    /// Reports whether the enemy is alive.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Free | Self::KnockedBack)
    }
}

/// Immutable representation of a single live enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// World position of the enemy.
    pub position: Vec3,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f32,
    /// Current health; may be negative after a lethal hit.
    pub health: Health,
    /// Lifecycle state of the enemy.
    pub state: EnemyState,
    /// Indicates whether the attack cooldown elapsed.
    pub attack_ready: bool,
}

impl EnemySnapshot {
    /// Reports whether the enemy can be targeted by the player.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        self.state.is_alive()
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World position of the player.
    pub position: Vec3,
    /// Current health; may be negative after a lethal hit.
    pub health: Health,
    /// Health the player starts each round with.
    pub starting_health: Health,
    /// Weapon currently equipped.
    pub weapon: Weapon,
    /// Indicates whether the weapon cooldown elapsed.
    pub attack_ready: bool,
}

impl PlayerSnapshot {
    /// Reports whether the player is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }
}

/// Level index and kill count reported at the end of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Zero-based level index; advances on victory, resets on defeat.
    pub level: u32,
    /// Enemies killed during the current round.
    pub kills: u32,
}
