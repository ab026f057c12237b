#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round state machine coordinating phases, timers and win/lose conditions.
//!
//! The round starts in [`Phase::Init`], enters [`Phase::PreGame`] once when
//! [`Round::start`] is called and then loops through
//! `PreGame -> Playing -> GameOver -> PreGame` forever. Every phase change
//! arms a re-entry guard that swallows the next `TimeAdvanced` event, so a
//! freshly entered phase never runs its update in the frame that entered it.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use survival_arena_core::{
    select_spawn_point, ArenaLayout, Command, DefeatReason, Event, LevelProgress, Objective,
    ObjectiveView, Phase, PlayerSnapshot, RoundOutcome, SpawnPoint, StatusMessage, Vec3,
    VictoryReason,
};
use tracing::{debug, info, warn};

/// Timing and placement parameters of a round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Preparation time before combat begins.
    pub pre_game: Duration,
    /// Time limit of the combat phase.
    pub round: Duration,
    /// Time the result is displayed before the next round.
    pub result: Duration,
    /// Minimum distance between the player and a freshly placed key or door.
    pub objective_min_distance: f32,
    /// Time after which an uncollected key moves to another point.
    pub key_reposition_interval: Duration,
    /// Final stretch of the preparation phase during which the countdown is announced.
    pub countdown_window: Duration,
    /// Time the result message stays on screen.
    pub status_display: Duration,
    /// Location the player is reset to; the key is placed away from it.
    pub player_spawn: Vec3,
    /// Seed of the generator used to pick objective points.
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pre_game: Duration::from_secs(10),
            round: Duration::from_secs(150),
            result: Duration::from_secs(10),
            objective_min_distance: 30.0,
            key_reposition_interval: Duration::from_secs(30),
            countdown_window: Duration::from_secs(3),
            status_display: Duration::from_secs(3),
            player_spawn: Vec3::ZERO,
            rng_seed: 0x0b1e_c71e_5eed_0001,
        }
    }
}

/// Read-only inputs the round inspects while handling events.
#[derive(Clone, Copy, Debug)]
pub struct RoundView<'a> {
    /// Current player state.
    pub player: &'a PlayerSnapshot,
    /// Spawn point sets of the arena.
    pub layout: &'a ArenaLayout,
    /// Current objective placements.
    pub objectives: ObjectiveView,
}

/// Round-level finite state machine.
#[derive(Debug)]
pub struct Round {
    config: Config,
    phase: Phase,
    remaining: Duration,
    skip_next_tick: bool,
    last_countdown: Option<u32>,
    kills: u32,
    level: u32,
    has_key: bool,
    key_timer: Duration,
    outcome: Option<RoundOutcome>,
    rng: ChaCha8Rng,
}

impl Round {
    /// Creates a round in the [`Phase::Init`] phase.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Init,
            remaining: Duration::ZERO,
            skip_next_tick: false,
            last_countdown: None,
            kills: 0,
            level: 0,
            has_key: false,
            key_timer: Duration::ZERO,
            outcome: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Leaves [`Phase::Init`] for the first preparation phase.
    ///
    /// Calling this more than once has no effect.
    pub fn start(&mut self, view: &RoundView<'_>, out: &mut Vec<Command>) {
        if self.phase != Phase::Init {
            debug!(phase = ?self.phase, "ignoring start of a running round");
            return;
        }
        self.transition(Phase::PreGame, view, out);
    }

    /// Consumes world events in order and emits the commands of any phase
    /// change they cause.
    pub fn handle(&mut self, events: &[Event], view: &RoundView<'_>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::EnemyDied { .. } => self.kills = self.kills.saturating_add(1),
                Event::KeyCollected => self.collect_key(view, out),
                Event::DoorReached => {
                    if self.phase == Phase::Playing {
                        self.finish(RoundOutcome::Victory(VictoryReason::ReachedDoor), view, out);
                    }
                }
                Event::TimeAdvanced { dt } => self.tick(*dt, view, out),
                _ => {}
            }
        }
    }

    /// Phase the round is currently in.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time left in the current phase, never below zero.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        self.remaining
    }

    /// Enemies killed since the current round was prepared.
    #[must_use]
    pub fn kill_count(&self) -> u32 {
        self.kills
    }

    /// Zero-based level index.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Result of the most recent round while its result is displayed.
    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Level index and kill count as a persistable record.
    #[must_use]
    pub fn progress(&self) -> LevelProgress {
        LevelProgress {
            level: self.level,
            kills: self.kills,
        }
    }

    fn tick(&mut self, dt: Duration, view: &RoundView<'_>, out: &mut Vec<Command>) {
        if self.skip_next_tick {
            self.skip_next_tick = false;
            return;
        }

        self.remaining = self.remaining.saturating_sub(dt);

        match self.phase {
            Phase::Init => {}
            Phase::PreGame => {
                self.announce_countdown(out);
                if self.remaining.is_zero() {
                    self.transition(Phase::Playing, view, out);
                }
            }
            Phase::Playing => {
                if !view.player.is_alive() {
                    self.finish(RoundOutcome::Defeat(DefeatReason::PlayerDied), view, out);
                } else if self.remaining.is_zero() {
                    self.finish(RoundOutcome::Defeat(DefeatReason::TimeExpired), view, out);
                } else {
                    self.update_key(dt, view, out);
                }
            }
            Phase::GameOver => {
                if self.remaining.is_zero() {
                    self.transition(Phase::PreGame, view, out);
                }
            }
        }
    }

    fn announce_countdown(&mut self, out: &mut Vec<Command>) {
        if self.remaining > self.config.countdown_window {
            return;
        }
        let seconds = whole_seconds_ceil(self.remaining);
        if seconds == 0 || self.last_countdown == Some(seconds) {
            return;
        }
        self.last_countdown = Some(seconds);
        info!(seconds, "starting in");
        out.push(Command::AnnounceCountdown { seconds });
    }

    fn update_key(&mut self, dt: Duration, view: &RoundView<'_>, out: &mut Vec<Command>) {
        if self.has_key || view.objectives.key.is_none() {
            return;
        }
        self.key_timer = self.key_timer.saturating_sub(dt);
        if !self.key_timer.is_zero() {
            return;
        }
        self.key_timer = self.config.key_reposition_interval;
        debug!("repositioning uncollected key");
        self.place_objective(Objective::Key, view.player.position, view, out);
    }

    fn collect_key(&mut self, view: &RoundView<'_>, out: &mut Vec<Command>) {
        if self.has_key || !matches!(self.phase, Phase::PreGame | Phase::Playing) {
            return;
        }
        self.has_key = true;
        info!("key collected; revealing door");
        self.place_objective(Objective::Door, view.player.position, view, out);
    }

    fn finish(&mut self, outcome: RoundOutcome, view: &RoundView<'_>, out: &mut Vec<Command>) {
        self.outcome = Some(outcome);
        info!(
            reason = outcome.reason(),
            kills = self.kills,
            level = self.level,
            "round finished"
        );
        self.transition(Phase::GameOver, view, out);
    }

    fn transition(&mut self, next: Phase, view: &RoundView<'_>, out: &mut Vec<Command>) {
        let previous = self.phase;
        if previous == Phase::GameOver {
            out.push(Command::ClearStatus);
        }

        info!(?previous, ?next, "changing phase");
        self.phase = next;
        self.skip_next_tick = true;

        match next {
            Phase::Init => {}
            Phase::PreGame => {
                self.remaining = self.config.pre_game;
                self.kills = 0;
                self.has_key = false;
                self.outcome = None;
                self.last_countdown = None;
                out.push(Command::ResetPlayer);
                self.place_objective(Objective::Key, self.config.player_spawn, view, out);
                out.push(Command::HideObjective {
                    objective: Objective::Door,
                });
            }
            Phase::Playing => {
                self.remaining = self.config.round;
                self.key_timer = self.config.key_reposition_interval;
                out.push(Command::StartSpawning);
            }
            Phase::GameOver => {
                self.remaining = self.config.result;
                out.push(Command::StopSpawning);
                out.push(Command::ReleaseAllEnemies);

                let victory = self.outcome.map_or(false, RoundOutcome::is_victory);
                self.level = if victory {
                    self.level.saturating_add(1)
                } else {
                    0
                };
                if let Some(outcome) = self.outcome {
                    out.push(Command::ShowStatus {
                        message: StatusMessage {
                            text: outcome.status_text().to_owned(),
                            display_for: self.config.status_display,
                        },
                    });
                }
            }
        }
    }

    fn place_objective(
        &mut self,
        objective: Objective,
        center: Vec3,
        view: &RoundView<'_>,
        out: &mut Vec<Command>,
    ) {
        let points: &[SpawnPoint] = match objective {
            Objective::Key => &view.layout.key_spawn_points,
            Objective::Door => &view.layout.door_spawn_points,
        };
        match select_spawn_point(
            points,
            center,
            self.config.objective_min_distance,
            &mut self.rng,
        ) {
            Some(point) => out.push(Command::PlaceObjective { objective, point }),
            None => warn!(?objective, "no spawn points configured; objective not placed"),
        }
    }
}

fn whole_seconds_ceil(duration: Duration) -> u32 {
    let whole = duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_nanos() > 0));
    u32::try_from(whole).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_rounds_partial_seconds_up() {
        assert_eq!(whole_seconds_ceil(Duration::from_millis(2_001)), 3);
        assert_eq!(whole_seconds_ceil(Duration::from_secs(2)), 2);
        assert_eq!(whole_seconds_ceil(Duration::from_millis(1)), 1);
        assert_eq!(whole_seconds_ceil(Duration::ZERO), 0);
    }

    #[test]
    fn new_round_waits_in_init() {
        let round = Round::new(Config::default());
        assert_eq!(round.phase(), Phase::Init);
        assert_eq!(round.progress(), LevelProgress::default());
        assert!(round.outcome().is_none());
    }
}
