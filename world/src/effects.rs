//! Pooled visual effects that expire after a fixed duration.

use std::time::Duration;

use survival_arena_core::{EffectKind, Vec3};
use survival_arena_pool::Poolable;

pub(crate) const HIT_EFFECT_DURATION: Duration = Duration::from_millis(500);
pub(crate) const DEATH_EFFECT_DURATION: Duration = Duration::from_secs(2);

/// Pooled visual effect. Carries only what presentation needs to replay it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Effect {
    kind: Option<EffectKind>,
    position: Vec3,
    remaining: Duration,
}

impl Effect {
    pub(crate) fn start(&mut self, kind: EffectKind, position: Vec3) {
        self.kind = Some(kind);
        self.position = position;
        self.remaining = match kind {
            EffectKind::Hit => HIT_EFFECT_DURATION,
            EffectKind::Death => DEATH_EFFECT_DURATION,
        };
    }

    /// Counts down the playback time and reports whether it finished.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    pub(crate) fn kind(&self) -> Option<EffectKind> {
        self.kind
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.position
    }
}

impl Poolable for Effect {
    fn on_release(&mut self) {
        self.kind = None;
        self.remaining = Duration::ZERO;
    }
}
