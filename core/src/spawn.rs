//! Spawn point selection and proximity queries over live enemies.

use glam::Vec3;
use rand::Rng;

use crate::{EnemyId, EnemySnapshot, SpawnPoint};

/// Selects a spawn point that keeps new placements away from `center`.
///
/// Points farther than `min_distance` from `center` are candidates and one of
/// them is chosen uniformly in a single reservoir-sampling pass. When no point
/// qualifies the farthest point overall is returned instead, so the result is
/// `None` only when `points` is empty.
pub fn select_spawn_point<R>(
    points: &[SpawnPoint],
    center: Vec3,
    min_distance: f32,
    rng: &mut R,
) -> Option<SpawnPoint>
where
    R: Rng + ?Sized,
{
    let mut chosen: Option<SpawnPoint> = None;
    let mut candidates: u32 = 0;
    let mut farthest: Option<(f32, SpawnPoint)> = None;

    for point in points {
        let distance = center.distance(point.position);

        if distance > min_distance {
            candidates = candidates.saturating_add(1);
            if rng.gen_range(0..candidates) == 0 {
                chosen = Some(*point);
            }
        }

        if farthest.map_or(true, |(best, _)| distance > best) {
            farthest = Some((distance, *point));
        }
    }

    chosen.or(farthest.map(|(_, point)| point))
}

/// Read-only snapshot of the live enemy set, queryable by position.
///
/// Snapshots are kept in the pool's live order, which is also the order used
/// to break distance ties.
#[derive(Clone, Debug, Default)]
pub struct SpawnRegistry {
    snapshots: Vec<EnemySnapshot>,
}

impl SpawnRegistry {
    /// Creates a registry from snapshots listed in live order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in live order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured by the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == enemy)
    }

    /// Consumes the registry, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }

    /// Finds the live enemy closest to `position`, ignoring range.
    ///
    /// The result may be arbitrarily far away; range-gated callers should use
    /// [`SpawnRegistry::find_nearest_within_range`].
    #[must_use]
    pub fn find_nearest(&self, position: Vec3) -> Option<&EnemySnapshot> {
        self.nearest_matching(position, |_| true)
            .map(|(snapshot, _)| snapshot)
    }

    /// Finds the live enemy closest to `position` unless it lies beyond `range`.
    #[must_use]
    pub fn find_nearest_within_range(&self, position: Vec3, range: f32) -> Option<&EnemySnapshot> {
        self.nearest_matching(position, |_| true)
            .filter(|(_, distance)| *distance <= range)
            .map(|(snapshot, _)| snapshot)
    }

    /// Finds the closest enemy that is still alive, unless it lies beyond `range`.
    #[must_use]
    pub fn find_nearest_target(&self, position: Vec3, range: f32) -> Option<&EnemySnapshot> {
        self.nearest_matching(position, EnemySnapshot::is_targetable)
            .filter(|(_, distance)| *distance <= range)
            .map(|(snapshot, _)| snapshot)
    }

    fn nearest_matching<F>(&self, position: Vec3, mut accept: F) -> Option<(&EnemySnapshot, f32)>
    where
        F: FnMut(&EnemySnapshot) -> bool,
    {
        let mut best: Option<(&EnemySnapshot, f32)> = None;

        for snapshot in &self.snapshots {
            if !accept(snapshot) {
                continue;
            }

            let distance = position.distance(snapshot.position);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((snapshot, distance)),
            }
        }

        best
    }
}
