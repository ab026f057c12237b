#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generic recycle-or-expand object pool.
//!
//! A [`Pool`] owns every instance it ever created and partitions them into an
//! idle set and a live set. Instances are cloned from a prefab, receive a
//! [`PoolId`] exactly once at creation, and keep that identity for the
//! lifetime of the pool. The pool carries no gameplay knowledge; per-kind
//! behaviour is supplied through the [`Poolable`] hooks.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::debug;

/// Reset hooks invoked by the pool when an instance changes sets.
pub trait Poolable {
    /// Invoked after the instance leaves the idle set.
    fn on_acquire(&mut self) {}

    /// Invoked before the instance re-enters the idle set.
    fn on_release(&mut self);
}

/// Stable identity assigned to a pooled instance when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u32);

impl PoolId {
    /// Creates an identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Set membership of a pooled instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Available for the next [`Pool::acquire`].
    Idle,
    /// Handed out and in use.
    Live,
}

/// Sizing parameters for a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Instances created when the pool is constructed.
    pub initial_capacity: usize,
    /// Instances created when an acquire finds the idle set empty.
    /// Zero disables expansion.
    pub expansion_batch: usize,
    /// Upper bound on the number of instances the pool may ever hold.
    pub max_capacity: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 10,
            expansion_batch: 10,
            max_capacity: None,
        }
    }
}

/// Failures reported by [`Pool::acquire`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// No idle instance was available and the pool could not grow.
    #[error("pool exhausted with {live} live instances and no room to expand")]
    Exhausted {
        /// Number of live instances at the time of the failure.
        live: usize,
    },
}

#[derive(Clone, Debug)]
struct Entry<T> {
    item: T,
    lifecycle: Lifecycle,
}

/// Container guaranteeing single ownership of recyclable instances.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    prefab: T,
    config: PoolConfig,
    entries: Vec<Entry<T>>,
    idle: VecDeque<PoolId>,
    live: Vec<PoolId>,
}

impl<T> Pool<T>
where
    T: Poolable + Clone,
{
    /// Creates a pool holding `config.initial_capacity` idle clones of `prefab`.
    #[must_use]
    pub fn new(prefab: T, config: PoolConfig) -> Self {
        let mut pool = Self {
            prefab,
            config,
            entries: Vec::new(),
            idle: VecDeque::new(),
            live: Vec::new(),
        };
        let _ = pool.expand(config.initial_capacity);
        pool
    }

    /// Moves an idle instance into the live set and returns its identity.
    ///
    /// When the idle set is empty a single expansion batch is attempted before
    /// giving up with [`PoolError::Exhausted`].
    pub fn acquire(&mut self) -> Result<PoolId, PoolError> {
        if self.idle.is_empty() && self.expand(self.config.expansion_batch) == 0 {
            return Err(PoolError::Exhausted {
                live: self.live.len(),
            });
        }

        let id = self.idle.pop_front().ok_or(PoolError::Exhausted {
            live: self.live.len(),
        })?;
        let entry = &mut self.entries[id.index()];
        entry.lifecycle = Lifecycle::Live;
        entry.item.on_acquire();
        self.live.push(id);
        Ok(id)
    }

    /// Returns a live instance to the idle set.
    ///
    /// Releasing an identity that is not live is a no-op and reports `false`.
    pub fn release(&mut self, id: PoolId) -> bool {
        let Some(position) = self.live.iter().position(|live| *live == id) else {
            debug!(id = id.get(), "ignoring release of an instance that is not live");
            return false;
        };

        let _ = self.live.remove(position);
        self.park(id);
        true
    }

    /// Returns every live instance to the idle set, in live order.
    pub fn release_all(&mut self) -> Vec<PoolId> {
        let released = std::mem::take(&mut self.live);
        for id in &released {
            self.park(*id);
        }
        released
    }

    /// Borrows an instance regardless of its lifecycle.
    #[must_use]
    pub fn get(&self, id: PoolId) -> Option<&T> {
        self.entries.get(id.index()).map(|entry| &entry.item)
    }

    /// Mutably borrows an instance regardless of its lifecycle.
    #[must_use]
    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut T> {
        self.entries.get_mut(id.index()).map(|entry| &mut entry.item)
    }

    /// Reports the set an instance currently belongs to.
    #[must_use]
    pub fn lifecycle(&self, id: PoolId) -> Option<Lifecycle> {
        self.entries.get(id.index()).map(|entry| entry.lifecycle)
    }

    /// Reports whether the instance is currently live.
    #[must_use]
    pub fn is_live(&self, id: PoolId) -> bool {
        self.lifecycle(id) == Some(Lifecycle::Live)
    }

    /// Identities of the live instances in the order they were acquired.
    #[must_use]
    pub fn live_ids(&self) -> &[PoolId] {
        &self.live
    }

    /// Iterator over live instances in the order they were acquired.
    pub fn iter_live(&self) -> impl Iterator<Item = (PoolId, &T)> + '_ {
        self.live
            .iter()
            .map(move |id| (*id, &self.entries[id.index()].item))
    }

    /// Number of instances waiting in the idle set.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    /// Number of instances currently live.
    #[must_use]
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Total number of instances ever created. Never decreases.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn park(&mut self, id: PoolId) {
        if let Some(entry) = self.entries.get_mut(id.index()) {
            entry.item.on_release();
            entry.lifecycle = Lifecycle::Idle;
            self.idle.push_back(id);
        }
    }

    fn expand(&mut self, amount: usize) -> usize {
        let allowed = match self.config.max_capacity {
            Some(max) => max.saturating_sub(self.entries.len()).min(amount),
            None => amount,
        };

        let mut created = 0;
        for _ in 0..allowed {
            let Ok(raw) = u32::try_from(self.entries.len()) else {
                break;
            };
            let id = PoolId(raw);
            self.entries.push(Entry {
                item: self.prefab.clone(),
                lifecycle: Lifecycle::Idle,
            });
            self.idle.push_back(id);
            created += 1;
        }

        if created > 0 {
            debug!(created, total = self.entries.len(), "expanded pool");
        }
        created
    }
}
