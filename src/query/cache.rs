//! Keyed query cache.
//!
//! Values are cached per `QueryKey` until the key is invalidated or the
//! configured stale time has passed. Reads of one key are serialized behind a
//! per-key async lock, so concurrent readers share a single fetch. Every
//! invalidation bumps the key's generation; a fetch that was in flight when
//! the generation moved is stored but treated as stale on the next read.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::key::QueryKey;

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationStatus {
    Idle,
    Pending,
}

#[derive(Default)]
struct SlotState {
    value: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Option<Instant>,
    fetched_generation: u64,
}

#[derive(Default)]
struct Slot {
    generation: AtomicU64,
    state: Mutex<SlotState>,
}

pub struct QueryCache {
    slots: DashMap<QueryKey, Arc<Slot>>,
    mutations: DashMap<QueryKey, usize>,
    stale_time: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            mutations: DashMap::new(),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        Arc::clone(
            self.slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Slot::default()))
                .value(),
        )
    }

    fn fresh_value<T>(&self, state: &SlotState, generation: u64) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        if state.fetched_generation != generation {
            return None;
        }
        let fetched_at = state.fetched_at?;
        if fetched_at.elapsed() >= self.stale_time {
            return None;
        }
        state.value.as_ref()?.downcast_ref::<T>().cloned()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Errors are returned to the caller and never cached.
    pub async fn query<T, E, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);
        let mut state = slot.state.lock().await;
        let generation = slot.generation.load(Ordering::Acquire);

        if let Some(value) = self.fresh_value::<T>(&state, generation) {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }

        debug!("Fetching {}", key);
        let value = fetch().await?;
        state.value = Some(Arc::new(value.clone()));
        state.fetched_at = Some(Instant::now());
        state.fetched_generation = generation;
        Ok(value)
    }

    /// Mark `key` stale; the next `query` refetches.
    pub fn invalidate(&self, key: &QueryKey) {
        let generation = self.slot(key).generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Invalidated {} (generation {})", key, generation);
    }

    /// Number of times `key` has been invalidated.
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.slots
            .get(key)
            .map(|slot| slot.generation.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Whether `key` currently holds a value that `query` would return without fetching.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let Some(slot) = self.slots.get(key).map(|slot| Arc::clone(slot.value())) else {
            return false;
        };
        let Ok(state) = slot.state.try_lock() else {
            return false;
        };
        let generation = slot.generation.load(Ordering::Acquire);
        state.value.is_some()
            && state.fetched_generation == generation
            && state
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.stale_time)
    }

    /// Mark a mutation on `key` as in flight until the returned guard drops.
    pub fn begin_mutation(&self, key: &QueryKey) -> MutationGuard<'_> {
        *self.mutations.entry(key.clone()).or_insert(0) += 1;
        MutationGuard {
            cache: self,
            key: key.clone(),
        }
    }

    pub fn mutation_status(&self, key: &QueryKey) -> MutationStatus {
        match self.mutations.get(key) {
            Some(in_flight) if *in_flight > 0 => MutationStatus::Pending,
            _ => MutationStatus::Idle,
        }
    }
}

/// Keeps a mutation key `Pending` while alive.
pub struct MutationGuard<'a> {
    cache: &'a QueryCache,
    key: QueryKey,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut in_flight) = self.cache.mutations.get_mut(&self.key) {
            *in_flight = in_flight.saturating_sub(1);
        }
    }
}
