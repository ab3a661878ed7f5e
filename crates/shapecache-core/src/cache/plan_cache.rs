use crate::{
    cache::{
        CacheEntry, CacheEntryState, CacheLookup, PlanCacheConfig, PlanCacheKey, compute_key,
        entry::Observation,
    },
    error::InternalError,
    index::{IndexCompatibilityView, IndexDescriptor},
    obs::{CacheCounters, CacheStats},
    plan::{PlanRankingDecision, SolutionCacheData},
    query::NormalizedQuery,
};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::{fmt, num::NonZeroUsize, sync::Arc};
use tracing::{debug, trace};

///
/// CacheState
///
/// Everything the cache lock protects: the entry map with its LRU order and
/// the logical clock stamped into entries on every touch.
///

struct CacheState {
    entries: LruCache<PlanCacheKey, CacheEntry>,
    clock: u64,
}

impl CacheState {
    const fn tick(&mut self) -> u64 {
        self.clock = self.clock.wrapping_add(1);
        self.clock
    }

    // The clock only moves when an entry is there to take the tick.
    fn touch(&mut self, key: &PlanCacheKey) -> Option<CacheEntry> {
        let entry = self.entries.get_mut(key)?;
        self.clock = self.clock.wrapping_add(1);
        entry.touch(self.clock);
        Some(entry.clone())
    }
}

///
/// PlanCache
///
/// Bounded, concurrently shared map from query shape to the plan last judged
/// best for it. One lock serializes every map and LRU mutation, and no
/// caller code runs under it except the reporting closures.
///

pub struct PlanCache {
    state: Mutex<CacheState>,
    view: RwLock<Arc<IndexCompatibilityView>>,
    config: PlanCacheConfig,
    counters: CacheCounters,
}

impl PlanCache {
    /// Create an empty cache, rejecting invalid configuration.
    pub fn new(config: PlanCacheConfig) -> Result<Self, InternalError> {
        config.validate()?;

        Ok(Self::build(config))
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::build(PlanCacheConfig::default())
    }

    fn build(config: PlanCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                clock: 0,
            }),
            view: RwLock::new(Arc::new(IndexCompatibilityView::empty())),
            config,
            counters: CacheCounters::default(),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Look up `key`, refreshing its recency when present.
    ///
    /// The returned snapshot is owned; the lock is released before return.
    pub fn get(&self, key: &PlanCacheKey) -> CacheLookup {
        let found = {
            let mut state = self.state.lock();
            state.touch(key)
        };

        match found {
            Some(entry) => {
                self.counters.record_hit();
                trace!(key = %key, state = %entry.state(), works = entry.works(), "plan cache hit");
                CacheLookup::from_entry(entry)
            }
            None => {
                self.counters.record_miss();
                trace!(key = %key, "plan cache miss");
                CacheLookup::NotPresent
            }
        }
    }

    /// Snapshot of the entry for `key` without touching LRU order.
    #[must_use]
    pub fn peek_entry(&self, key: &PlanCacheKey) -> Option<CacheEntry> {
        self.state.lock().entries.peek(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &PlanCacheKey) -> bool {
        self.state.lock().entries.contains(key)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Record a planning outcome for `key` using the configured growth
    /// coefficient.
    pub fn set(
        &self,
        key: PlanCacheKey,
        solutions: Vec<SolutionCacheData>,
        decision: PlanRankingDecision,
    ) -> Result<(), InternalError> {
        self.set_with_growth_coefficient(key, solutions, decision, self.config.growth_coefficient)
    }

    ///
    /// Record a planning outcome for `key`, growing inactive thresholds by
    /// `coefficient` instead of the configured value.
    ///
    /// Input is validated before the lock is taken, so an error never leaves
    /// a partial effect behind. The works value is the winning candidate's.
    ///
    pub fn set_with_growth_coefficient(
        &self,
        key: PlanCacheKey,
        solutions: Vec<SolutionCacheData>,
        decision: PlanRankingDecision,
        coefficient: f64,
    ) -> Result<(), InternalError> {
        if solutions.is_empty() {
            return Err(InternalError::bad_value(
                "cannot cache an empty solution set",
            ));
        }
        let Some(works) = decision.winning_works() else {
            return Err(InternalError::bad_value(
                "ranking decision does not name a winning candidate",
            ));
        };
        if !PlanCacheConfig::growth_coefficient_is_valid(coefficient) {
            return Err(InternalError::bad_value(format!(
                "growth coefficient must be finite and greater than 1.0, got {coefficient}"
            )));
        }

        let solutions: Arc<[SolutionCacheData]> = solutions.into();
        let decision = Arc::new(decision);
        let allow_promotion = !self.config.disable_active_entries;

        let mut state = self.state.lock();
        let tick = state.tick();

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.touch(tick);
            let outcome = entry.observe(solutions, decision, works, coefficient, allow_promotion);
            drop(state);

            self.log_observation(&key, works, outcome);
            return Ok(());
        }

        let initial = if self.config.disable_inactive_entries {
            CacheEntryState::Active
        } else {
            CacheEntryState::Inactive
        };
        let entry = CacheEntry::new(solutions, decision, works, initial, tick);
        let evicted = state.entries.push(key.clone(), entry);
        let size = state.entries.len();
        drop(state);

        self.counters.record_insert();
        debug!(key = %key, works, state = %initial, size, "plan cache entry created");

        if let Some((evicted_key, evicted_entry)) = evicted {
            self.counters.record_eviction();
            debug!(
                key = %evicted_key,
                works = evicted_entry.works(),
                state = %evicted_entry.state(),
                "plan cache evicted least recently used entry"
            );
        }

        Ok(())
    }

    fn log_observation(&self, key: &PlanCacheKey, works: u64, outcome: Observation) {
        match outcome {
            Observation::Promoted => {
                self.counters.record_promotion();
                debug!(key = %key, works, "plan cache entry promoted to active");
            }
            Observation::Refreshed => {
                debug!(key = %key, works, "plan cache entry refreshed; promotion disabled");
            }
            Observation::Grown { from, to } => {
                debug!(key = %key, works, from, to, "plan cache inactive works grown");
            }
            Observation::Replaced => {
                trace!(key = %key, works, "plan cache active entry replaced");
            }
            Observation::Ignored => {
                trace!(key = %key, works, "plan cache active entry kept; observation worse");
            }
        }
    }

    /// Demote an active entry to inactive, keeping its plan and works.
    /// No-op when the entry is inactive or absent. LRU order is untouched.
    pub fn deactivate(&self, key: &PlanCacheKey) {
        let was_active = self
            .state
            .lock()
            .entries
            .peek_mut(key)
            .is_some_and(CacheEntry::deactivate);

        if was_active {
            debug!(key = %key, "plan cache entry deactivated");
        }
    }

    pub fn remove(&self, key: &PlanCacheKey) {
        if self.state.lock().entries.pop(key).is_some() {
            trace!(key = %key, "plan cache entry removed");
        }
    }

    pub fn clear(&self) {
        let dropped = {
            let mut state = self.state.lock();
            let dropped = state.entries.len();
            state.entries.clear();
            dropped
        };

        debug!(dropped, "plan cache cleared");
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn size(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.config.capacity
    }

    #[must_use]
    pub const fn config(&self) -> &PlanCacheConfig {
        &self.config
    }

    ///
    /// Serialize every entry with `serializer`, keep those `matcher` accepts.
    ///
    /// Both closures run under the cache lock and must be fast and
    /// non-blocking. The lock is released before the results are returned.
    ///
    pub fn get_matching_stats<D, S, M>(&self, serializer: S, matcher: M) -> Vec<D>
    where
        S: Fn(&PlanCacheKey, &CacheEntry) -> D,
        M: Fn(&D) -> bool,
    {
        let state = self.state.lock();
        let matches = state
            .entries
            .iter()
            .map(|(key, entry)| serializer(key, entry))
            .filter(|doc| matcher(doc))
            .collect();
        drop(state);

        matches
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.size())
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    // ------------------------------------------------------------------
    // Index catalog coupling
    // ------------------------------------------------------------------

    ///
    /// Replace the index compatibility view used for future key computation.
    ///
    /// Existing entries are left alone; keys built against the old view stop
    /// being produced and age out through LRU order or `clear`.
    ///
    pub fn notify_of_index_entries(&self, entries: impl IntoIterator<Item = IndexDescriptor>) {
        let view = Arc::new(IndexCompatibilityView::from_entries(entries));
        let discriminating = view.len();

        *self.view.write() = view;
        debug!(discriminating, "plan cache index view replaced");
    }

    #[must_use]
    pub fn compatibility_view(&self) -> Arc<IndexCompatibilityView> {
        self.view.read().clone()
    }

    /// Key for `query` under the current compatibility view.
    #[must_use]
    pub fn compute_key(&self, query: &NormalizedQuery) -> PlanCacheKey {
        let view = self.compatibility_view();

        compute_key(query, &view)
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache")
            .field("config", &self.config)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
