use crate::{
    cache::report::EntryReport,
    plan::{PlanRankingDecision, SolutionCacheData},
};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// CacheEntryState
///
/// Active entries are trusted without re-validation. Inactive entries are
/// kept only as a cost baseline and must be re-proven by the ranker.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheEntryState {
    Inactive,
    Active,
}

impl CacheEntryState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for CacheEntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// CacheEntry
///
/// Unit of storage in the plan cache. Handed out as an owned snapshot; the
/// solutions and decision are shared behind `Arc`, so a snapshot outlives
/// the eviction of its slot.
///

#[derive(Clone, Debug)]
pub struct CacheEntry {
    solutions: Arc<[SolutionCacheData]>,
    decision: Arc<PlanRankingDecision>,
    works: u64,
    state: CacheEntryState,
    recency: u64,
}

impl CacheEntry {
    pub(crate) const fn new(
        solutions: Arc<[SolutionCacheData]>,
        decision: Arc<PlanRankingDecision>,
        works: u64,
        state: CacheEntryState,
        recency: u64,
    ) -> Self {
        Self {
            solutions,
            decision,
            works,
            state,
            recency,
        }
    }

    /// Cached plan descriptors, best first. Never empty.
    #[must_use]
    pub fn solutions(&self) -> &[SolutionCacheData] {
        &self.solutions
    }

    #[must_use]
    pub fn decision(&self) -> &PlanRankingDecision {
        &self.decision
    }

    /// Works threshold at or below which a new plan counts as at least as good.
    #[must_use]
    pub const fn works(&self) -> u64 {
        self.works
    }

    #[must_use]
    pub const fn state(&self) -> CacheEntryState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Logical clock value of the last `get` or `set` that touched this entry.
    #[must_use]
    pub const fn recency(&self) -> u64 {
        self.recency
    }

    #[must_use]
    pub fn report(&self) -> EntryReport {
        EntryReport::from_entry(self)
    }

    pub(crate) const fn touch(&mut self, tick: u64) {
        self.recency = tick;
    }

    /// Returns `true` when the entry was active before the call.
    pub(crate) const fn deactivate(&mut self) -> bool {
        let was_active = self.state.is_active();
        self.state = CacheEntryState::Inactive;
        was_active
    }

    ///
    /// Apply one observed works value to an existing entry.
    ///
    /// Inactive: `works <= self.works` adopts the new plan and promotes
    /// (unless promotion is disallowed); otherwise the threshold grows and
    /// the stored plan stays. Active: `works <= self.works` overwrites;
    /// otherwise nothing changes.
    ///
    pub(crate) fn observe(
        &mut self,
        solutions: Arc<[SolutionCacheData]>,
        decision: Arc<PlanRankingDecision>,
        works: u64,
        coefficient: f64,
        allow_promotion: bool,
    ) -> Observation {
        match self.state {
            CacheEntryState::Inactive if works <= self.works => {
                self.replace_plan(solutions, decision, works);
                if allow_promotion {
                    self.state = CacheEntryState::Active;
                    Observation::Promoted
                } else {
                    Observation::Refreshed
                }
            }
            CacheEntryState::Inactive => {
                let from = self.works;
                self.works = grown_works(from, coefficient);
                Observation::Grown {
                    from,
                    to: self.works,
                }
            }
            CacheEntryState::Active if works <= self.works => {
                self.replace_plan(solutions, decision, works);
                Observation::Replaced
            }
            CacheEntryState::Active => Observation::Ignored,
        }
    }

    fn replace_plan(
        &mut self,
        solutions: Arc<[SolutionCacheData]>,
        decision: Arc<PlanRankingDecision>,
        works: u64,
    ) {
        self.solutions = solutions;
        self.decision = decision;
        self.works = works;
    }
}

// Recency is bookkeeping for eviction, not part of an entry's identity.
impl PartialEq for CacheEntry {
    fn eq(&self, other: &Self) -> bool {
        self.works == other.works
            && self.state == other.state
            && self.solutions == other.solutions
            && self.decision == other.decision
    }
}

///
/// Observation
/// What a `set` on an existing entry did.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Observation {
    Promoted,
    Refreshed,
    Grown { from: u64, to: u64 },
    Replaced,
    Ignored,
}

/// Next works threshold for an inactive entry: `max(works + 1, floor(works * coefficient))`.
///
/// The `+ 1` floor keeps the threshold moving when the product rounds back
/// down to `works`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn grown_works(works: u64, coefficient: f64) -> u64 {
    // float-to-int casts saturate
    let scaled = (works as f64 * coefficient).floor() as u64;

    works.saturating_add(1).max(scaled)
}

///
/// LookupState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupState {
    NotPresent,
    PresentInactive,
    PresentActive,
}

///
/// CacheLookup
///
/// Result of `PlanCache::get`: absent, or an owned snapshot tagged with the
/// entry's state at lookup time.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CacheLookup {
    NotPresent,
    PresentInactive(CacheEntry),
    PresentActive(CacheEntry),
}

impl CacheLookup {
    pub(crate) fn from_entry(entry: CacheEntry) -> Self {
        match entry.state {
            CacheEntryState::Inactive => Self::PresentInactive(entry),
            CacheEntryState::Active => Self::PresentActive(entry),
        }
    }

    #[must_use]
    pub const fn state(&self) -> LookupState {
        match self {
            Self::NotPresent => LookupState::NotPresent,
            Self::PresentInactive(_) => LookupState::PresentInactive,
            Self::PresentActive(_) => LookupState::PresentActive,
        }
    }

    #[must_use]
    pub const fn entry(&self) -> Option<&CacheEntry> {
        match self {
            Self::NotPresent => None,
            Self::PresentInactive(entry) | Self::PresentActive(entry) => Some(entry),
        }
    }

    #[must_use]
    pub fn into_entry(self) -> Option<CacheEntry> {
        match self {
            Self::NotPresent => None,
            Self::PresentInactive(entry) | Self::PresentActive(entry) => Some(entry),
        }
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::NotPresent)
    }
}
