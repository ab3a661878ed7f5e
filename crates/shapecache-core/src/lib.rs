//! Core runtime for ShapeCache: query shapes, index compatibility, cache keys,
//! and the concurrent plan cache with its promotion policy.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod cache;
pub mod error;
pub mod index;
pub mod obs;
pub mod plan;
pub mod query;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default maximum number of entries held by a plan cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

/// Default multiplier applied to an inactive entry's works threshold when a
/// worse observation arrives.
pub const DEFAULT_GROWTH_COEFFICIENT: f64 = 2.0;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, counters, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cache::{
            CacheEntry, CacheEntryState, CacheLookup, PlanCache, PlanCacheConfig, PlanCacheKey,
            should_cache,
        },
        index::{IndexCompatibilityView, IndexDescriptor},
        plan::{CandidateStats, PlanRankingDecision, SolutionCacheData},
        query::{MatchExpr, NormalizedQuery, ProjectionSpec, SortSpec},
        value::Value,
    };
}
