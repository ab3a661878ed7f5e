//! The plan cache: key derivation, the eligibility filter, cache entries and
//! their promotion policy, configuration, and the concurrent store.

mod config;
mod eligibility;
mod entry;
mod key;
mod plan_cache;
mod report;


///
/// Re-Exports
///
pub use config::PlanCacheConfig;
pub use eligibility::should_cache;
pub use entry::{CacheEntry, CacheEntryState, CacheLookup, LookupState};
pub use key::{KeyFingerprint, PlanCacheKey, compute_key};
pub use plan_cache::PlanCache;
pub use report::EntryReport;

pub(crate) use key::shape_sort_key;
