use crate::{
    cache::{CacheEntry, CacheEntryState},
    plan::CandidateStats,
};
use serde::Serialize;

///
/// EntryReport
///
/// Presentation-neutral view of one cache entry, ready to serialize.
/// Usable directly as the serializer passed to `PlanCache::get_matching_stats`.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntryReport {
    pub works: u64,
    pub state: CacheEntryState,
    pub solutions: usize,
    pub winner: Option<String>,
    pub candidates: Vec<CandidateStats>,
    pub scores: Vec<f64>,
}

impl EntryReport {
    pub(crate) fn from_entry(entry: &CacheEntry) -> Self {
        let decision = entry.decision();

        Self {
            works: entry.works(),
            state: entry.state(),
            solutions: entry.solutions().len(),
            winner: decision.winner().map(|stats| stats.summary.clone()),
            candidates: decision.stats.clone(),
            scores: decision.scores.clone(),
        }
    }
}
