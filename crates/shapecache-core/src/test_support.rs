//! Shared fixtures for unit tests.

use crate::{
    cache::{PlanCacheKey, compute_key},
    index::IndexCompatibilityView,
    plan::{CandidateStats, PlanCacheIndexTree, PlanRankingDecision, SolutionCacheData},
    query::{MatchExpr, NormalizedQuery},
};

/// Key for a single-equality shape on `path`, with no discriminating indexes.
pub(crate) fn shape_key(path: &str) -> PlanCacheKey {
    compute_key(
        &NormalizedQuery::new(MatchExpr::eq(path, 1)),
        &IndexCompatibilityView::empty(),
    )
}

/// One tagged solution answered through `index`.
pub(crate) fn solutions_on(index: &str) -> Vec<SolutionCacheData> {
    vec![SolutionCacheData::index_tags(PlanCacheIndexTree::leaf(
        index, 0,
    ))]
}

pub(crate) fn solutions() -> Vec<SolutionCacheData> {
    solutions_on("a_1")
}

/// Two-candidate decision whose winner did `works` units of work.
pub(crate) fn decision(works: u64) -> PlanRankingDecision {
    PlanRankingDecision {
        stats: vec![
            CandidateStats::new("IXSCAN a_1", works),
            CandidateStats::new("COLLSCAN", works.saturating_mul(3)),
        ],
        scores: vec![1.5, 1.0],
        candidate_order: vec![0, 1],
    }
}
