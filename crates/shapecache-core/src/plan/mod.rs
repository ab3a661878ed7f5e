//! Values the cache stores on behalf of the planner: cached-plan descriptors
//! and the ranking decision that chose them. Both are produced outside the
//! cache and treated as opaque apart from the winner's works counter.

mod decision;
mod solution;


///
/// Re-Exports
///
pub use decision::{CandidateStats, PlanRankingDecision};
pub use solution::{IndexAssignment, PlanCacheIndexTree, SolutionCacheData, SolutionKind};
