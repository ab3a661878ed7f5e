use serde::Serialize;

///
/// CandidateStats
///
/// Trial-run counters for one candidate plan.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CandidateStats {
    pub summary: String,
    pub works: u64,
    pub advanced: u64,
    pub is_eof: bool,
}

impl CandidateStats {
    #[must_use]
    pub fn new(summary: impl Into<String>, works: u64) -> Self {
        Self {
            summary: summary.into(),
            works,
            ..Self::default()
        }
    }
}

///
/// PlanRankingDecision
///
/// Output of multi-plan ranking: per-candidate stats and scores, plus the
/// candidate order with the winner first.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlanRankingDecision {
    pub stats: Vec<CandidateStats>,
    pub scores: Vec<f64>,
    pub candidate_order: Vec<usize>,
}

impl PlanRankingDecision {
    /// Decision whose sole candidate did `works` units of work.
    #[must_use]
    pub fn single(summary: impl Into<String>, works: u64) -> Self {
        Self {
            stats: vec![CandidateStats::new(summary, works)],
            scores: vec![0.0],
            candidate_order: vec![0],
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<&CandidateStats> {
        self.candidate_order
            .first()
            .and_then(|&idx| self.stats.get(idx))
    }

    /// Works counter of the winning candidate.
    #[must_use]
    pub fn winning_works(&self) -> Option<u64> {
        self.winner().map(|stats| stats.works)
    }
}
