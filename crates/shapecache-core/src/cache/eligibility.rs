use crate::query::NormalizedQuery;

///
/// Decide whether plans for this query shape may be cached at all.
///
/// Rejected shapes:
/// - an empty filter with no sort, which can only ever be a collection scan
/// - queries carrying `hint`, `min` or `max`, which name their plan explicitly
/// - explain-mode queries, which must report live planning state
///
/// Pure; takes no lock.
///
#[must_use]
pub fn should_cache(query: &NormalizedQuery) -> bool {
    if query.filter().is_empty() && query.sort().is_empty() {
        return false;
    }

    if query.hint().is_some() || query.min().is_some() || query.max().is_some() {
        return false;
    }

    !query.is_explain()
}
