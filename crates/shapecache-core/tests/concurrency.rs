use shapecache_core::{
    cache::{LookupState, PlanCache, PlanCacheConfig, PlanCacheKey},
    index::IndexDescriptor,
    plan::{PlanCacheIndexTree, PlanRankingDecision, SolutionCacheData},
    query::{MatchExpr, NormalizedQuery},
    value::Value,
};
use std::thread;

const THREADS: usize = 8;
const ROUNDS: u64 = 200;

fn key_for(cache: &PlanCache, path: &str) -> PlanCacheKey {
    cache.compute_key(&NormalizedQuery::new(MatchExpr::eq(path, 1)))
}

fn solutions(index: &str) -> Vec<SolutionCacheData> {
    vec![SolutionCacheData::index_tags(PlanCacheIndexTree::leaf(
        index, 0,
    ))]
}

#[test]
fn concurrent_sets_respect_capacity() {
    let cache = PlanCache::new(PlanCacheConfig::default().with_capacity(16))
        .expect("config should validate");

    thread::scope(|scope| {
        for thread_idx in 0..THREADS {
            let cache = &cache;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let key = key_for(cache, &format!("f{thread_idx}_{}", round % 32));
                    cache
                        .set(key.clone(), solutions("a_1"), PlanRankingDecision::single("IXSCAN", round))
                        .expect("set should succeed");
                    let _ = cache.get(&key);
                    assert!(cache.size() <= cache.capacity());
                }
            });
        }
    });

    assert_eq!(cache.size(), 16);
    let stats = cache.stats();
    assert_eq!(stats.inserts - stats.evictions, 16);
}

#[test]
fn concurrent_observations_on_one_key_end_active_at_minimum() {
    let cache = PlanCache::with_defaults();
    let key = key_for(&cache, "shared");

    // Seed an inactive baseline every thread can beat.
    cache
        .set(key.clone(), solutions("a_1"), PlanRankingDecision::single("IXSCAN", 1_000))
        .expect("seed set should succeed");

    thread::scope(|scope| {
        for thread_idx in 0..THREADS as u64 {
            let (cache, key) = (&cache, &key);
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let works = 10 + (round * 7 + thread_idx * 13) % 500;
                    cache
                        .set(key.clone(), solutions("a_1"), PlanRankingDecision::single("IXSCAN", works))
                        .expect("set should succeed");
                }
            });
        }
    });

    let entry = cache.peek_entry(&key).expect("entry should be present");
    assert!(entry.is_active());
    assert_eq!(entry.works(), 10);
    assert_eq!(cache.get(&key).state(), LookupState::PresentActive);
}

#[test]
fn snapshots_outlive_eviction_on_other_threads() {
    let cache = PlanCache::new(PlanCacheConfig::default().with_capacity(1))
        .expect("config should validate");
    let key = key_for(&cache, "a");
    cache
        .set(key.clone(), solutions("a_1"), PlanRankingDecision::single("IXSCAN a_1", 5))
        .expect("set should succeed");

    let snapshot = cache
        .get(&key)
        .into_entry()
        .expect("entry should be present");

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..ROUNDS {
                let other = key_for(&cache, &format!("other{round}"));
                cache
                    .set(other, solutions("b_1"), PlanRankingDecision::single("IXSCAN b_1", 1))
                    .expect("set should succeed");
            }
        });
    });

    assert!(!cache.contains(&key));
    assert_eq!(snapshot.works(), 5);
    assert_eq!(snapshot.solutions(), solutions("a_1").as_slice());
    assert_eq!(
        snapshot.decision().winner().map(|stats| stats.summary.as_str()),
        Some("IXSCAN a_1")
    );
}

#[test]
fn index_notifications_race_with_key_computation() {
    let cache = PlanCache::with_defaults();
    let query = NormalizedQuery::new(MatchExpr::eq("a", Value::Null));
    let plain = key_for(&cache, "a");

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..ROUNDS {
                if round % 2 == 0 {
                    cache.notify_of_index_entries([IndexDescriptor::new("a_1", ["a"]).sparse()]);
                } else {
                    cache.notify_of_index_entries(Vec::new());
                }
            }
        });

        scope.spawn(|| {
            for _ in 0..ROUNDS {
                let key = cache.compute_key(&query);
                assert!(
                    key == plain || key.as_str() == "eqa<0>",
                    "key should reflect one whole view: {key}"
                );
            }
        });
    });
}
