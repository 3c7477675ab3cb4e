//! Property tests for counter cache algebra.

use proptest::prelude::*;

use learnhub::adapters::InMemoryCounterCache;
use learnhub::domain::counter::{ClampPolicy, CounterField, CounterKey};
use learnhub::domain::foundation::EntityId;
use learnhub::ports::CounterCache;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn key() -> CounterKey {
    CounterKey::review(EntityId::new(1).unwrap())
}

async fn apply(cache: &InMemoryCounterCache, deltas: &[i64]) -> i64 {
    let mut last = 0;
    for delta in deltas {
        last = if *delta >= 0 {
            cache.increment(key(), CounterField::LikeCount, *delta).await.unwrap()
        } else {
            cache.decrement(key(), CounterField::LikeCount, -delta).await.unwrap()
        };
    }
    last
}

proptest! {
    #[test]
    fn unclamped_value_is_sum_of_deltas(deltas in prop::collection::vec(-5i64..=5, 1..50)) {
        let cache = InMemoryCounterCache::new();
        let rt = runtime();

        let last = rt.block_on(apply(&cache, &deltas));
        let stored = rt.block_on(cache.get(key(), CounterField::LikeCount)).unwrap();

        prop_assert_eq!(last, deltas.iter().sum::<i64>());
        prop_assert_eq!(stored, Some(last));
    }

    #[test]
    fn clamped_value_follows_floor_at_zero(deltas in prop::collection::vec(-5i64..=5, 1..50)) {
        let cache = InMemoryCounterCache::with_policy(ClampPolicy::AtZero);
        let rt = runtime();

        let last = rt.block_on(apply(&cache, &deltas));
        let expected = deltas.iter().fold(0i64, |acc, d| (acc + d).max(0));

        prop_assert_eq!(last, expected);
        prop_assert!(last >= 0);
    }
}
