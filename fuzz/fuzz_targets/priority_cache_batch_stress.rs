#![no_main]

use heapcache::policy::priority::PriorityCore;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

// Stress batched inserts on PriorityCore
//
// Splits the input into batches that mix updates, fresh keys and keys
// repeated inside one batch, and checks the eviction count and the
// capacity bound after each batch.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = data[0] as usize % 24;
    let mut cache: PriorityCore<u8, u8, u8> = PriorityCore::new(capacity);

    for batch in data[1..].chunks(16) {
        let items: Vec<(u8, u8)> = batch.chunks_exact(2).map(|pair| (pair[0] % 48, pair[1])).collect();

        let before = cache.len();
        let mut fresh: Vec<u8> = items
            .iter()
            .map(|&(key, _)| key)
            .filter(|key| !cache.contains(key))
            .collect();
        fresh.sort_unstable();
        fresh.dedup();

        let evicted = cache.add_many(items.iter().map(|&(key, priority)| (key, Arc::new(priority), priority)));

        if capacity == 0 {
            assert_eq!(evicted, 0);
            assert!(cache.is_empty());
        } else {
            assert_eq!(cache.len(), before + fresh.len() - evicted);
            for &(key, _) in items.iter().rev() {
                // The last occurrence of a surviving key is the one stored.
                if let Some(value) = cache.get(&key) {
                    let last = items.iter().rev().find(|&&(k, _)| k == key).map(|&(_, p)| p);
                    assert_eq!(Some(*value), last);
                }
            }
        }

        assert!(cache.len() <= cache.capacity());
        #[cfg(debug_assertions)]
        if let Err(err) = cache.check_invariants() {
            panic!("{}", err);
        }
    }
});
