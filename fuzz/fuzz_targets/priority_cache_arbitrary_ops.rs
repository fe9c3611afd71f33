#![no_main]

use heapcache::policy::priority::PriorityCore;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

// Fuzz arbitrary operation sequences on PriorityCore
//
// Tests random sequences of add, get, remove, evict, resize and purge,
// checking the capacity bound and map/heap agreement after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = data[0] as usize % 32;
    let mut cache: PriorityCore<u8, u8, u8> = PriorityCore::new(capacity);

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1];
        let priority = data[idx + 2];

        match op {
            0 | 1 => {
                cache.add(key, Arc::new(priority), priority);
                if cache.capacity() > 0 {
                    assert_eq!(cache.get(&key).as_deref(), Some(&priority));
                }
            },
            2 => {
                let present = cache.contains(&key);
                assert_eq!(cache.remove(&key), present);
                assert!(!cache.remove(&key));
            },
            3 => {
                let before = cache.len();
                let n = priority as usize % 8;
                assert_eq!(cache.evict(n), n.min(before));
            },
            4 => {
                let before = cache.len();
                let new_capacity = priority as usize % 40;
                assert_eq!(cache.set_capacity(new_capacity), before.saturating_sub(new_capacity));
            },
            5 => {
                cache.change_capacity(i8::from_ne_bytes([priority]) as isize);
            },
            6 => {
                if let Some((_, _, lowest)) = cache.peek_lowest() {
                    let lowest = *lowest;
                    let popped = cache.pop_lowest().map(|(_, _, p)| p);
                    assert_eq!(popped, Some(lowest));
                }
            },
            7 => {
                if key % 32 == 0 {
                    cache.purge();
                    assert!(cache.is_empty());
                }
            },
            _ => unreachable!(),
        }

        assert!(cache.len() <= cache.capacity());
        #[cfg(debug_assertions)]
        if let Err(err) = cache.check_invariants() {
            panic!("{}", err);
        }

        idx += 3;
    }
});
