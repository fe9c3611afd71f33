#![no_main]

use heapcache::ds::{IndexedHeap, SlotId};
use heapcache::traits::Ascending;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IndexedHeap
//
// Tests random sequences of push, pop, in-place update + fix, remove,
// bulk append + rebuild and clear, checking position bookkeeping after
// every step.
fuzz_target!(|data: &[u8]| {
    let mut heap: IndexedHeap<u32, Ascending> = IndexedHeap::new(Ascending);
    let mut live: Vec<SlotId> = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 7;
        let arg = data[idx + 1];

        match op {
            0 => {
                live.push(heap.push(u32::from(arg)));
            },
            1 => {
                if let Some(id) = heap.peek_id() {
                    let min = heap.peek().copied();
                    assert_eq!(heap.pop(), min);
                    live.retain(|&live_id| live_id != id);
                } else {
                    assert!(heap.pop().is_none());
                }
            },
            2 => {
                if !live.is_empty() {
                    let id = live[arg as usize % live.len()];
                    if let Some(value) = heap.get_mut(id) {
                        *value = u32::from(arg).wrapping_mul(31);
                    }
                    assert!(heap.fix(id));
                }
            },
            3 => {
                if !live.is_empty() {
                    let id = live.swap_remove(arg as usize % live.len());
                    assert!(heap.remove(id).is_some());
                    assert!(heap.get(id).is_none());
                }
            },
            4 => {
                for offset in 0..(arg % 8) {
                    live.push(heap.push_unordered(u32::from(arg ^ offset)));
                }
                heap.rebuild();
            },
            5 => {
                heap.remove_at(arg as usize);
                live.retain(|&id| heap.get(id).is_some());
            },
            6 => {
                if arg % 16 == 0 {
                    heap.clear();
                    live.clear();
                }
            },
            _ => unreachable!(),
        }

        assert_eq!(heap.len(), live.len());
        #[cfg(debug_assertions)]
        if let Err(err) = heap.check_invariants() {
            panic!("{}", err);
        }

        idx += 2;
    }
});
