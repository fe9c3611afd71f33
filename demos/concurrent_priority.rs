use std::thread;

use heapcache::builder::CacheBuilder;
use heapcache::traits::order_by;

fn main() {
    // Keep the cheapest jobs: the most expensive one is evicted first.
    let cache = CacheBuilder::new(8)
        .preallocate(true)
        .build_with_order::<u32, String, u64, _>(order_by(|a: &u64, b: &u64| a > b));

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..10u32 {
                    let job = worker * 10 + i;
                    cache.add(job, format!("job-{}", job), u64::from(job));
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    println!("len = {}", cache.len());
    println!("next victim cost = {:?}", cache.peek_lowest().map(|(_, _, cost)| cost));
}

// Example output (thread interleaving decides which jobs survive):
// len = 8
// next victim cost = Some(37)
//
// Explanation: capacity=8 and every add past capacity evicts the most
// expensive job present, so the cache never exceeds 8 entries.
