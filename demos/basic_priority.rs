use heapcache::policy::priority::PriorityCache;

fn main() {
    let cache: PriorityCache<&str, String, u32> = PriorityCache::new(3);

    cache.add("a", "alpha".to_string(), 1);
    cache.add("b", "beta".to_string(), 2);
    cache.add("c", "gamma".to_string(), 3);
    cache.add("d", "delta".to_string(), 4);

    println!("contains a? {}", cache.contains("a"));
    println!("contains d? {}", cache.contains("d"));

    cache.add("c", "gamma".to_string(), 0);
    let evicted = cache.add_many([("e", "epsilon".to_string(), 5), ("f", "zeta".to_string(), 6)]);

    println!("batch evicted {}", evicted);
    println!("len = {}", cache.len());
    println!("contains c? {}", cache.contains("c"));
}

// Expected output:
// contains a? false
// contains d? true
// batch evicted 2
// len = 3
// contains c? false
//
// Explanation: capacity=3; adding "d" evicts the lowest priority "a". Lowering
// "c" to 0 makes it the next victim, so the two-entry batch evicts "c" and "b".
