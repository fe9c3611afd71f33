use heapcache::policy::item::ItemCache;
use heapcache::traits::CacheItem;

#[derive(Debug)]
struct Quote {
    symbol: &'static str,
    timestamp: u64,
}

impl CacheItem for Quote {
    type Key = &'static str;

    fn key(&self) -> &'static str {
        self.symbol
    }

    fn less(&self, other: &Self) -> bool {
        self.timestamp < other.timestamp
    }
}

fn main() {
    let cache = ItemCache::new(2);

    cache.add(Quote { symbol: "ACME", timestamp: 100 });
    cache.add(Quote { symbol: "INIT", timestamp: 200 });
    cache.add(Quote { symbol: "ACME", timestamp: 300 });
    cache.add(Quote { symbol: "ZETA", timestamp: 250 });

    println!("contains INIT? {}", cache.contains("INIT"));
    println!("ACME at {:?}", cache.get("ACME").map(|q| q.timestamp));
    println!("oldest = {:?}", cache.peek_lowest().map(|q| q.symbol));
}

// Expected output:
// contains INIT? false
// ACME at Some(300)
// oldest = Some("ZETA")
//
// Explanation: capacity=2; re-adding "ACME" refreshes its timestamp in place,
// so "INIT" is the oldest quote when "ZETA" arrives and is evicted.
