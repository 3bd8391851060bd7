//! Concurrent Cache Correctness Tests
//!
//! These tests validate that each engine maintains correct eviction semantics
//! and bounded size while being driven from multiple threads at once. Unlike
//! the stress tests, which focus purely on throughput and absence of panics,
//! these use small capacities and deterministic key ranges so the resulting
//! invariants can be checked precisely at the join point.
//!
//! ## Segments
//!
//! 1. **Bounded size under concurrency**: every engine stays at or under its
//!    configured capacity no matter how many threads are hammering it.
//! 2. **No lost updates**: a key written by exactly one thread is observable
//!    after that thread joins, unless it was evicted by a later `put`.
//! 3. **No deadlocks**: mixed `put`/`get`/`remove` traffic across threads
//!    completes and joins cleanly.

use cache_core::{ArcCache, Cache, LfuCache, LruCache};
use std::sync::Arc;
use std::thread;

// ----------------------------------------------------------------------------
// BOUNDED SIZE UNDER CONCURRENCY
// ----------------------------------------------------------------------------

fn concurrent_writers_respect_capacity(cache: Arc<dyn Cache<i32, i32> + Send + Sync>) {
    let mut handles = Vec::new();
    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                let key = t * 1000 + i;
                cache.put(key, key);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    assert!(
        cache.size() <= cache.capacity(),
        "size must never exceed capacity under concurrent writers"
    );
}

#[test]
fn lru_concurrent_writers_respect_capacity() {
    concurrent_writers_respect_capacity(Arc::new(LruCache::<i32, i32>::new(1024)));
}

#[test]
fn lfu_concurrent_writers_respect_capacity() {
    concurrent_writers_respect_capacity(Arc::new(LfuCache::<i32, i32>::new(1024)));
}

#[test]
fn arc_concurrent_writers_respect_capacity() {
    concurrent_writers_respect_capacity(Arc::new(ArcCache::<i32, i32>::new(1024)));
}

// ----------------------------------------------------------------------------
// MIXED READ/WRITE TRAFFIC COMPLETES WITHOUT DEADLOCK
// ----------------------------------------------------------------------------

/// Eight threads issuing 1000 mixed put/get operations each against a shared
/// cache of capacity 1024. Completing and joining without deadlock, and
/// holding size <= capacity at the join point, is the whole assertion.
fn eight_threads_mixed_traffic(cache: Arc<dyn Cache<i32, i32> + Send + Sync>) {
    let mut handles = Vec::new();
    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                let key = (t * 131 + i) % 2000;
                if i % 3 == 0 {
                    let _ = cache.get(&key);
                } else if i % 11 == 0 {
                    let _ = cache.remove(&key);
                } else {
                    cache.put(key, key);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().expect("mixed-traffic thread panicked");
    }
    assert!(cache.size() <= cache.capacity());
}

#[test]
fn lru_eight_threads_mixed_traffic_completes_without_deadlock() {
    eight_threads_mixed_traffic(Arc::new(LruCache::<i32, i32>::new(1024)));
}

#[test]
fn lfu_eight_threads_mixed_traffic_completes_without_deadlock() {
    eight_threads_mixed_traffic(Arc::new(LfuCache::<i32, i32>::new(1024)));
}

#[test]
fn arc_eight_threads_mixed_traffic_completes_without_deadlock() {
    eight_threads_mixed_traffic(Arc::new(ArcCache::<i32, i32>::new(1024)));
}

// ----------------------------------------------------------------------------
// NO LOST UPDATES: DISJOINT KEY RANGES SURVIVE CONCURRENT WRITES
// ----------------------------------------------------------------------------

#[test]
fn lru_disjoint_key_ranges_are_all_observable_when_capacity_allows() {
    let cache: Arc<LruCache<i32, i32>> = Arc::new(LruCache::new(400));
    let mut handles = Vec::new();
    for t in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                cache.put(t * 100 + i, i);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    // Capacity (400) exactly matches the number of distinct keys written, so
    // every one of them must still be present: no eviction had a reason to
    // happen and no write was lost to a race.
    assert_eq!(cache.size(), 400);
    assert_eq!(cache.eviction_count(), 0);
    for t in 0..4 {
        for i in 0..100 {
            assert_eq!(cache.get(&(t * 100 + i)), Some(i));
        }
    }
}

#[test]
fn arc_concurrent_gets_on_a_preloaded_cache_never_corrupt_state() {
    let cache: Arc<ArcCache<i32, i32>> = Arc::new(ArcCache::new(64));
    for k in 0..64 {
        cache.put(k, k * 10);
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                for k in 0..64 {
                    let _ = cache.get(&k);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().expect("reader thread panicked");
    }

    assert_eq!(cache.size(), 64);
    for k in 0..64 {
        assert_eq!(cache.get(&k), Some(k * 10));
    }
}
