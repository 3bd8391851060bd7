//! Correctness Tests for Cache Algorithms
//!
//! This module validates the fundamental correctness of each cache engine
//! using simple, predictable access patterns. Each test explicitly validates
//! which specific key gets evicted when a put causes an eviction.
//!
//! ## Test Strategy
//! - Small cache sizes (2-4 entries) for predictable behavior
//! - Simple, deterministic access patterns
//! - Each test validates the core eviction policy of the engine
//! - Explicit checks for which key was evicted after each put

use cache_core::{ArcCache, Cache, LfuCache, LruCache};

// ============================================================================
// LRU
// ============================================================================

#[test]
fn lru_evicts_least_recently_used() {
    let cache: LruCache<i32, i32> = LruCache::new(2);
    cache.put(1, 10);
    cache.put(2, 20);
    assert_eq!(cache.get(&1), Some(10)); // 1 is now MRU, 2 is LRU
    cache.put(3, 30); // evicts 2

    assert_eq!(cache.get(&1), Some(10));
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), Some(30));
    assert_eq!(cache.eviction_count(), 1);
}

#[test]
fn lru_update_does_not_change_recency_order_on_its_own() {
    let cache: LruCache<i32, i32> = LruCache::new(2);
    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(1, 11); // 1 becomes MRU via the update itself
    cache.put(3, 30); // evicts 2, the LRU

    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&1), Some(11));
    assert_eq!(cache.get(&3), Some(30));
}

#[test]
fn lru_scan_resistance_is_absent_by_design() {
    // LRU has no scan resistance: a one-time sweep evicts the whole
    // working set. This test documents that property rather than guarding
    // against it.
    let cache: LruCache<i32, i32> = LruCache::new(3);
    cache.put(1, 1);
    cache.put(2, 2);
    cache.put(3, 3);
    for scan_key in 100..110 {
        cache.put(scan_key, scan_key);
    }
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), None);
}

#[test]
fn lru_remove_and_clear() {
    let cache: LruCache<&str, i32> = LruCache::new(4);
    cache.put("a", 1);
    cache.put("b", 2);
    assert!(cache.remove(&"a"));
    assert!(!cache.remove(&"a"));
    assert_eq!(cache.size(), 1);

    cache.clear();
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get(&"b"), None);
}

// ============================================================================
// LFU
// ============================================================================

#[test]
fn lfu_evicts_least_frequently_used() {
    let cache: LfuCache<i32, i32> = LfuCache::new(2);
    cache.put(1, 10);
    cache.put(2, 20);
    cache.get(&1); // 1: freq 2, 2: freq 1
    cache.put(3, 30); // evicts 2, the least frequent

    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&1), Some(10));
    assert_eq!(cache.get(&3), Some(30));
    assert_eq!(cache.eviction_count(), 1);
}

#[test]
fn lfu_ties_break_least_recently_touched_first() {
    let cache: LfuCache<i32, i32> = LfuCache::new(3);
    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);
    // All at frequency 1. Touch 2 then 3, leaving 1 the least-recently
    // touched among equally-frequent entries.
    cache.get(&2);
    cache.get(&3);
    cache.put(4, 40); // evicts 1

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), Some(20));
    assert_eq!(cache.get(&3), Some(30));
    assert_eq!(cache.get(&4), Some(40));
}

#[test]
fn lfu_frequency_survives_value_updates() {
    let cache: LfuCache<i32, i32> = LfuCache::new(2);
    cache.put(1, 10);
    cache.get(&1); // freq 2
    cache.put(1, 11); // update, freq 3 via touch
    cache.put(2, 20); // freq 1
    cache.put(3, 30); // evicts 2, not 1

    assert_eq!(cache.get(&1), Some(11));
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), Some(30));
}

#[test]
fn lfu_remove_and_clear() {
    let cache: LfuCache<&str, i32> = LfuCache::new(4);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    assert!(cache.remove(&"a"));
    assert!(!cache.remove(&"a"));
    assert_eq!(cache.size(), 1);

    cache.clear();
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get(&"b"), None);
}

// ============================================================================
// ARC
// ============================================================================

#[test]
fn arc_promotes_on_second_access_and_survives_t1_eviction() {
    let cache: ArcCache<i32, i32> = ArcCache::new(3);
    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);
    assert_eq!(cache.get(&1), Some(10)); // promotes 1 into T2
    cache.put(4, 40); // evicts from T1, key 1 is already in T2

    assert_eq!(cache.size(), 3);
    assert_eq!(cache.get(&1), Some(10));
    assert_eq!(cache.get(&4), Some(40));
}

#[test]
fn arc_ghost_hit_on_b1_re_admits_into_t2_and_grows_p() {
    // C=2: put(1); put(2); promote 1 into T2 via a get, so T1 and T2 are
    // both non-empty when put(3) arrives. That put evicts T1's lone entry
    // (key 2) into B1 through REPLACE, rather than discarding it outright
    // (which only happens when T1 alone fills the cache with B1 empty).
    let cache: ArcCache<i32, &str> = ArcCache::new(2);
    cache.put(1, "a");
    cache.put(2, "b");
    assert_eq!(cache.get(&1), Some("a")); // promotes 1 into T2
    cache.put(3, "c"); // evicts 2 into B1
    assert_eq!(cache.target_p(), 0);

    cache.put(2, "b-again"); // ghost hit on B1
    assert!(cache.target_p() >= 1);
    assert_eq!(cache.get(&2), Some("b-again"));
}

#[test]
fn arc_live_size_is_bounded_by_capacity_under_mixed_traffic() {
    let cache: ArcCache<i32, i32> = ArcCache::new(8);
    for round in 0..50 {
        for k in 0..20 {
            cache.put(k, k * round);
            if k % 3 == 0 {
                cache.get(&k);
            }
            assert!(cache.size() <= cache.capacity());
        }
    }
}

#[test]
fn arc_remove_and_clear() {
    let cache: ArcCache<&str, i32> = ArcCache::new(4);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    assert!(cache.remove(&"a"));
    assert!(!cache.remove(&"a"));
    assert_eq!(cache.size(), 1);

    cache.clear();
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.target_p(), 0);
}

// ============================================================================
// CROSS-ENGINE PROPERTIES (see spec properties P1, P3, P4, P6)
// ============================================================================

fn exercise(cache: &dyn Cache<i32, i32>, capacity: usize) {
    for k in 0..500 {
        cache.put(k, k);
        assert!(cache.size() <= capacity, "size must never exceed capacity");
        if k % 2 == 0 {
            let _ = cache.get(&k);
        }
        if k % 7 == 0 {
            let _ = cache.remove(&(k / 2));
        }
    }
    assert!(cache.hit_rate() >= 0.0 && cache.hit_rate() <= 1.0);
}

#[test]
fn p1_bounded_size_holds_for_every_engine() {
    exercise(&LruCache::<i32, i32>::new(16), 16);
    exercise(&LfuCache::<i32, i32>::new(16), 16);
    exercise(&ArcCache::<i32, i32>::new(16), 16);
}

fn assert_zero_capacity_is_inert(cache: &dyn Cache<i32, i32>) {
    assert!(!cache.put(1, 1));
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.size(), 0);
}

#[test]
fn p6_zero_capacity_is_legal_and_inert_for_every_engine() {
    assert_zero_capacity_is_inert(&LruCache::<i32, i32>::new(0));
    assert_zero_capacity_is_inert(&LfuCache::<i32, i32>::new(0));
    assert_zero_capacity_is_inert(&ArcCache::<i32, i32>::new(0));
}
