//! Cache Metrics
//!
//! Lock-free counters tracked by every cache engine: hits, misses, evictions,
//! a current-size gauge, and an optional operation-latency histogram.
//!
//! # Why atomics, not a plain struct behind the engine's lock?
//!
//! Every engine serializes its mutable state behind one `RwLock` (see
//! [`crate::cache`]). If counters lived inside that lock, reading
//! `hit_count()` would contend with `put`/`get` on other threads. Instead,
//! counters are `AtomicU64`/`AtomicUsize` with relaxed ordering, updated by
//! whichever thread holds the write lock and read by anyone at any time,
//! mirroring how the reference cache implementation this crate was modeled
//! on exposes its own hit/miss/eviction accessors without taking its
//! read-write lock at all.
//!
//! # Histogram
//!
//! The latency histogram is gated behind the `metrics-histogram` feature.
//! Disabled, [`Metrics::record_latency`] is a no-op — same posture as an
//! optional external exporter integration that only compiles in when linked.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Upper bounds (in nanoseconds) of the fixed latency histogram buckets.
/// The final implicit bucket catches anything above the last bound.
pub const HISTOGRAM_BOUNDS_NS: [u64; 8] = [1_000, 2_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

const ORDER: Ordering = Ordering::Relaxed;

/// Point-in-time snapshot of a cache's metrics, named after the series an
/// external metrics exporter would register them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// `cache_hits_total`
    pub cache_hits_total: u64,
    /// `cache_misses_total`
    pub cache_misses_total: u64,
    /// `cache_evictions_total`
    pub cache_evictions_total: u64,
    /// `cache_size`
    pub cache_size: usize,
    /// `cache_op_latency_ns` bucket counts, aligned with [`HISTOGRAM_BOUNDS_NS`],
    /// plus one trailing overflow bucket. Empty unless `metrics-histogram` is enabled.
    pub cache_op_latency_ns: Vec<u64>,
}

impl MetricsSnapshot {
    /// Renders the snapshot as a `BTreeMap` for deterministic-order reporting
    /// (stable iteration order matters for reproducible test/debug output).
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("cache_evictions_total".to_string(), self.cache_evictions_total as f64);
        map.insert("cache_hits_total".to_string(), self.cache_hits_total as f64);
        map.insert("cache_misses_total".to_string(), self.cache_misses_total as f64);
        map.insert("cache_size".to_string(), self.cache_size as f64);
        for (i, count) in self.cache_op_latency_ns.iter().enumerate() {
            map.insert(format!("cache_op_latency_ns_bucket_{i}"), *count as f64);
        }
        map
    }
}

#[derive(Debug)]
struct Histogram {
    #[cfg(feature = "metrics-histogram")]
    buckets: [AtomicU64; HISTOGRAM_BOUNDS_NS.len() + 1],
}

impl Default for Histogram {
    fn default() -> Self {
        #[cfg(feature = "metrics-histogram")]
        {
            Histogram {
                buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            }
        }
        #[cfg(not(feature = "metrics-histogram"))]
        {
            Histogram {}
        }
    }
}

impl Histogram {
    #[cfg(feature = "metrics-histogram")]
    fn observe(&self, latency_ns: u64) {
        let idx = HISTOGRAM_BOUNDS_NS
            .iter()
            .position(|bound| latency_ns <= *bound)
            .unwrap_or(HISTOGRAM_BOUNDS_NS.len());
        self.buckets[idx].fetch_add(1, ORDER);
    }

    #[cfg(not(feature = "metrics-histogram"))]
    fn observe(&self, _latency_ns: u64) {}

    #[cfg(feature = "metrics-histogram")]
    fn snapshot(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.load(ORDER)).collect()
    }

    #[cfg(not(feature = "metrics-histogram"))]
    fn snapshot(&self) -> Vec<u64> {
        Vec::new()
    }
}

/// Atomic hit/miss/eviction counters, a size gauge, and a latency histogram
/// for a single cache engine instance.
///
/// All accessors are lock-free. `record_*` methods are called by the engine
/// while it holds its own write lock; reads never need to acquire it.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    size: AtomicUsize,
    histogram: Histogram,
}

impl Metrics {
    /// Creates a fresh, zeroed metrics block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, ORDER);
    }

    /// Records a cache miss.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, ORDER);
    }

    /// Records an eviction.
    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, ORDER);
    }

    /// Sets the current size gauge.
    #[inline]
    pub fn set_size(&self, size: usize) {
        self.size.store(size, ORDER);
    }

    /// Records one operation-latency observation. No-op unless the
    /// `metrics-histogram` feature is enabled.
    #[inline]
    pub fn record_latency(&self, started_at: Instant) {
        let elapsed_ns = started_at.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
        self.histogram.observe(elapsed_ns);
    }

    /// Total recorded hits.
    #[inline]
    pub fn hit_count(&self) -> u64 {
        self.hits.load(ORDER)
    }

    /// Total recorded misses.
    #[inline]
    pub fn miss_count(&self) -> u64 {
        self.misses.load(ORDER)
    }

    /// Total recorded evictions.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.evictions.load(ORDER)
    }

    /// Hit rate across all recorded hits and misses, or `0.0` if there have
    /// been none yet.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hit_count();
        let total = hits + self.miss_count();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Returns a point-in-time snapshot of all counters, named after the
    /// series an external exporter would register them under.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits_total: self.hit_count(),
            cache_misses_total: self.miss_count(),
            cache_evictions_total: self.eviction_count(),
            cache_size: self.size.load(ORDER),
            cache_op_latency_ns: self.histogram.snapshot(),
        }
    }
}
