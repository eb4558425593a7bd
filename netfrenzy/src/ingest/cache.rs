// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Recent-value caches that suppress repeated MERGE statements
//!
//! Consecutive packets of a flow carry the same addresses, so most node and
//! relationship merges are redundant. Each kind keeps a small FIFO window of
//! values already written; a hit skips the statement.

use lru::LruCache;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// What a cached value stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKind {
    Ip,
    Mac,
    Assign,
    Ssid,
    Advertises,
    Probes,
    ProbeResponse,
}

impl CacheKind {
    pub const ALL: [CacheKind; 7] = [
        CacheKind::Ip,
        CacheKind::Mac,
        CacheKind::Assign,
        CacheKind::Ssid,
        CacheKind::Advertises,
        CacheKind::Probes,
        CacheKind::ProbeResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Ip => "IP",
            CacheKind::Mac => "MAC",
            CacheKind::Assign => "ASSIGN",
            CacheKind::Ssid => "SSID",
            CacheKind::Advertises => "ADVERTISES",
            CacheKind::Probes => "PROBES",
            CacheKind::ProbeResponse => "PROBE_RESPONSE",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node name or an ordered pair of names for relationships
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    One(String),
    Pair(String, String),
}

impl CacheKey {
    pub fn one(value: &str) -> Self {
        CacheKey::One(value.to_string())
    }

    pub fn pair(first: &str, second: &str) -> Self {
        CacheKey::Pair(first.to_string(), second.to_string())
    }
}

/// Hit/miss counters and occupancy of one cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub used: usize,
    pub capacity: usize,
}

/// Bounded first-in-first-out window of recently seen values.
///
/// Hits do not refresh a value's position, so the oldest insertion is the
/// one evicted.
pub struct RecentCache<K: Hash + Eq> {
    entries: LruCache<K, ()>,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq> RecentCache<K> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns true if `value` was already present; otherwise remembers it.
    pub fn cached(&mut self, value: K) -> bool {
        // `contains` leaves the recency order untouched
        if self.entries.contains(&value) {
            self.hits += 1;
            true
        } else {
            self.misses += 1;
            self.entries.push(value, ());
            false
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            used: self.entries.len(),
            capacity: self.entries.cap().get(),
        }
    }
}

/// One [`RecentCache`] per [`CacheKind`]
pub struct IngestCache {
    caches: Vec<RecentCache<CacheKey>>,
}

impl IngestCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            caches: CacheKind::ALL
                .iter()
                .map(|_| RecentCache::new(capacity))
                .collect(),
        }
    }

    pub fn cached(&mut self, kind: CacheKind, key: CacheKey) -> bool {
        self.caches[kind.slot()].cached(key)
    }

    pub fn stats(&self, kind: CacheKind) -> CacheStats {
        self.caches[kind.slot()].stats()
    }

    /// Stats for every kind, in [`CacheKind::ALL`] order
    pub fn all_stats(&self) -> Vec<(CacheKind, CacheStats)> {
        CacheKind::ALL
            .iter()
            .map(|&kind| (kind, self.stats(kind)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = RecentCache::new(cap(4));
        assert!(!cache.cached("10.0.0.1"));
        assert!(cache.cached("10.0.0.1"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.used, 1);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn test_evicts_oldest_insertion() {
        let mut cache = RecentCache::new(cap(2));
        cache.cached("a");
        cache.cached("b");
        // A hit must not protect "a" from eviction
        assert!(cache.cached("a"));
        cache.cached("c");

        assert!(!cache.cached("a"));
        assert_eq!(cache.stats().used, 2);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut cache = IngestCache::new(cap(8));
        assert!(!cache.cached(CacheKind::Ip, CacheKey::one("x")));
        assert!(!cache.cached(CacheKind::Ssid, CacheKey::one("x")));
        assert!(cache.cached(CacheKind::Ip, CacheKey::one("x")));

        assert_eq!(cache.stats(CacheKind::Ip).hits, 1);
        assert_eq!(cache.stats(CacheKind::Ssid).hits, 0);
        assert_eq!(cache.stats(CacheKind::Mac).misses, 0);
    }

    #[test]
    fn test_pair_keys_are_ordered() {
        let mut cache = IngestCache::new(cap(8));
        cache.cached(CacheKind::Assign, CacheKey::pair("10.0.0.1", "aa"));
        assert!(!cache.cached(CacheKind::Assign, CacheKey::pair("aa", "10.0.0.1")));
    }

    #[test]
    fn test_all_stats_order() {
        let cache = IngestCache::new(cap(1));
        let kinds: Vec<CacheKind> = cache.all_stats().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, CacheKind::ALL.to_vec());
    }
}
