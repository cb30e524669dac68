//! In-memory memoization for annotator results.
//!
//! Keyed by the exact input text. Entries never expire within a process;
//! growth is bounded only by the eviction policy.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// How the cache makes room for new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Keep everything. Fine for one sampled batch (at most 20 rows);
    /// memory grows with every distinct input otherwise.
    #[default]
    Unbounded,
    /// Keep at most this many entries, evicting the oldest insertion first.
    MaxEntries(usize),
}

impl EvictionPolicy {
    /// `None` means unbounded.
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(n) => EvictionPolicy::MaxEntries(n),
            None => EvictionPolicy::Unbounded,
        }
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct CacheInner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

/// Thread-safe memo table.
pub struct MemoCache<K, V> {
    inner: RwLock<CacheInner<K, V>>,
    policy: EvictionPolicy,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Look up a cached value, counting the hit or miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.entries.get(key).cloned());
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a value, evicting per the policy.
    pub fn insert(&self, key: K, value: V) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        if let Some(existing) = guard.entries.get_mut(&key) {
            *existing = value;
            return;
        }
        if let EvictionPolicy::MaxEntries(max) = self.policy {
            if max == 0 {
                return;
            }
            while guard.entries.len() >= max {
                match guard.order.pop_front() {
                    Some(oldest) => {
                        guard.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        guard.order.push_back(key.clone());
        guard.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.entries.clear();
            guard.order.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
