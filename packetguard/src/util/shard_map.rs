//! A fixed-capacity, sharded, LRU-evicted concurrent map.
//!
//! Every bounded table in the data model (§3) — rate-limit entries, token
//! state, peer sequence state, connection contexts — needs the same shape:
//! many concurrent packet-processing contexts doing a read-modify-write on
//! one key, with a hard capacity and LRU eviction once it's reached. This is
//! that shape, built once and reused everywhere.
//!
//! Keys are hashed with `ahash` to pick one of a small, fixed number of
//! shards; each shard is an independently-locked `lru::LruCache`. Concurrent
//! updates to *different* keys almost never contend (they only collide when
//! they hash to the same shard); concurrent updates to the *same* key
//! serialize through that shard's mutex, which is this implementation's
//! documented choice of per-shard locking over lock-free tolerance (see
//! `SPEC_FULL.md` §3.1, §5, §9).

use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use lru::LruCache;
use parking_lot::Mutex;

const DEFAULT_SHARDS: usize = 16;

pub struct ShardedLru<K, V> {
    shards: Vec<Mutex<LruCache<K, V>>>,
    hasher: RandomState,
}

impl<K, V> ShardedLru<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a table with the given total capacity, spread evenly across
    /// [`DEFAULT_SHARDS`] shards (at least 1 entry per shard).
    pub fn with_capacity(total_capacity: usize) -> Self {
        let per_shard = (total_capacity / DEFAULT_SHARDS).max(1);
        let cap = NonZeroUsize::new(per_shard).expect("per_shard is at least 1");
        let shards =
            (0..DEFAULT_SHARDS).map(|_| Mutex::new(LruCache::new(cap))).collect();
        Self { shards, hasher: RandomState::new() }
    }

    fn shard_index(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) as usize) % self.shards.len()
    }

    /// Look up `key` and, if present, run `f` against a mutable reference to
    /// its value (counts as an LRU touch). Returns `None` if absent.
    pub fn get_mut_with<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let idx = self.shard_index(key);
        let mut shard = self.shards[idx].lock();
        shard.get_mut(key).map(f)
    }

    /// Insert `value` for `key`, evicting the shard's LRU entry if it is full.
    pub fn insert(&self, key: K, value: V) {
        let idx = self.shard_index(&key);
        self.shards[idx].lock().put(key, value);
    }

    /// Atomically (per shard) look up `key`: if present, run `present` on the
    /// existing value; if absent, insert `make_absent()`'s value and run
    /// `present` on it too. This is the single-lock-acquisition version of
    /// "get-or-insert-then-mutate" used by every tracker in this crate.
    pub fn get_or_insert_with<R>(
        &self,
        key: K,
        make_absent: impl FnOnce() -> V,
        present: impl FnOnce(&mut V, bool) -> R,
    ) -> R {
        let idx = self.shard_index(&key);
        let mut shard = self.shards[idx].lock();
        if let Some(v) = shard.get_mut(&key) {
            return present(v, false);
        }
        let mut value = make_absent();
        let result = present(&mut value, true);
        shard.put(key, value);
        result
    }

    /// Total number of entries currently stored across all shards.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }
}
