//! Chained hash map with a fixed number of buckets.
//!
//! Each key lands in bucket `hash(key) % bucket_count`. Keys that share a
//! bucket live in the same collision list and are told apart by equality,
//! never by position.
//!
//! ## Fixed capacity
//!
//! The bucket count is chosen at construction and never changes: there is no
//! load-factor-triggered rehash. Lookups cost O(1 + n / bucket_count), so with
//! the default of [`DEFAULT_BUCKETS`] the index degrades toward O(n) as it
//! fills. Callers expecting many keys should size it up front with
//! [`KeyIndex::with_buckets`]; [`KeyIndex::load_factor`] reports the current
//! average chain length.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Bucket count used by [`KeyIndex::new`].
pub const DEFAULT_BUCKETS: usize = 16;

/// Deterministic hasher (fixed SipHash keys), so bucket placement is stable
/// across runs.
pub type DefaultBuildHasher = BuildHasherDefault<DefaultHasher>;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity chained key/value index.
#[derive(Debug, Clone)]
pub struct KeyIndex<K, V, S = DefaultBuildHasher> {
    buckets: Vec<Vec<Entry<K, V>>>,
    len: usize,
    hasher: S,
}

impl<K, V> KeyIndex<K, V> {
    /// Empty index with [`DEFAULT_BUCKETS`] buckets.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Empty index with `bucket_count` buckets (at least one).
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_count, DefaultBuildHasher::default())
    }
}

impl<K, V, S> KeyIndex<K, V, S> {
    pub fn with_buckets_and_hasher(bucket_count: usize, hasher: S) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);
        Self {
            buckets,
            len: 0,
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Average collision-list length (`len / bucket_count`).
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// All keys. The order is unspecified and callers must not rely on it.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// All entries, in the same unspecified order as [`KeyIndex::keys`].
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|e| (&e.key, &e.value)))
    }
}

impl<K, V, S> KeyIndex<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// Overwriting keeps the entry at its position in the collision list.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_of(&key);
        let bucket = &mut self.buckets[idx];
        if let Some(entry) = bucket.iter_mut().find(|e| e.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        bucket.push(Entry { key, value });
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|e| <K as Borrow<Q>>::borrow(&e.key) == key)
            .map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter_mut()
            .find(|e| <K as Borrow<Q>>::borrow(&e.key) == key)
            .map(|e| &mut e.value)
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_of(key);
        let bucket = &mut self.buckets[idx];
        let pos = bucket
            .iter()
            .position(|e| <K as Borrow<Q>>::borrow(&e.key) == key)?;
        self.len -= 1;
        Some(bucket.remove(pos).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K, V, S: Default> Default for KeyIndex<K, V, S> {
    fn default() -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for KeyIndex<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for KeyIndex<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}
