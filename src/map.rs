//! The associative-container contract collaborators program against.

use crate::table::TsbHashTable;
use core::hash::{BuildHasher, Hash};

/// Insert, look up and remove by key.
///
/// Implemented by [`TsbHashTable`] and by `hashbrown::HashMap`, so code that
/// aggregates records by key can run against either.
pub trait AssociativeMap<K, V> {
    /// Number of live entries.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq;

    /// Insert or overwrite; returns the previous value for `key`.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn put_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        Self: Sized,
    {
        for (key, value) in pairs {
            self.put(key, value);
        }
    }

    fn clear(&mut self);
}

impl<K, V, S> AssociativeMap<K, V> for TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn size(&self) -> usize {
        self.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        TsbHashTable::get(self, key)
    }

    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        TsbHashTable::contains_value(self, value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        TsbHashTable::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        TsbHashTable::remove(self, key)
    }

    fn clear(&mut self) {
        TsbHashTable::clear(self);
    }
}

impl<K, V, S> AssociativeMap<K, V> for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn size(&self) -> usize {
        self.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        hashbrown::HashMap::get(self, key)
    }

    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        hashbrown::HashMap::remove(self, key)
    }

    fn clear(&mut self) {
        hashbrown::HashMap::clear(self);
    }
}

impl<K, V, S> TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Table equality against any other map: same size, and every key maps
    /// to an equal value in `other`.
    pub fn map_eq<M>(&self, other: &M) -> bool
    where
        M: AssociativeMap<K, V>,
        V: PartialEq,
    {
        self.len() == other.size() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}
