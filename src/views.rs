//! Key, value and pair views.
//!
//! A view is a window over a borrowed table and keeps no data of its own:
//! every query and removal goes straight through to the table. Views over
//! `&TsbHashTable` are read-only; views over `&mut TsbHashTable` can also
//! remove entries and clear the table.

use crate::cursor::{KeyCursor, PairCursor, ValueCursor};
use crate::iter::{Iter, Keys, Values};
use crate::table::TsbHashTable;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::ops::{Deref, DerefMut};

pub struct KeyView<T> {
    table: T,
}

impl<T> KeyView<T> {
    pub(crate) fn new(table: T) -> Self {
        Self { table }
    }
}

impl<K, V, S, T> KeyView<T>
where
    T: Deref<Target = TsbHashTable<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Keys<'a, K, V>
    where
        S: 'a,
    {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// A fresh fail-fast cursor positioned before the first slot.
    pub fn cursor(&self) -> KeyCursor {
        KeyCursor::new(&*self.table)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        self.table.contains_key(q)
    }
}

impl<K, V, S, T> KeyView<T>
where
    T: DerefMut<Target = TsbHashTable<K, V, S>>,
{
    /// Remove the entry for `q`; true if one was live.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        self.table.remove(q).is_some()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<'a, K, V, S> IntoIterator for KeyView<&'a TsbHashTable<K, V, S>> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Keys {
            inner: self.table.iter(),
        }
    }
}

pub struct ValueView<T> {
    table: T,
}

impl<T> ValueView<T> {
    pub(crate) fn new(table: T) -> Self {
        Self { table }
    }
}

impl<K, V, S, T> ValueView<T>
where
    T: Deref<Target = TsbHashTable<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Values<'a, K, V>
    where
        S: 'a,
    {
        Values {
            inner: self.table.iter(),
        }
    }

    pub fn cursor(&self) -> ValueCursor {
        ValueCursor::new(&*self.table)
    }

    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.contains_value(value)
    }
}

impl<K, V, S, T> ValueView<T>
where
    T: DerefMut<Target = TsbHashTable<K, V, S>>,
{
    /// Remove the first live entry, in slot order, holding `value`.
    pub fn remove(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let index = self
            .table
            .slots()
            .iter()
            .position(|s| s.entry().is_some_and(|e| &e.value == value));
        match index {
            Some(index) => self.table.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<'a, K, V, S> IntoIterator for ValueView<&'a TsbHashTable<K, V, S>> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Values {
            inner: self.table.iter(),
        }
    }
}

pub struct PairView<T> {
    table: T,
}

impl<T> PairView<T> {
    pub(crate) fn new(table: T) -> Self {
        Self { table }
    }
}

impl<K, V, S, T> PairView<T>
where
    T: Deref<Target = TsbHashTable<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Iter<'a, K, V>
    where
        S: 'a,
    {
        self.table.iter()
    }

    pub fn cursor(&self) -> PairCursor {
        PairCursor::new(&*self.table)
    }

    /// True iff `key` is live and maps to a value equal to `value`.
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
        S: BuildHasher,
    {
        self.table.get(key) == Some(value)
    }
}

impl<K, V, S, T> PairView<T>
where
    T: DerefMut<Target = TsbHashTable<K, V, S>>,
{
    /// Remove `key` only if it currently maps to `value`.
    pub fn remove<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
        S: BuildHasher,
    {
        if self.table.get(key) != Some(value) {
            return false;
        }
        self.table.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<'a, K, V, S> IntoIterator for PairView<&'a TsbHashTable<K, V, S>> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::TsbHashTable;
    use std::collections::BTreeSet;

    fn genres() -> TsbHashTable<String, u32> {
        [("Drama", 2), ("Comedy", 5), ("Action", 5)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn views_track_table_size() {
        let mut t = genres();
        assert_eq!(t.keys().len(), 3);
        assert_eq!(t.values().len(), 3);
        assert_eq!(t.pairs().len(), 3);
        t.remove("Drama");
        assert_eq!(t.keys().len(), 2);
        assert!(!t.pairs().is_empty());
    }

    #[test]
    fn key_view_contains_and_removes() {
        let mut t = genres();
        assert!(t.keys().contains("Comedy"));
        assert!(t.keys_mut().remove("Comedy"));
        assert!(!t.keys_mut().remove("Comedy"));
        assert!(!t.keys().contains("Comedy"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn value_view_removes_first_match_only() {
        let mut t = genres();
        assert!(t.values().contains(&5));
        assert!(t.values_mut().remove(&5));
        assert_eq!(t.len(), 2);
        // One of the two 5s is left.
        assert!(t.values().contains(&5));
        assert!(t.values_mut().remove(&5));
        assert!(!t.values().contains(&5));
        assert!(!t.values_mut().remove(&5));
    }

    #[test]
    fn pair_view_requires_exact_pair() {
        let mut t = genres();
        assert!(t.pairs().contains("Drama", &2));
        assert!(!t.pairs().contains("Drama", &3));
        assert!(!t.pairs_mut().remove("Drama", &3));
        assert_eq!(t.get("Drama"), Some(&2));
        assert!(t.pairs_mut().remove("Drama", &2));
        assert_eq!(t.get("Drama"), None);
    }

    #[test]
    fn clear_through_any_view_empties_table() {
        let mut t = genres();
        t.keys_mut().clear();
        assert!(t.is_empty());
        assert_eq!(t.capacity(), 11);

        let mut t = genres();
        t.values_mut().clear();
        assert!(t.is_empty());

        let mut t = genres();
        t.pairs_mut().clear();
        assert!(t.is_empty());
    }

    #[test]
    fn views_iterate_live_entries() {
        let t = genres();
        let keys: BTreeSet<&str> = t.keys().into_iter().map(String::as_str).collect();
        assert_eq!(keys, BTreeSet::from(["Action", "Comedy", "Drama"]));
        let total: u32 = t.values().iter().sum();
        assert_eq!(total, 12);
        assert_eq!(t.pairs().iter().count(), 3);
    }
}
