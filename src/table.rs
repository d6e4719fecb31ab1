//! TsbHashTable: open addressing with quadratic probing, tombstones and
//! prime-sized growth.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::prime::{next_prime, MAX_TABLE_SIZE};
use crate::probe::Probe;
use crate::slot::{vacant_slots, Entry, Slot};
use crate::views::{KeyView, PairView, ValueView};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};
use std::collections::hash_map::DefaultHasher;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a table instance, used by cursors to refuse foreign tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TableId(u64);

impl TableId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TableId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Outcome of a probe search.
enum Probed {
    /// A live entry with an equal key.
    Found(usize),
    /// Where the key would go: the first tombstone on the path, else the
    /// first vacant slot.
    Insert(usize),
    /// Every offset visited, no vacant slot and no tombstone.
    Full,
}

pub struct TsbHashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Box<[Slot<K, V>]>,
    count: usize,
    config: TableConfig,
    modifications: u64,
    id: TableId,
}

impl<K, V> TsbHashTable<K, V, DefaultHashBuilder> {
    /// Capacity 11, load factor 0.5.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self::with_config(
            TableConfig::default().with_initial_capacity(initial_capacity),
            DefaultHashBuilder::default(),
        )
    }

    pub fn with_capacity_and_load_factor(initial_capacity: usize, load_factor: f32) -> Self {
        Self::with_config(
            TableConfig {
                initial_capacity,
                load_factor,
            },
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V, S: Default> Default for TsbHashTable<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

// Structural accessors; none of these hash or compare keys.
impl<K, V, S> TsbHashTable<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config(TableConfig::default(), hasher)
    }

    /// Build a table from `config` after [`TableConfig::normalized`].
    pub fn with_config(config: TableConfig, hasher: S) -> Self {
        let config = config.normalized();
        Self {
            hasher,
            slots: vacant_slots(config.initial_capacity),
            count: 0,
            config,
            modifications: 0,
            id: TableId::next(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current length of the slot array. Always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Effective growth threshold, in `(0, 0.5]`.
    pub fn load_factor(&self) -> f32 {
        self.config.load_factor
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Counter bumped by every structural change: insertion of a new key,
    /// removal, `clear` and each rehash. Overwriting the value of a live key
    /// leaves it alone.
    pub fn modification_count(&self) -> u64 {
        self.modifications
    }

    /// Drop every entry and restore the initial capacity.
    pub fn clear(&mut self) {
        trace!(
            "clearing table: {} live entries, {} slots -> {}",
            self.count,
            self.slots.len(),
            self.config.initial_capacity
        );
        self.slots = vacant_slots(self.config.initial_capacity);
        self.count = 0;
        self.modifications += 1;
    }

    /// Live pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.count)
    }

    /// Live pairs in slot order, values mutable. Not a structural change.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.slots, self.count)
    }

    pub fn keys(&self) -> KeyView<&Self> {
        KeyView::new(self)
    }

    pub fn keys_mut(&mut self) -> KeyView<&mut Self> {
        KeyView::new(self)
    }

    pub fn values(&self) -> ValueView<&Self> {
        ValueView::new(self)
    }

    pub fn values_mut(&mut self) -> ValueView<&mut Self> {
        ValueView::new(self)
    }

    pub fn pairs(&self) -> PairView<&Self> {
        PairView::new(self)
    }

    pub fn pairs_mut(&mut self) -> PairView<&mut Self> {
        PairView::new(self)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    pub(crate) fn id(&self) -> TableId {
        self.id
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    /// Bury the live entry at `index`. Shared by `remove` and the cursors.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<V> {
        let value = self.slots.get_mut(index)?.bury()?;
        self.count -= 1;
        self.modifications += 1;
        Some(value)
    }

    /// Whether `count` live entries would reach the load factor.
    fn overloaded_at(&self, count: usize) -> bool {
        count as f64 / self.slots.len() as f64 >= f64::from(self.config.load_factor)
    }
}

impl<K, V, S> TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Walk the quadratic probe path of `q`.
    ///
    /// Tombstones never match, even when they still hold an equal key; the
    /// first one seen is preferred over any later vacant slot.
    fn probe<Q>(&self, q: &Q) -> Probed
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        let mut tombstone = None;
        for index in Probe::start(hash, self.slots.len()) {
            match &self.slots[index] {
                Slot::Vacant => return Probed::Insert(tombstone.unwrap_or(index)),
                Slot::Tombstone(_) => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Occupied(e) if e.key.borrow() == q => return Probed::Found(index),
                Slot::Occupied(_) => {}
            }
        }
        match tombstone {
            Some(index) => Probed::Insert(index),
            None => Probed::Full,
        }
    }

    fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.probe(q) {
            Probed::Found(index) => Some(index),
            _ => None,
        }
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(q)?;
        self.slots[index].entry().map(|e| &e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(q)?;
        self.slots[index].entry().map(|e| (&e.key, &e.value))
    }

    /// Mutable access to a live value. Not a structural change.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(q)?;
        self.slots[index].entry_mut().map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Insert or overwrite, returning the previous value of a live key.
    ///
    /// # Panics
    ///
    /// If the table would have to grow beyond
    /// [`MAX_TABLE_SIZE`](crate::MAX_TABLE_SIZE). Use
    /// [`put_checked`](Self::put_checked) to get the error instead.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.try_put(key, value) {
            Ok(previous) => previous,
            Err(e) => panic!("TsbHashTable::put: {e}"),
        }
    }

    /// `put` for callers holding possibly-missing fields.
    pub fn put_checked(
        &mut self,
        key: Option<K>,
        value: Option<V>,
    ) -> Result<Option<V>, TableError> {
        match (key, value) {
            (Some(key), Some(value)) => self.try_put(key, value),
            (None, None) => Err(TableError::InvalidArgument("key and value are absent")),
            (None, Some(_)) => Err(TableError::InvalidArgument("key is absent")),
            (Some(_), None) => Err(TableError::InvalidArgument("value is absent")),
        }
    }

    fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        match self.probe(&key) {
            Probed::Found(index) => match &mut self.slots[index] {
                Slot::Occupied(e) => Ok(Some(mem::replace(&mut e.value, value))),
                _ => unreachable!("probe reported a live match"),
            },
            Probed::Insert(index) => {
                // A table that cannot grow must be left untouched.
                let grow_to = if self.overloaded_at(self.count + 1) {
                    Some(grown_length(self.slots.len())?)
                } else {
                    None
                };
                self.slots[index] = Slot::Occupied(Entry { key, value });
                self.count += 1;
                self.modifications += 1;
                if let Some(new_len) = grow_to {
                    self.rehash_to(new_len)?;
                }
                Ok(None)
            }
            Probed::Full => Err(TableError::CapacityExceeded {
                capacity: self.slots.len(),
            }),
        }
    }

    pub fn put_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.put(key, value);
        }
    }

    /// Bury the live entry for `q` and return its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(q)?;
        self.remove_at(index)
    }

    /// `remove` for callers holding a possibly-missing key.
    pub fn remove_checked<Q>(&mut self, q: Option<&Q>) -> Result<Option<V>, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match q {
            Some(q) => Ok(self.remove(q)),
            None => Err(TableError::InvalidArgument("key is absent")),
        }
    }

    /// Write a key known to be absent, without growth checks. Used while
    /// rebuilding the slot array.
    fn place(&mut self, entry: Entry<K, V>) -> Result<(), TableError> {
        match self.probe(&entry.key) {
            Probed::Found(index) | Probed::Insert(index) => {
                self.slots[index] = Slot::Occupied(entry);
                self.count += 1;
                Ok(())
            }
            Probed::Full => Err(TableError::CapacityExceeded {
                capacity: self.slots.len(),
            }),
        }
    }

    #[cfg(test)]
    fn rehash(&mut self) -> Result<(), TableError> {
        let new_len = grown_length(self.slots.len())?;
        self.rehash_to(new_len)
    }

    /// Re-place every live entry, in slot order, into `new_len` vacant
    /// slots. Tombstones are dropped.
    fn rehash_to(&mut self, new_len: usize) -> Result<(), TableError> {
        let old_len = self.slots.len();
        debug!(
            "rehashing {} live entries: {} -> {} slots",
            self.count, old_len, new_len
        );

        let old = mem::replace(&mut self.slots, vacant_slots(new_len));
        self.count = 0;
        self.modifications += 1;
        for entry in old.into_vec().into_iter().filter_map(Slot::into_entry) {
            self.place(entry)?;
        }
        Ok(())
    }
}

/// Length of the slot array that replaces one of `old_len` slots.
fn grown_length(old_len: usize) -> Result<usize, TableError> {
    if old_len >= MAX_TABLE_SIZE {
        return Err(TableError::CapacityExceeded { capacity: old_len });
    }
    // old_len < MAX_TABLE_SIZE <= isize::MAX, so this cannot overflow.
    let target = 2 * old_len + 1;
    Ok(if target >= MAX_TABLE_SIZE {
        MAX_TABLE_SIZE
    } else {
        next_prime(target).min(MAX_TABLE_SIZE)
    })
}

impl<K, V, S1, S2> PartialEq<TsbHashTable<K, V, S2>> for TsbHashTable<K, V, S1>
where
    K: Eq + Hash,
    V: PartialEq,
    S2: BuildHasher,
{
    /// Same size, and every key maps to an equal value in `other`.
    fn eq(&self, other: &TsbHashTable<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

const PAIR_WEIGHTS: [u64; 6] = [1, 2, 3, 5, 7, 11];

impl<K: Hash, V: Hash, S> Hash for TsbHashTable<K, V, S> {
    /// Weighted sum of per-pair hashes divided by the size. The weight is
    /// picked from the pair's own hash, never its slot, so equal tables
    /// hash equally whatever their layout.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.count);
        if self.count == 0 {
            return;
        }
        let mut combined = 0u64;
        for (k, v) in self.iter() {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            v.hash(&mut h);
            let pair = h.finish();
            let weight = PAIR_WEIGHTS[(pair % PAIR_WEIGHTS.len() as u64) as usize];
            combined = combined.wrapping_add(weight.wrapping_mul(pair));
        }
        state.write_u64(combined / self.count as u64);
    }
}

impl<K, V, S> Clone for TsbHashTable<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Same length and configuration, tombstones dropped, counter at zero.
    fn clone(&self) -> Self {
        let mut table = Self {
            hasher: self.hasher.clone(),
            slots: vacant_slots(self.slots.len()),
            count: 0,
            config: self.config,
            modifications: 0,
            id: TableId::next(),
        };
        for (key, value) in self.iter() {
            table
                .place(Entry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .expect("clone has the length and load of its source");
        }
        table
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for TsbHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for TsbHashTable<K, V, S> {
    /// One `(key, value),` line per live pair, in slot order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{\n")?;
        for (k, v) in self.iter() {
            writeln!(f, "({k}, {v}),")?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> FromIterator<(K, V)> for TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.put_all(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for TsbHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<'a, K, V, S> IntoIterator for &'a TsbHashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut TsbHashTable<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for TsbHashTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.count)
    }
}
