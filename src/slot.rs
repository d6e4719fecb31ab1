//! Slot states of the backing array.

use core::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// One position of the slot array.
///
/// `Vacant` ends a probe chain; `Tombstone` does not, which is why a removed
/// entry leaves its key behind instead of reverting to `Vacant`.
#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    Vacant,
    Tombstone(K),
    Occupied(Entry<K, V>),
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    /// Turn a live slot into a tombstone and hand back its value.
    /// Returns `None`, leaving the slot untouched, if it is not live.
    pub(crate) fn bury(&mut self) -> Option<V> {
        if !self.is_live() {
            return None;
        }
        match mem::replace(self, Slot::Vacant) {
            Slot::Occupied(Entry { key, value }) => {
                *self = Slot::Tombstone(key);
                Some(value)
            }
            _ => unreachable!("slot checked live above"),
        }
    }

    /// Take the live entry out, used when the whole array is rebuilt.
    pub(crate) fn into_entry(self) -> Option<Entry<K, V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }
}

/// A fresh array of `len` vacant slots.
pub(crate) fn vacant_slots<K, V>(len: usize) -> Box<[Slot<K, V>]> {
    (0..len).map(|_| Slot::Vacant).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bury_keeps_key_and_returns_value() {
        let mut s = Slot::Occupied(Entry {
            key: "Drama",
            value: 3,
        });
        assert_eq!(s.bury(), Some(3));
        assert!(matches!(s, Slot::Tombstone("Drama")));
        assert!(!s.is_live());
        // A second bury is a no-op.
        assert_eq!(s.bury(), None);
        assert!(matches!(s, Slot::Tombstone("Drama")));
    }

    #[test]
    fn vacant_is_not_live() {
        let mut s: Slot<&str, i32> = Slot::Vacant;
        assert!(!s.is_live());
        assert!(s.entry().is_none());
        assert_eq!(s.bury(), None);
        assert!(matches!(s, Slot::Vacant));
    }

    #[test]
    fn vacant_slots_has_requested_len() {
        let slots: Box<[Slot<u8, u8>]> = vacant_slots(11);
        assert_eq!(slots.len(), 11);
        assert!(slots.iter().all(|s| matches!(s, Slot::Vacant)));
    }
}
