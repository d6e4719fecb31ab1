//! Fail-fast cursors.
//!
//! A cursor holds no borrow of its table; each step takes the table as an
//! argument. That lets callers mutate the table between steps, and the
//! cursor then notices: it snapshots the table's modification counter on
//! creation and re-checks it on every `next`, failing with
//! [`TableError::ConcurrentModification`] instead of yielding entries from a
//! table that changed shape. Removal through the cursor itself is accounted
//! for and does not trip the check.
//!
//! State machine:
//!
//! ```text
//!            next ok                    remove ok
//! Created ───────────▶ PositionedAfterNext ─────────▶ Removed
//!    │                   ▲        │                     │
//!    │                   └────────┘ next ok             │ next ok
//!    │ next: none left                                  ▼
//!    └──────────────────────────▶ Exhausted   PositionedAfterNext
//! ```

use crate::error::TableError;
use crate::slot::{Entry, Slot};
use crate::table::{TableId, TsbHashTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Created,
    PositionedAfterNext,
    Removed,
    Exhausted,
}

#[derive(Debug, Clone)]
struct RawCursor {
    table: TableId,
    expected: u64,
    // Slot of the entry returned by the last `next`; `None` is before the
    // first slot.
    position: Option<usize>,
    // Position held before the last `next`, restored by `remove`.
    previous: Option<usize>,
    state: CursorState,
}

impl RawCursor {
    fn new<K, V, S>(table: &TsbHashTable<K, V, S>) -> Self {
        Self {
            table: table.id(),
            expected: table.modification_count(),
            position: None,
            previous: None,
            state: CursorState::Created,
        }
    }

    fn check_owner<K, V, S>(&self, table: &TsbHashTable<K, V, S>) -> Result<(), TableError> {
        if table.id() == self.table {
            Ok(())
        } else {
            Err(TableError::WrongTable)
        }
    }

    fn check_modifications<K, V, S>(
        &self,
        table: &TsbHashTable<K, V, S>,
    ) -> Result<(), TableError> {
        let found = table.modification_count();
        if found == self.expected {
            Ok(())
        } else {
            Err(TableError::ConcurrentModification {
                expected: self.expected,
                found,
            })
        }
    }

    /// Index of the next live slot after `position`, if any.
    fn peek<K, V>(&self, slots: &[Slot<K, V>]) -> Option<usize> {
        let start = self.position.map_or(0, |p| p + 1);
        slots
            .get(start..)?
            .iter()
            .position(Slot::is_live)
            .map(|offset| start + offset)
    }

    fn has_next<K, V, S>(&self, table: &TsbHashTable<K, V, S>) -> bool {
        table.id() == self.table && self.peek(table.slots()).is_some()
    }

    fn advance<'t, K, V, S>(
        &mut self,
        table: &'t TsbHashTable<K, V, S>,
    ) -> Result<&'t Entry<K, V>, TableError> {
        self.check_owner(table)?;
        self.check_modifications(table)?;
        let slots = table.slots();
        let Some(index) = self.peek(slots) else {
            self.state = CursorState::Exhausted;
            return Err(TableError::IteratorExhausted);
        };
        self.previous = self.position;
        self.position = Some(index);
        self.state = CursorState::PositionedAfterNext;
        slots[index].entry().ok_or(TableError::IteratorExhausted)
    }

    fn remove<K, V, S>(&mut self, table: &mut TsbHashTable<K, V, S>) -> Result<V, TableError> {
        self.check_owner(table)?;
        if self.state != CursorState::PositionedAfterNext {
            return Err(TableError::IllegalIteratorState);
        }
        self.check_modifications(table)?;
        let index = self.position.ok_or(TableError::IllegalIteratorState)?;
        let value = table
            .remove_at(index)
            .ok_or(TableError::IllegalIteratorState)?;
        // Our own removal bumped the table's counter exactly once.
        self.expected += 1;
        debug_assert_eq!(self.expected, table.modification_count());
        self.position = self.previous;
        self.state = CursorState::Removed;
        Ok(value)
    }
}

/// Fail-fast cursor yielding keys.
#[derive(Debug, Clone)]
pub struct KeyCursor {
    raw: RawCursor,
}

impl KeyCursor {
    pub(crate) fn new<K, V, S>(table: &TsbHashTable<K, V, S>) -> Self {
        Self {
            raw: RawCursor::new(table),
        }
    }

    pub fn state(&self) -> CursorState {
        self.raw.state
    }

    /// Whether a live entry lies ahead. Does not move the cursor.
    pub fn has_next<K, V, S>(&self, table: &TsbHashTable<K, V, S>) -> bool {
        self.raw.has_next(table)
    }

    pub fn next<'t, K, V, S>(
        &mut self,
        table: &'t TsbHashTable<K, V, S>,
    ) -> Result<&'t K, TableError> {
        self.raw.advance(table).map(|e| &e.key)
    }

    /// Remove the entry last returned by `next`, yielding its value.
    pub fn remove<K, V, S>(
        &mut self,
        table: &mut TsbHashTable<K, V, S>,
    ) -> Result<V, TableError> {
        self.raw.remove(table)
    }
}

/// Fail-fast cursor yielding values.
#[derive(Debug, Clone)]
pub struct ValueCursor {
    raw: RawCursor,
}

impl ValueCursor {
    pub(crate) fn new<K, V, S>(table: &TsbHashTable<K, V, S>) -> Self {
        Self {
            raw: RawCursor::new(table),
        }
    }

    pub fn state(&self) -> CursorState {
        self.raw.state
    }

    pub fn has_next<K, V, S>(&self, table: &TsbHashTable<K, V, S>) -> bool {
        self.raw.has_next(table)
    }

    pub fn next<'t, K, V, S>(
        &mut self,
        table: &'t TsbHashTable<K, V, S>,
    ) -> Result<&'t V, TableError> {
        self.raw.advance(table).map(|e| &e.value)
    }

    pub fn remove<K, V, S>(
        &mut self,
        table: &mut TsbHashTable<K, V, S>,
    ) -> Result<V, TableError> {
        self.raw.remove(table)
    }
}

/// Fail-fast cursor yielding `(key, value)` pairs.
#[derive(Debug, Clone)]
pub struct PairCursor {
    raw: RawCursor,
}

impl PairCursor {
    pub(crate) fn new<K, V, S>(table: &TsbHashTable<K, V, S>) -> Self {
        Self {
            raw: RawCursor::new(table),
        }
    }

    pub fn state(&self) -> CursorState {
        self.raw.state
    }

    pub fn has_next<K, V, S>(&self, table: &TsbHashTable<K, V, S>) -> bool {
        self.raw.has_next(table)
    }

    pub fn next<'t, K, V, S>(
        &mut self,
        table: &'t TsbHashTable<K, V, S>,
    ) -> Result<(&'t K, &'t V), TableError> {
        self.raw.advance(table).map(|e| (&e.key, &e.value))
    }

    pub fn remove<K, V, S>(
        &mut self,
        table: &mut TsbHashTable<K, V, S>,
    ) -> Result<V, TableError> {
        self.raw.remove(table)
    }
}
