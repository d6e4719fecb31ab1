//! tsb-hashtable: a single-threaded associative container built on open
//! addressing with quadratic probing, tombstones and prime-sized growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map whose growth and deletion policy is explicit and
//!   observable, with iteration that reports external modification
//!   instead of silently yielding stale entries.
//! - Layers:
//!   - `prime`: `next_prime` and `MAX_TABLE_SIZE`; every slot array length
//!     comes from here.
//!   - `probe`: the quadratic offset sequence `(base + i²) mod len`.
//!   - `slot`: the tri-state slot (`Vacant` / `Tombstone` / `Occupied`).
//!   - `table`: `TsbHashTable<K, V, S>`, which owns the slot array, the live
//!     count, the load factor and the modification counter.
//!   - `views`, `cursor`, `iter`: key, value and pair windows over a table,
//!     fail-fast cursors, and ordinary borrowing iterators.
//!   - `map`: the `AssociativeMap` trait collaborators program against.
//!
//! Probing and growth invariants
//! - The slot array length is always prime and never above
//!   `MAX_TABLE_SIZE`.
//! - After every mutating call, `len <= capacity / 2`. A `put` that makes
//!   `len / capacity` reach the load factor rehashes to
//!   `next_prime(2 * capacity + 1)` before returning.
//! - With a prime length and at most half of the slots live, the first
//!   `(len + 1) / 2` quadratic offsets are distinct, so a probe always
//!   reaches either a vacant slot or a tombstone. The load factor is
//!   therefore clamped to at most 0.5.
//!
//! Deletion
//! - `remove` turns a slot into a tombstone holding the key, and hands the
//!   value back. Tombstones do not end a probe chain, so entries placed
//!   past them stay reachable.
//! - A tombstone is reclaimed by the next insertion whose probe path
//!   crosses it first, or dropped when the table is rebuilt (`rehash`,
//!   `clear`).
//!
//! Fail-fast iteration
//! - The table keeps a `u64` counter that is bumped by every structural
//!   change: a new key, a removal, `clear`, and each rehash. Overwriting the
//!   value of a live key is not structural and leaves it alone.
//! - Cursors (`KeyCursor`, `ValueCursor`, `PairCursor`) hold no borrow. They
//!   snapshot the counter and compare it on every `next`, so mutating the
//!   table between steps surfaces as `TableError::ConcurrentModification`.
//! - Borrowing iterators (`iter`, `keys().iter()`, ...) need no check: the
//!   borrow already rules out mutation while they live.
//!
//! Notes and non-goals
//! - Single-threaded; there is no internal synchronization.
//! - No persistence or serialization of table contents. With the `serde`
//!   feature only `TableConfig` is (de)serializable.
//! - `put` panics if growth would exceed `MAX_TABLE_SIZE`, as std
//!   collections do on capacity overflow; `put_checked` reports it.

pub mod config;
pub mod cursor;
mod error;
pub mod iter;
mod map;
pub mod prime;
mod probe;
mod slot;
mod table;
mod table_proptest;
pub mod views;

// Public surface
pub use config::TableConfig;
pub use cursor::{CursorState, KeyCursor, PairCursor, ValueCursor};
pub use error::TableError;
pub use map::AssociativeMap;
pub use prime::{next_prime, MAX_TABLE_SIZE};
pub use table::TsbHashTable;
pub use views::{KeyView, PairView, ValueView};
