//! Error kinds surfaced by the table and its cursors.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A checked mutating call received an absent key and/or value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The table was structurally changed outside of the cursor.
    #[error("table modified outside of this cursor (expected {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },
    #[error("no further live entries")]
    IteratorExhausted,
    /// `remove` without an immediately preceding successful `next`.
    #[error("remove() requires a successful next() first")]
    IllegalIteratorState,
    #[error("table cannot place another entry at capacity {capacity}")]
    CapacityExceeded { capacity: usize },
    /// A cursor was handed a table other than the one it was created from.
    #[error("cursor used with a table it does not belong to")]
    WrongTable,
}
