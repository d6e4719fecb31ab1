//! Construction parameters for [`TsbHashTable`](crate::TsbHashTable).

use crate::prime::{next_prime, MAX_TABLE_SIZE};
use log::warn;

pub const DEFAULT_INITIAL_CAPACITY: usize = 11;
/// Also the ceiling: quadratic probing is only guaranteed to find a free
/// slot while at most half of a prime-length table is live.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Bring both parameters into the range the table can honour.
    ///
    /// - capacity `0` becomes the default; anything else is capped at
    ///   [`MAX_TABLE_SIZE`] and rounded up to a prime.
    /// - a load factor that is not a positive finite number becomes the
    ///   default; one above the default is clamped down to it.
    pub fn normalized(self) -> Self {
        let initial_capacity = if self.initial_capacity == 0 {
            warn!("initial capacity 0 replaced by {DEFAULT_INITIAL_CAPACITY}");
            DEFAULT_INITIAL_CAPACITY
        } else {
            next_prime(self.initial_capacity.min(MAX_TABLE_SIZE))
        };

        let load_factor = if !(self.load_factor.is_finite() && self.load_factor > 0.0) {
            warn!(
                "load factor {} replaced by {DEFAULT_LOAD_FACTOR}",
                self.load_factor
            );
            DEFAULT_LOAD_FACTOR
        } else if self.load_factor > DEFAULT_LOAD_FACTOR {
            warn!(
                "load factor {} clamped to {DEFAULT_LOAD_FACTOR}",
                self.load_factor
            );
            DEFAULT_LOAD_FACTOR
        } else {
            self.load_factor
        };

        Self {
            initial_capacity,
            load_factor,
        }
    }
}
