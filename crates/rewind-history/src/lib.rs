//! Rewind History - tick-indexed storage with bounded memory
//!
//! This crate provides the ordered, tick-indexed buffer that backs both
//! input and state streams in a predicted simulation.
//!
//! # Features
//!
//! - **Sorted by tick**: entries stay strictly ascending, no duplicates
//! - **O(log n) lookup**: binary search over a dense sorted sequence
//! - **Soft-bounded memory**: pruning is deferred until a cut threshold,
//!   then trims back to capacity in one pass
//! - **Past/future truncation**: drop everything before or after a tick
//!
//! # Example
//!
//! ```rust
//! use rewind_history::History;
//!
//! // Keep roughly the last 128 ticks
//! let mut history: History<f32> = History::with_capacity(128);
//!
//! history.write(0, 1.0);
//! history.write(1, 2.0);
//! history.write(2, 4.0);
//!
//! assert_eq!(history.read(1), Some(&2.0));
//! assert_eq!(history.read(7), None);
//!
//! // Overwriting a tick replaces in place
//! history.write(1, 3.0);
//! assert_eq!(history.read(1), Some(&3.0));
//! assert_eq!(history.len(), 3);
//! ```

use std::ops::{Index, IndexMut};

use rewind_core::{Entry, Tick};
use serde::{Deserialize, Serialize};

/// Fixed slack added to the capacity before the first prune can trigger.
/// Small capacities would otherwise prune on nearly every write.
const PRUNE_SLACK: usize = 10;

/// An ordered, tick-indexed buffer of entries
///
/// Entries are kept strictly ascending by tick with at most one entry per
/// tick. With a capacity the buffer is *soft-bounded*: writes are allowed
/// to overshoot until the cut threshold
/// (`max(capacity + 10, capacity * 1.5)`) is reached, at which point the
/// oldest entries are pruned so exactly `capacity` remain. The hysteresis
/// amortizes the O(n) front-drain across many appends instead of paying
/// it on every write.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<Entry<T>>,
    capacity: Option<usize>,
}

impl<T> History<T> {
    /// Create an unbounded history (no pruning ever happens)
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            capacity: None,
        }
    }

    /// Create a soft-bounded history
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries retained after a prune
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            entries: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Size at which the next write triggers a prune, `None` if unbounded
    pub fn cut_threshold(&self) -> Option<usize> {
        self.capacity.map(|c| (c + PRUNE_SLACK).max(c + c / 2))
    }

    /// Write `data` at `tick`
    ///
    /// An existing entry for the tick is overwritten in place; otherwise
    /// the entry is inserted at its sorted position. Any tick value is
    /// accepted, including ones older than everything stored.
    pub fn write(&mut self, tick: Tick, data: T) {
        match self.find(tick) {
            Ok(index) => self.entries[index].data = data,
            Err(index) => {
                self.entries.insert(index, Entry::new(tick, data));
                if let (Some(capacity), Some(cut)) = (self.capacity, self.cut_threshold()) {
                    if self.entries.len() >= cut {
                        let excess = self.entries.len() - capacity;
                        self.entries.drain(..excess);
                    }
                }
            }
        }
    }

    /// Read the data stored at exactly `tick`
    ///
    /// Returns `None` if the tick was pruned, never written, or not yet
    /// received.
    pub fn read(&self, tick: Tick) -> Option<&T> {
        self.find(tick).ok().map(|index| &self.entries[index].data)
    }

    /// Locate `tick` by binary search
    ///
    /// `Ok(index)` is the position of the entry with that exact tick.
    /// `Err(index)` is the insertion point: every entry before it has a
    /// smaller tick. Either index is invalidated by the next mutation.
    pub fn find(&self, tick: Tick) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&tick, |entry| entry.tick)
    }

    /// Get the entry at a raw position
    pub fn entry(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    /// Get the entry at a raw position, mutably
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry<T>> {
        self.entries.get_mut(index)
    }

    /// Tick of the entry at a raw position
    pub fn tick_at(&self, index: usize) -> Option<Tick> {
        self.entries.get(index).map(|entry| entry.tick)
    }

    /// The entry at or immediately before `tick`
    ///
    /// Useful for rollback when the exact tick is not retained.
    pub fn at_or_before(&self, tick: Tick) -> Option<&Entry<T>> {
        match self.find(tick) {
            Ok(index) => Some(&self.entries[index]),
            Err(0) => None,
            Err(index) => Some(&self.entries[index - 1]),
        }
    }

    /// Remove every entry before `tick`
    ///
    /// With `inclusive`, the entry at `tick` itself is removed too. If the
    /// tick is absent, everything before its would-be position goes.
    pub fn clear_past(&mut self, tick: Tick, inclusive: bool) {
        let cut = match self.find(tick) {
            Ok(index) => {
                if inclusive {
                    index + 1
                } else {
                    index
                }
            }
            Err(index) => index,
        };
        self.entries.drain(..cut);
    }

    /// Remove every entry after `tick`
    ///
    /// With `inclusive`, the entry at `tick` itself is removed too. If the
    /// tick is absent, everything from its would-be position onward goes.
    pub fn clear_future(&mut self, tick: Tick, inclusive: bool) {
        let keep = match self.find(tick) {
            Ok(index) => {
                if inclusive {
                    index
                } else {
                    index + 1
                }
            }
            Err(index) => index,
        };
        self.entries.truncate(keep);
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained-entry limit, `None` if unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Tick of the first (oldest) entry
    pub fn oldest_tick(&self) -> Option<Tick> {
        self.entries.first().map(|entry| entry.tick)
    }

    /// Tick of the last (most recent) entry
    pub fn newest_tick(&self) -> Option<Tick> {
        self.entries.last().map(|entry| entry.tick)
    }

    /// Iterate entries oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    /// Snapshot of the buffer's occupancy
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            capacity: self.capacity,
            len: self.entries.len(),
            oldest_tick: self.oldest_tick(),
            newest_tick: self.newest_tick(),
        }
    }
}

impl<T> Default for History<T> {
    /// Create an unbounded history
    fn default() -> Self {
        Self::new()
    }
}

/// Raw data access by position (see [`History::find`] for valid indices)
impl<T> Index<usize> for History<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entries[index].data
    }
}

impl<T> IndexMut<usize> for History<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.entries[index].data
    }
}

/// Statistics about a history buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Retained-entry limit, `None` if unbounded
    pub capacity: Option<usize>,
    /// Current number of stored entries
    pub len: usize,
    /// Oldest stored tick
    pub oldest_tick: Option<Tick>,
    /// Newest stored tick
    pub newest_tick: Option<Tick>,
}

impl HistoryStats {
    /// Distance in ticks between the oldest and newest entries
    pub fn tick_span(&self) -> u64 {
        match (self.oldest_tick, self.newest_tick) {
            (Some(oldest), Some(newest)) => newest - oldest,
            _ => 0,
        }
    }

    /// Fill percentage (0.0 to 1.0), `None` if unbounded
    pub fn fill_ratio(&self) -> Option<f32> {
        self.capacity.map(|c| self.len as f32 / c as f32)
    }
}
