//! Tick vocabulary for discrete-time simulation
//!
//! Everything in rewind is indexed by a `Tick`: a monotonically increasing
//! step counter. A 64-bit counter at 60 Hz outlasts the universe, so no
//! wraparound handling exists anywhere in the workspace.

use serde::{Deserialize, Serialize};

/// A discrete simulation step index (logical time unit)
pub type Tick = u64;

/// A tick-stamped record
///
/// The payload is opaque to the rollback machinery: an input snapshot,
/// a state snapshot, or anything else a history stream needs to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// The tick this record belongs to
    pub tick: Tick,
    /// The recorded payload
    pub data: T,
}

impl<T> Entry<T> {
    /// Create a new entry
    pub fn new(tick: Tick, data: T) -> Self {
        Self { tick, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new() {
        let entry = Entry::new(42, "payload");
        assert_eq!(entry.tick, 42);
        assert_eq!(entry.data, "payload");
    }
}
