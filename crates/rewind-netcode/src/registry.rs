//! Session-wide controller registry for multi-entity consistency
//!
//! When a cross-entity event requires every predicted entity to rewind to
//! the same tick (or snap back to its latest known state), the registry
//! broadcasts the operation to everything registered. It is explicit
//! session state, not a global: create it with the session, register a
//! target when an entity spawns, deregister when it despawns, and only
//! ever drive it from the single-threaded tick driver.
//!
//! Heterogeneous entity kinds are bridged through the [`RollbackTarget`]
//! trait object; the per-tick controller paths stay monomorphic.

use indexmap::IndexMap;
use log::debug;
use rewind_core::Tick;

/// Handle returned by [`ControllerRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

/// A registered controller/entity pair the registry can rewind
///
/// Implementations typically bundle a `Controller<E>` with its entity and
/// forward to `Controller::rollback_to` / `Controller::reset_state`.
pub trait RollbackTarget {
    /// Snap the live simulation back to `tick` (or the nearest earlier
    /// retained state). Returns false if nothing near the tick remains.
    fn rollback_to(&mut self, tick: Tick) -> bool;

    /// Re-apply the latest known state. Returns false if none exists.
    fn reset_state(&mut self) -> bool;
}

/// Registry of every active rollback target in a session
#[derive(Default)]
pub struct ControllerRegistry {
    targets: IndexMap<ControllerId, Box<dyn RollbackTarget>>,
    next_id: u64,
}

impl ControllerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target, returning its handle
    pub fn register(&mut self, target: Box<dyn RollbackTarget>) -> ControllerId {
        let id = ControllerId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, target);
        id
    }

    /// Remove a target. Returns whether it was registered.
    pub fn deregister(&mut self, id: ControllerId) -> bool {
        self.targets.shift_remove(&id).is_some()
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if no targets are registered
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Rewind every registered target to `tick`, in registration order
    ///
    /// Returns how many targets had a state to roll back to.
    pub fn rollback_all(&mut self, tick: Tick) -> usize {
        let mut rolled_back = 0;
        for (id, target) in self.targets.iter_mut() {
            if target.rollback_to(tick) {
                rolled_back += 1;
            } else {
                debug!("Controller {:?} had no state near tick {}", id, tick);
            }
        }
        rolled_back
    }

    /// Snap every registered target back to its latest known state
    ///
    /// Returns how many targets had a state to apply.
    pub fn reset_all(&mut self) -> usize {
        self.targets
            .values_mut()
            .map(|target| target.reset_state())
            .filter(|applied| *applied)
            .count()
    }
}
