//! Capability contract between the rollback core and a concrete simulation
//!
//! This trait is what a predicted entity implements so that
//! `rewind-netcode` can drive it: gather an input, advance the live
//! simulation by one tick, snapshot the resulting state, and snap back to
//! an authoritative state during reconciliation.
//!
//! The contract is compile-time polymorphic: each entity kind implements
//! the trait with its own `Input`/`State` types, and the controller is
//! monomorphized over it. No runtime callback wiring.
//!
//! # Example
//!
//! ```rust
//! use rewind_core::Simulated;
//!
//! struct Counter {
//!     value: i64,
//! }
//!
//! impl Simulated for Counter {
//!     type Input = i64;
//!     type State = i64;
//!
//!     fn gather_input(&mut self) -> i64 {
//!         1
//!     }
//!
//!     fn gather_state(&self) -> i64 {
//!         self.value
//!     }
//!
//!     fn simulate(&mut self, input: Option<&i64>, _dt: f64, _replay: bool) {
//!         self.value += input.copied().unwrap_or_default();
//!     }
//!
//!     fn apply_state(&mut self, state: &i64) {
//!         self.value = *state;
//!     }
//!
//!     fn states_match(a: &i64, b: &i64) -> bool {
//!         a == b
//!     }
//! }
//! ```

/// Contract for an entity driven by prediction and reconciliation.
///
/// `simulate` must be deterministic: identical (starting state, input, dt)
/// must always produce the identical resulting state, otherwise replay
/// after a correction cannot converge.
pub trait Simulated {
    /// One tick's worth of input. `Default` is the "no input arrived"
    /// substitute used for dropped packets and replay gaps.
    type Input: Clone + Default;

    /// A full snapshot of the entity's simulation state.
    type State: Clone;

    /// Collect the input for the current tick (owning client only).
    fn gather_input(&mut self) -> Self::Input;

    /// Snapshot the current live state.
    fn gather_state(&self) -> Self::State;

    /// Advance the live simulation by one tick.
    ///
    /// `input` is `None` when the tick is simulated without a buffered
    /// input (dropped packet on the server). `replay` is true while
    /// re-simulating after a correction; one-shot side effects (sounds,
    /// particles, triggers) should be suppressed when it is set.
    fn simulate(&mut self, input: Option<&Self::Input>, dt: f64, replay: bool);

    /// Hard-overwrite the live state (teleport/snap).
    fn apply_state(&mut self, state: &Self::State);

    /// Divergence check with caller-defined tolerance.
    ///
    /// Never compare states bit-exactly here; floating-point drift between
    /// client and server would cause spurious corrections.
    fn states_match(a: &Self::State, b: &Self::State) -> bool;
}
