//! Transport seam between controllers and the network layer
//!
//! The core never touches sockets. A controller hands outgoing traffic to
//! an injected [`Transport`] synchronously at well-defined points in the
//! tick; delivery ordering, reliability, and the wire format are entirely
//! the transport's responsibility.

use rewind_core::Tick;
use serde::{Deserialize, Serialize};

/// Envelope for controller traffic
///
/// A ready-made payload shape for transports that want one. Transports
/// are free to ignore it and define their own framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message<I, S> {
    /// Owner to authority: the input for a tick plus the state the owner
    /// predicted after applying it
    Input {
        /// Owner-local tick the input belongs to
        tick: Tick,
        /// The gathered input
        input: I,
        /// The owner's predicted state after simulating the input
        claimed: S,
    },
    /// Authority to owner: authoritative state for a diverged tick
    Correction {
        /// The tick that diverged
        tick: Tick,
        /// The authoritative state at that tick
        state: S,
    },
}

/// Outgoing side of a controller's network connection
///
/// Both methods are invoked synchronously from the tick callbacks. A
/// returned error is logged by the controller and otherwise ignored;
/// retry and reliability live below this seam.
pub trait Transport<I, S> {
    /// Error type for this transport
    type Error: std::error::Error;

    /// Send an owner's (tick, input, claimed state) tuple to the authority
    fn send_input(&mut self, tick: Tick, input: &I, claimed: &S) -> Result<(), Self::Error>;

    /// Send an authoritative correction back to the owning client
    fn send_correction(&mut self, tick: Tick, state: &S) -> Result<(), Self::Error>;
}
