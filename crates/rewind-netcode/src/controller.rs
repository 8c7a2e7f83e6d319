//! Per-entity controller: role state and the owner's tick protocol
//!
//! A controller holds the two history streams for one entity and runs the
//! side of the protocol its role dictates. The owner path lives here; the
//! authority path is in `authority`, reconciliation delivery in
//! `reconcile`.
//!
//! The tick driver invokes `pre_tick` then `post_tick` once per frame, in
//! that order, never overlapping. Nothing in here blocks or performs I/O;
//! outgoing traffic goes through the injected [`Transport`] synchronously.

use log::warn;
use serde::{Deserialize, Serialize};

use rewind_core::{Simulated, Tick};
use rewind_history::History;

use crate::{ControllerConfig, Transport};

/// Which side of the session a controller plays
///
/// Exactly one role is active per process for a given entity; the role is
/// assigned externally when the network session is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Predicting client that owns the entity's input
    Owner,
    /// Authoritative server
    Authority,
    /// Neither: a spectator applying whatever states arrive
    Observer,
}

/// Prediction/reconciliation state for a single entity
///
/// Owns an input history and a state history, never shared. On the owner
/// the histories hold gathered inputs and predicted states; on the
/// authority they hold the client's submitted inputs and claimed states
/// (overwritten with authoritative states as the cursor passes them).
pub struct Controller<E: Simulated> {
    pub(crate) role: Role,
    pub(crate) config: ControllerConfig,
    pub(crate) inputs: History<E::Input>,
    pub(crate) states: History<E::State>,
    /// Authority cursor: next tick to simulate authoritatively
    pub(crate) server_tick: Tick,
    /// Owner: last tick simulated locally
    pub(crate) local_tick: Tick,
    /// Owner: newest tick the authority has confirmed or corrected
    pub(crate) confirmed_tick: Tick,
    /// Reconciliation re-entrancy latch
    pub(crate) replaying: bool,
}

impl<E: Simulated> Controller<E> {
    /// Create a controller for the given role
    pub fn new(role: Role, config: ControllerConfig) -> Self {
        let capacity = config.history_capacity();
        Self {
            role,
            config,
            inputs: History::with_capacity(capacity),
            states: History::with_capacity(capacity),
            server_tick: 0,
            local_tick: 0,
            confirmed_tick: 0,
            replaying: false,
        }
    }

    /// Owner pre-tick: gather input, simulate live, record the input
    ///
    /// `tick` is the transport-reported local tick for this frame. No-op
    /// for non-owner roles.
    pub fn pre_tick(&mut self, entity: &mut E, tick: Tick) {
        if self.role != Role::Owner {
            return;
        }
        let input = entity.gather_input();
        entity.simulate(Some(&input), self.config.tick_dt(), false);
        self.inputs.write(tick, input);
        self.local_tick = tick;
    }

    /// Owner post-tick: record the resulting state and transmit the
    /// (tick, input, state) tuple
    ///
    /// No-op for non-owner roles or before the first `pre_tick`.
    pub fn post_tick<T: Transport<E::Input, E::State>>(&mut self, entity: &mut E, transport: &mut T) {
        if self.role != Role::Owner {
            return;
        }
        let tick = self.local_tick;
        let input = match self.inputs.read(tick) {
            Some(input) => input.clone(),
            None => return,
        };
        let state = entity.gather_state();
        self.states.write(tick, state.clone());
        if let Err(err) = transport.send_input(tick, &input, &state) {
            warn!("Failed to send input for tick {}: {}", tick, err);
        }
    }

    /// Ticks the owner is running ahead of the newest confirmation
    pub fn prediction_depth(&self) -> u64 {
        self.local_tick.saturating_sub(self.confirmed_tick)
    }

    /// The controller's role
    pub fn role(&self) -> Role {
        self.role
    }

    /// The controller's configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Authority cursor: next tick to be simulated authoritatively
    pub fn server_tick(&self) -> Tick {
        self.server_tick
    }

    /// Owner: last locally simulated tick
    pub fn local_tick(&self) -> Tick {
        self.local_tick
    }

    /// The buffered input stream
    pub fn inputs(&self) -> &History<E::Input> {
        &self.inputs
    }

    /// The buffered input stream, mutably
    pub fn inputs_mut(&mut self) -> &mut History<E::Input> {
        &mut self.inputs
    }

    /// The recorded state stream
    pub fn states(&self) -> &History<E::State> {
        &self.states
    }

    /// The recorded state stream, mutably
    pub fn states_mut(&mut self) -> &mut History<E::State> {
        &mut self.states
    }

    /// Drop all buffered history and tick bookkeeping
    ///
    /// The live entity is untouched; only the controller forgets.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.states.clear();
        self.server_tick = 0;
        self.local_tick = 0;
        self.confirmed_tick = 0;
        self.replaying = false;
    }
}
