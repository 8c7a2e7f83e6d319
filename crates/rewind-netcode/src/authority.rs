//! Authority role: cursor stepping, divergence detection, and catch-up
//!
//! The authority buffers (tick, input, claimed state) tuples submitted by
//! the owning client and steps a cursor through them, one tick per driver
//! tick. Each step simulates authoritatively, compares against the
//! owner's claimed state, and sends a correction when they diverge beyond
//! tolerance.
//!
//! Cursor lag is bounded: stepping waits for `min_input_buffer` inputs
//! ahead of the cursor, and a backlog beyond `max_input_buffer` triggers
//! a fast-forward that abandons the intervening ticks. Skipped ticks are
//! never simulated authoritatively and never produce corrections.

use log::{debug, warn};

use rewind_core::{Simulated, Tick};

use crate::{Controller, Error, Result, Role, Transport};

/// What a single authority step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityOutcome {
    /// Simulated the cursor tick from a buffered input
    Stepped {
        /// The tick that was simulated
        tick: Tick,
        /// Whether a correction was sent for it
        corrected: bool,
    },
    /// Simulated the cursor tick with a default input (dropped packet)
    SkippedInput {
        /// The tick that was simulated
        tick: Tick,
        /// Whether a correction was sent for it
        corrected: bool,
    },
    /// Cursor tick is missing and nothing newer is buffered; retried
    /// next tick
    Waiting {
        /// The tick the cursor is stalled on
        tick: Tick,
    },
    /// Fewer than `min_input_buffer` inputs buffered ahead of the cursor
    Starved {
        /// How many inputs are currently buffered ahead
        buffered: usize,
    },
}

impl<E: Simulated> Controller<E> {
    /// Accept a (tick, input, claimed state) tuple from the owning client
    ///
    /// A submission whose tick is not newer than the newest buffered
    /// input is rejected and discarded: buffered ticks stay monotonic,
    /// gaps are allowed. Returns whether the tuple was buffered.
    pub fn submit_input(&mut self, tick: Tick, input: E::Input, claimed: E::State) -> bool {
        if self.role != Role::Authority {
            warn!("Ignoring input submission for tick {}: controller is not the authority", tick);
            return false;
        }
        if let Some(newest) = self.inputs.newest_tick() {
            if tick <= newest {
                warn!(
                    "Rejecting out-of-order input for tick {} (newest buffered is {})",
                    tick, newest
                );
                return false;
            }
        }
        // First submission pins the cursor to the start of the stream
        if self.inputs.is_empty() {
            self.server_tick = tick;
        }
        self.inputs.write(tick, input);
        self.states.write(tick, claimed);
        true
    }

    /// Run one authority step: catch up if lagging, simulate the cursor
    /// tick, compare, correct, advance
    ///
    /// `Err` only for calling this on a non-authority controller; every
    /// network condition is an [`AuthorityOutcome`].
    pub fn authority_step<T: Transport<E::Input, E::State>>(
        &mut self,
        entity: &mut E,
        transport: &mut T,
    ) -> Result<AuthorityOutcome> {
        if self.role != Role::Authority {
            return Err(Error::WrongRole {
                required: Role::Authority,
                actual: self.role,
            });
        }

        let min = self.config.min_input_buffer();
        let max = self.config.max_input_buffer();

        let buffered = self.buffered_ahead();
        if buffered < min {
            return Ok(AuthorityOutcome::Starved { buffered });
        }

        if buffered > max {
            // Catch-up: jump the cursor so only min_input_buffer entries
            // remain ahead. The abandoned ticks stay unsimulated.
            let target_index = self.inputs.len() - 1 - min;
            if let Some(target_tick) = self.inputs.tick_at(target_index) {
                if target_tick > self.server_tick {
                    warn!(
                        "Authority lagging {} entries, fast-forwarding cursor from tick {} to {} ({} ticks skipped)",
                        buffered,
                        self.server_tick,
                        target_tick,
                        target_tick - self.server_tick
                    );
                    self.server_tick = target_tick;
                }
            }
        }

        let tick = self.server_tick;
        let dt = self.config.tick_dt();
        let skipped_input = match self.inputs.read(tick) {
            Some(input) => {
                entity.simulate(Some(input), dt, false);
                false
            }
            None => {
                match self.inputs.newest_tick() {
                    Some(newest) if newest > tick => {
                        // Dropped packet: newer inputs exist, so this one
                        // is not coming. Substitute the default input.
                        debug!("No input buffered for tick {}, simulating with default", tick);
                        entity.simulate(None, dt, false);
                        true
                    }
                    _ => {
                        // Nothing newer buffered either; the tick may
                        // still arrive
                        return Ok(AuthorityOutcome::Waiting { tick });
                    }
                }
            }
        };

        let authoritative = entity.gather_state();
        let corrected = match self.states.read(tick) {
            Some(claimed) if !E::states_match(claimed, &authoritative) => {
                debug!("Divergence at tick {}, sending correction", tick);
                if let Err(err) = transport.send_correction(tick, &authoritative) {
                    warn!("Failed to send correction for tick {}: {}", tick, err);
                }
                true
            }
            _ => false,
        };
        // The authoritative result replaces the owner's claim
        self.states.write(tick, authoritative);
        self.server_tick += 1;

        Ok(if skipped_input {
            AuthorityOutcome::SkippedInput { tick, corrected }
        } else {
            AuthorityOutcome::Stepped { tick, corrected }
        })
    }

    /// Number of buffered inputs at or ahead of the cursor
    pub fn buffered_ahead(&self) -> usize {
        let start = match self.inputs.find(self.server_tick) {
            Ok(index) => index,
            Err(index) => index,
        };
        self.inputs.len() - start
    }
}
