//! Reconciliation delivery: rollback and replay on the owning client
//!
//! When the authority flags a tick as diverged it sends the authoritative
//! state back. The owner re-checks the divergence locally (its history may
//! have changed since the correction was sent), and only then rewrites
//! history from that tick forward and replays its buffered inputs.
//!
//! Replay is a synchronous loop run to completion inside one call; the
//! `replaying` latch rejects nested deliveries.

use log::{debug, warn};

use rewind_core::{Simulated, Tick};

use crate::{Controller, Error, Result, Role};

impl<E: Simulated> Controller<E> {
    /// Deliver an authoritative (tick, state) correction
    ///
    /// Returns true if the correction diverged and a rollback+replay was
    /// performed. A correction for an unknown tick, or one the local
    /// history already agrees with, is an idempotent no-op. Applying the
    /// same correction twice therefore leaves the same final state as
    /// applying it once.
    pub fn reconcile(&mut self, entity: &mut E, tick: Tick, authoritative: &E::State) -> bool {
        if self.role != Role::Owner {
            warn!("Ignoring correction for tick {}: controller is not the owner", tick);
            return false;
        }
        if self.replaying {
            warn!("Ignoring correction for tick {}: replay already in progress", tick);
            return false;
        }

        self.confirmed_tick = self.confirmed_tick.max(tick);

        // Local re-check: the authority's verdict is not trusted blindly
        let diverged = match self.states.read(tick) {
            Some(predicted) => !E::states_match(predicted, authoritative),
            None => false,
        };
        if !diverged {
            debug!("Correction for tick {} no longer diverges, ignoring", tick);
            return false;
        }

        // Capture the replay horizon before mutating the state history
        let newest = self.states.newest_tick().unwrap_or(tick);

        self.states.clear_future(tick, true);
        self.states.write(tick, authoritative.clone());
        entity.apply_state(authoritative);

        self.replaying = true;
        let dt = self.config.tick_dt();
        for replay_tick in (tick + 1)..=newest {
            match self.inputs.read(replay_tick) {
                Some(input) => {
                    entity.simulate(Some(input), dt, true);
                    self.states.write(replay_tick, entity.gather_state());
                }
                None => {
                    // Never sent or already pruned: the tick contributes
                    // nothing and is not retried
                    debug!("No buffered input for tick {}, skipping replay step", replay_tick);
                }
            }
        }
        self.replaying = false;

        true
    }

    /// Snap the live entity back to the state recorded at `tick`
    ///
    /// Falls back to the nearest earlier retained state. States after the
    /// restored tick are discarded; buffered inputs are kept so the ticks
    /// can be re-simulated. Returns the tick actually restored.
    pub fn rollback_to(&mut self, entity: &mut E, tick: Tick) -> Result<Tick> {
        let (actual, state) = match self.states.at_or_before(tick) {
            Some(entry) => (entry.tick, entry.data.clone()),
            None => {
                return Err(match self.states.oldest_tick() {
                    Some(oldest) => Error::RollbackTooFar {
                        target: tick,
                        oldest,
                    },
                    None => Error::StateNotFound(tick),
                })
            }
        };
        entity.apply_state(&state);
        self.states.clear_future(actual, false);
        Ok(actual)
    }

    /// Re-apply the most recent recorded state to the live entity
    ///
    /// Returns false if no state has been recorded yet.
    pub fn reset_state(&mut self, entity: &mut E) -> bool {
        match self.states.newest_tick().and_then(|tick| self.states.read(tick)) {
            Some(state) => {
                let state = state.clone();
                entity.apply_state(&state);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControllerConfig, Transport};
    use std::collections::VecDeque;
    use std::convert::Infallible;

    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct MoverState {
        pos: f64,
        vel: f64,
    }

    struct Mover {
        pos: f64,
        vel: f64,
        script: VecDeque<f64>,
        live_steps: u32,
        replay_steps: u32,
    }

    impl Mover {
        fn scripted(inputs: &[f64]) -> Self {
            Self {
                pos: 0.0,
                vel: 0.0,
                script: inputs.iter().copied().collect(),
                live_steps: 0,
                replay_steps: 0,
            }
        }
    }

    impl Simulated for Mover {
        type Input = f64;
        type State = MoverState;

        fn gather_input(&mut self) -> f64 {
            self.script.pop_front().unwrap_or_default()
        }

        fn gather_state(&self) -> MoverState {
            MoverState {
                pos: self.pos,
                vel: self.vel,
            }
        }

        fn simulate(&mut self, input: Option<&f64>, dt: f64, replay: bool) {
            if replay {
                self.replay_steps += 1;
            } else {
                self.live_steps += 1;
            }
            self.vel += input.copied().unwrap_or_default() * dt;
            self.pos += self.vel * dt;
        }

        fn apply_state(&mut self, state: &MoverState) {
            self.pos = state.pos;
            self.vel = state.vel;
        }

        fn states_match(a: &MoverState, b: &MoverState) -> bool {
            (a.pos - b.pos).abs() < 1e-9 && (a.vel - b.vel).abs() < 1e-9
        }
    }

    struct NullTransport;

    impl Transport<f64, MoverState> for NullTransport {
        type Error = Infallible;

        fn send_input(&mut self, _: Tick, _: &f64, _: &MoverState) -> std::result::Result<(), Infallible> {
            Ok(())
        }

        fn send_correction(&mut self, _: Tick, _: &MoverState) -> std::result::Result<(), Infallible> {
            Ok(())
        }
    }

    const INPUTS: [f64; 10] = [1.0, 0.5, -1.0, 2.0, 0.0, 1.5, -0.5, 1.0, 0.0, 2.0];

    fn predicted_owner() -> (Controller<Mover>, Mover) {
        let mut controller = Controller::new(Role::Owner, ControllerConfig::default());
        let mut entity = Mover::scripted(&INPUTS);
        let mut transport = NullTransport;
        for tick in 0..INPUTS.len() as Tick {
            controller.pre_tick(&mut entity, tick);
            controller.post_tick(&mut entity, &mut transport);
        }
        (controller, entity)
    }

    /// Replay INPUTS[(from + 1)..] on top of `start` and return the
    /// expected per-tick states
    fn expected_after_correction(start: MoverState, from: Tick) -> Vec<(Tick, MoverState)> {
        let dt = ControllerConfig::default().tick_dt();
        let mut mover = Mover::scripted(&[]);
        mover.apply_state(&start);
        let mut states = Vec::new();
        for tick in (from + 1)..INPUTS.len() as Tick {
            mover.simulate(Some(&INPUTS[tick as usize]), dt, true);
            states.push((tick, mover.gather_state()));
        }
        states
    }

    #[test]
    fn test_divergent_correction_rewrites_history() {
        let (mut controller, mut entity) = predicted_owner();

        let mut authoritative = controller.states().read(5).copied().unwrap();
        authoritative.pos += 10.0;

        assert!(controller.reconcile(&mut entity, 5, &authoritative));

        // tick 5 now holds the authoritative state
        let at_five = controller.states().read(5).copied().unwrap();
        assert!(Mover::states_match(&at_five, &authoritative));

        // every later tick was recomputed from the buffered inputs
        for (tick, expected) in expected_after_correction(authoritative, 5) {
            let recorded = controller.states().read(tick).copied().unwrap();
            assert!(
                Mover::states_match(&recorded, &expected),
                "state at tick {} was not replayed",
                tick
            );
        }

        // replay covered ticks 6..=9 and was marked as replay
        assert_eq!(entity.replay_steps, 4);
        // the live entity ends on the last replayed state
        let last = controller.states().read(9).copied().unwrap();
        assert!(Mover::states_match(&entity.gather_state(), &last));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let (mut controller, mut entity) = predicted_owner();

        let mut authoritative = controller.states().read(5).copied().unwrap();
        authoritative.pos += 10.0;

        assert!(controller.reconcile(&mut entity, 5, &authoritative));
        let once = entity.gather_state();

        // second delivery finds no divergence and changes nothing
        assert!(!controller.reconcile(&mut entity, 5, &authoritative));
        assert!(Mover::states_match(&entity.gather_state(), &once));
    }

    #[test]
    fn test_spurious_correction_is_noop() {
        let (mut controller, mut entity) = predicted_owner();
        let before = entity.gather_state();

        // authoritative state agrees with the prediction
        let authoritative = controller.states().read(5).copied().unwrap();
        assert!(!controller.reconcile(&mut entity, 5, &authoritative));

        assert!(Mover::states_match(&entity.gather_state(), &before));
        assert_eq!(entity.replay_steps, 0);
        // the confirmation still advances the prediction window
        assert_eq!(controller.prediction_depth(), 4);
    }

    #[test]
    fn test_correction_for_unknown_tick_is_noop() {
        let (mut controller, mut entity) = predicted_owner();
        let before = entity.gather_state();

        let authoritative = MoverState { pos: 99.0, vel: 0.0 };
        assert!(!controller.reconcile(&mut entity, 42, &authoritative));
        assert!(Mover::states_match(&entity.gather_state(), &before));
    }

    #[test]
    fn test_replay_skips_missing_inputs() {
        let (mut controller, mut entity) = predicted_owner();

        // Drop the buffered input for tick 7
        let kept: Vec<_> = controller
            .inputs()
            .iter()
            .filter(|entry| entry.tick != 7)
            .map(|entry| (entry.tick, entry.data))
            .collect();
        controller.inputs_mut().clear();
        for (tick, input) in kept {
            controller.inputs_mut().write(tick, input);
        }

        let mut authoritative = controller.states().read(5).copied().unwrap();
        authoritative.pos += 10.0;
        assert!(controller.reconcile(&mut entity, 5, &authoritative));

        // ticks 6, 8, 9 replayed; 7 skipped entirely
        assert_eq!(entity.replay_steps, 3);

        // the skipped tick's stale prediction was discarded, not rewritten
        assert!(controller.states().read(7).is_none());
        assert!(controller.states().read(8).is_some());
    }

    #[test]
    fn test_rollback_to() {
        let (mut controller, mut entity) = predicted_owner();
        let at_three = controller.states().read(3).copied().unwrap();

        let actual = controller.rollback_to(&mut entity, 3).unwrap();
        assert_eq!(actual, 3);
        assert!(Mover::states_match(&entity.gather_state(), &at_three));
        // later states are discarded, inputs are kept
        assert_eq!(controller.states().newest_tick(), Some(3));
        assert_eq!(controller.inputs().newest_tick(), Some(9));
    }

    #[test]
    fn test_rollback_to_nearest_earlier() {
        let (mut controller, mut entity) = predicted_owner();
        controller.states_mut().clear_future(4, true);
        controller.states_mut().clear_past(2, false);

        // exact tick 4 is gone; tick 3 is the nearest earlier state
        let actual = controller.rollback_to(&mut entity, 4).unwrap();
        assert_eq!(actual, 3);
    }

    #[test]
    fn test_rollback_too_far() {
        let (mut controller, mut entity) = predicted_owner();
        controller.states_mut().clear_past(5, false);

        match controller.rollback_to(&mut entity, 2) {
            Err(Error::RollbackTooFar { target, oldest }) => {
                assert_eq!(target, 2);
                assert_eq!(oldest, 5);
            }
            other => panic!("expected RollbackTooFar, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reset_state() {
        let (mut controller, mut entity) = predicted_owner();
        let newest = controller.states().read(9).copied().unwrap();

        entity.pos = -1000.0;
        assert!(controller.reset_state(&mut entity));
        assert!(Mover::states_match(&entity.gather_state(), &newest));

        controller.reset();
        assert!(!controller.reset_state(&mut entity));
    }

    #[test]
    fn test_non_owner_rejects_corrections() {
        let mut controller: Controller<Mover> =
            Controller::new(Role::Authority, ControllerConfig::default());
        let mut entity = Mover::scripted(&[]);

        let state = MoverState::default();
        assert!(!controller.reconcile(&mut entity, 0, &state));
    }
}
