//! Rewind Netcode - prediction, reconciliation, and server catch-up
//!
//! This crate glues a [`rewind_core::Simulated`] entity to the two sides
//! of an authoritative session:
//!
//! - **Owner** (predicting client): gathers input, simulates immediately,
//!   records (input, state) per tick, transmits to the authority
//! - **Authority** (server): steps a cursor through buffered client
//!   inputs, detects divergence against the client's claimed states, and
//!   sends corrections back
//! - **Reconciliation**: on a correction, the owner rewrites its state
//!   history from the corrected tick forward and replays buffered inputs
//! - **Catch-up**: the authority's cursor lag is bounded; unreachable
//!   backlog is skipped, never simulated
//!
//! # Architecture
//!
//! ```text
//! ┌───────────── Owner ─────────────┐      ┌────────── Authority ─────────┐
//! │ gather_input ─▶ simulate        │      │ buffered inputs ─▶ cursor    │
//! │       │             │           │ send │        │                     │
//! │  InputHistory   StateHistory ───┼──────┼─▶ claimed states             │
//! │       ▲             ▲           │      │        │                     │
//! │       └── replay ◀──┴───────────┼──────┼── correction on divergence   │
//! └─────────────────────────────────┘      └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rewind_netcode::{Controller, ControllerConfig, Role};
//!
//! let mut controller = Controller::new(Role::Owner, ControllerConfig::default());
//!
//! // Driven by the fixed-tick scheduler, in order, every frame:
//! controller.pre_tick(&mut entity, local_tick);
//! controller.post_tick(&mut entity, &mut transport);
//!
//! // When an authoritative correction arrives:
//! if let Some((tick, state)) = receive_correction() {
//!     controller.reconcile(&mut entity, tick, &state);
//! }
//! ```

mod authority;
mod config;
mod controller;
mod error;
mod reconcile;
mod registry;
mod transport;

pub use authority::AuthorityOutcome;
pub use config::ControllerConfig;
pub use controller::{Controller, Role};
pub use error::{Error, Result};
pub use registry::{ControllerId, ControllerRegistry, RollbackTarget};
pub use transport::{Message, Transport};

// Re-export the capability contract for convenience
pub use rewind_core::Simulated;
