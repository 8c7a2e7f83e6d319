//! Rewind Core - shared vocabulary for tick-based rollback netcode
//!
//! This crate provides the types every other rewind crate agrees on:
//! - `Tick` - discrete simulation step index
//! - `Entry<T>` - a tick-stamped record (an input or a state snapshot)
//! - `Simulated` - the capability contract a concrete simulation implements
//!
//! The crates built on top:
//! - `rewind-history` stores `Entry<T>` sequences with bounded memory
//! - `rewind-netcode` drives prediction, reconciliation, and server catch-up

mod simulated;
mod tick;

pub use simulated::Simulated;
pub use tick::{Entry, Tick};
