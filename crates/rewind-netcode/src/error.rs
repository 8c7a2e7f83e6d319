//! Error types for rewind-netcode

use rewind_core::Tick;
use thiserror::Error;

use crate::Role;

/// Netcode error type
///
/// Only caller mistakes surface as errors. Recoverable network conditions
/// (missing ticks, dropped packets, excess lag, stale corrections) are
/// reported through return values and never unwind.
#[derive(Debug, Error)]
pub enum Error {
    /// No stored state near the requested tick
    #[error("No state retained for tick {0}")]
    StateNotFound(Tick),

    /// Rollback target is older than the retained history
    #[error("Cannot roll back to tick {target}, oldest retained is {oldest}")]
    RollbackTooFar { target: Tick, oldest: Tick },

    /// Operation invoked on a controller with the wrong role
    #[error("Operation requires the {required:?} role, controller is {actual:?}")]
    WrongRole { required: Role, actual: Role },
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
