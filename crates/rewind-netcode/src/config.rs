//! Controller configuration - history sizing and catch-up bounds
//!
//! `min_input_buffer` and `max_input_buffer` bound the authority's cursor
//! lag: stepping does not begin until `min_input_buffer` inputs are
//! buffered ahead of the cursor (absorbs jitter and reordering), and once
//! the backlog exceeds `max_input_buffer` the cursor fast-forwards,
//! abandoning the intervening ticks.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::Controller`]
///
/// # Example
///
/// ```
/// use rewind_netcode::ControllerConfig;
///
/// let config = ControllerConfig::default()
///     .with_history_capacity(256)
///     .with_input_buffer(3, 24);
/// assert_eq!(config.history_capacity(), 256);
/// assert_eq!(config.min_input_buffer(), 3);
/// assert_eq!(config.max_input_buffer(), 24);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Entries retained per history stream (inputs and states each)
    history_capacity: usize,
    /// Inputs that must be buffered ahead of the cursor before the
    /// authority steps
    min_input_buffer: usize,
    /// Backlog size that triggers a cursor fast-forward
    max_input_buffer: usize,
    /// Simulation step length in seconds
    tick_dt: f64,
}

impl ControllerConfig {
    /// Set the per-stream history capacity (clamped to at least 1)
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Set the catch-up bounds
    ///
    /// `max` is clamped to stay strictly above `min`.
    pub fn with_input_buffer(mut self, min: usize, max: usize) -> Self {
        self.min_input_buffer = min;
        self.max_input_buffer = max.max(min + 1);
        self
    }

    /// Set the simulation step length in seconds (clamped positive)
    pub fn with_tick_dt(mut self, dt: f64) -> Self {
        self.tick_dt = if dt > 0.0 { dt } else { Self::DEFAULT_TICK_DT };
        self
    }

    /// Entries retained per history stream
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Minimum buffered inputs before the authority steps
    pub fn min_input_buffer(&self) -> usize {
        self.min_input_buffer
    }

    /// Backlog size that triggers a cursor fast-forward
    pub fn max_input_buffer(&self) -> usize {
        self.max_input_buffer
    }

    /// Simulation step length in seconds
    pub fn tick_dt(&self) -> f64 {
        self.tick_dt
    }

    const DEFAULT_TICK_DT: f64 = 1.0 / 60.0;
}

impl Default for ControllerConfig {
    /// 512 retained ticks per stream, 2..32 catch-up window, 60 Hz step
    fn default() -> Self {
        Self {
            history_capacity: 512,
            min_input_buffer: 2,
            max_input_buffer: 32,
            tick_dt: Self::DEFAULT_TICK_DT,
        }
    }
}
