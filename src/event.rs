//! Dispatched events.
//!
//! Every raw device event that survives validation and id resolution becomes a
//! single [`EventRecord`]: the canonical input it belongs to plus its
//! normalized value. Records are ephemeral and are handed to listeners by
//! reference.
//!
//! ## Value conventions
//! - **Axes:** `(raw - offset) / amplitude`, so a centred stick with
//!   `offset = amplitude = 128` reads `0.0` and spans roughly `[-1.0, 1.0]`.
//! - **Buttons / keys:** `1.0` pressed, `0.0` released (with default parameters).
//! - Values with magnitude below the engine's smoothing epsilon are reported as `0.0`.

use serde::Serialize;

/// One normalized, smoothed input change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EventRecord<I> {
    /// Canonical input that produced the value.
    pub input: I,
    /// Normalized value.
    pub value: f32,
}

impl<I> EventRecord<I> {
    pub fn new(input: I, value: f32) -> Self {
        Self { input, value }
    }
}

/// Terminal state reached by [`Engine::handle_event`](crate::engine::Engine::handle_event).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandleOutcome<I> {
    /// Rejected by the adapter's validity predicate.
    Invalid,
    /// Native id did not resolve to any input.
    Unresolved,
    /// Input resolved, but its input space could not supply normalization parameters.
    Rejected,
    /// Normalized and handed to listeners.
    Dispatched(EventRecord<I>),
}

impl<I> HandleOutcome<I> {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, HandleOutcome::Dispatched(_))
    }
}
