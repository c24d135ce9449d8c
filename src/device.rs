//! Device adapter capability.
//!
//! An [`EventSource`] is the boundary between a physical (or injected) device
//! and an engine. Adapters own device discovery and connection; engines never
//! initiate either. Once connected, an adapter answers three questions about
//! each raw event it produces (is it valid, what is its native id, what is its
//! raw value) and exposes a blocking read.

/// Capability interface every device adapter implements.
pub trait EventSource: Send + 'static {
    /// Raw event type produced by the device.
    type Event;
    /// Native identifier extracted from raw events.
    type Id;

    /// Pure predicate; invalid events are dropped before id resolution.
    fn valid_event(&self, _event: &Self::Event) -> bool {
        true
    }

    /// Native id of a valid event.
    fn event_id(&self, event: &Self::Event) -> Self::Id;

    /// Raw numeric value of a valid event, before normalization.
    fn event_raw_value(&self, _event: &Self::Event) -> f32 {
        1.0
    }

    /// Block until the device produces events (or a read timeout elapses) and
    /// return them in production order. An empty batch is not an error.
    ///
    /// I/O failures (e.g. a disconnect) are returned and terminate the worker.
    fn read_inputs(&mut self) -> crate::Result<Vec<Self::Event>>;

    /// User-facing device label for logs.
    fn name(&self) -> &str;
}
