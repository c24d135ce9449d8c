//! The normalization and dispatch engine.
//!
//! [`Engine`] owns one binding table and one smoothing epsilon. Identifier
//! resolution and per-input parameters come from an [`InputMap`]; raw event
//! inspection comes from the adapter's [`EventSource`].
//!
//! # Dispatch pipeline
//! [`Engine::handle_event`] walks five stages:
//! 1. **Validate** with [`EventSource::valid_event`]; invalid events stop here.
//! 2. **Resolve id** with [`EventSource::event_id`].
//! 3. **Resolve input** with [`InputMap::find_input`].
//! 4. **Terminal check**: unresolved ids stop here.
//! 5. **Normalize and dispatch**: `(raw - offset) / amplitude`, then smoothing,
//!    then every listener bound to the input followed by every global listener,
//!    each list in registration order.
//!
//! Registration may run concurrently with an active read loop. The table is
//! behind an `RwLock`; dispatch copies the listener list out of the lock
//! before calling anything, so listeners may themselves bind.

use crate::binding::{BindingTable, InputListener, SharedListener};
use crate::device::EventSource;
use crate::error::{EngineError, Result};
use crate::event::{EventRecord, HandleOutcome};
use log::{debug, warn};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Input space of an engine: validity, id lookup, parameters and labels.
pub trait InputMap: Send + Sync + 'static {
    /// Native identifier type.
    type Id;
    /// Canonical input type.
    type Input: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn is_input_valid(&self, input: &Self::Input) -> bool;

    /// Map a native id to its input; `None` is the null input.
    fn find_input(&self, id: &Self::Id) -> Option<Self::Input>;

    /// `(offset, amplitude)` of a declared input.
    fn params(&self, input: &Self::Input) -> Result<(f32, f32)>;

    /// Human-readable label of a declared input.
    fn input_name(&self, input: &Self::Input) -> Result<String>;
}

/// `(raw - offset) / amplitude`.
#[inline]
pub fn normalize(raw: f32, offset: f32, amplitude: f32) -> f32 {
    (raw - offset) / amplitude
}

/// Deadzone: `0.0` when `|value| < epsilon`, else `value` unchanged.
#[inline]
pub fn smooth(value: f32, epsilon: f32) -> f32 {
    if value.abs() < epsilon {
        0.0
    } else {
        value
    }
}

pub(crate) fn check_smoothing(epsilon: f32) -> Result<f32> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(epsilon)
    } else {
        Err(EngineError::InvalidSmoothing(epsilon))
    }
}

/// Normalization and dispatch engine over an input space `M`.
pub struct Engine<M: InputMap> {
    inputs: M,
    smoothing_epsilon: f32,
    bindings: RwLock<BindingTable<M::Input>>,
}

impl<M: InputMap> Engine<M> {
    /// Fails with [`EngineError::InvalidSmoothing`] for a negative or non-finite epsilon.
    pub fn new(inputs: M, smoothing_epsilon: f32) -> Result<Self> {
        Ok(Self {
            inputs,
            smoothing_epsilon: check_smoothing(smoothing_epsilon)?,
            bindings: RwLock::new(BindingTable::new()),
        })
    }

    /// Convenience: build and wrap in an `Arc`, the shape needed for bridges and workers.
    pub fn shared(inputs: M, smoothing_epsilon: f32) -> Result<Arc<Self>> {
        Self::new(inputs, smoothing_epsilon).map(Arc::new)
    }

    pub fn inputs(&self) -> &M {
        &self.inputs
    }

    pub fn smoothing_epsilon(&self) -> f32 {
        self.smoothing_epsilon
    }

    pub fn is_input_valid(&self, input: &M::Input) -> bool {
        self.inputs.is_input_valid(input)
    }

    pub fn enforce_valid_input(&self, input: &M::Input) -> Result<()> {
        if self.is_input_valid(input) {
            Ok(())
        } else {
            Err(EngineError::InvalidInput {
                input: format!("{input:?}"),
                engine: std::any::type_name::<M>(),
            })
        }
    }

    pub fn find_input(&self, id: &M::Id) -> Option<M::Input> {
        self.inputs.find_input(id)
    }

    /// Label for diagnostics; never use it for identity comparisons.
    pub fn input_name(&self, input: &M::Input) -> Result<String> {
        self.enforce_valid_input(input)?;
        self.inputs.input_name(input)
    }

    /// Bind `listener` to `input`, after any listeners already bound to it.
    ///
    /// Fails with [`EngineError::InvalidInput`] and registers nothing if the
    /// input is not declared.
    pub fn bind<L>(&self, input: M::Input, listener: L) -> Result<()>
    where
        L: InputListener<M::Input> + 'static,
    {
        self.bind_shared(input, Arc::new(listener))
    }

    pub(crate) fn bind_shared(
        &self,
        input: M::Input,
        listener: SharedListener<M::Input>,
    ) -> Result<()> {
        self.enforce_valid_input(&input)?;
        self.write_bindings().bind(input, listener);
        Ok(())
    }

    /// Bind `listener` to every dispatched event, whatever its input.
    pub fn bind_all<L>(&self, listener: L)
    where
        L: InputListener<M::Input> + 'static,
    {
        self.write_bindings().bind_all(Arc::new(listener));
    }

    pub fn bound_count(&self, input: &M::Input) -> usize {
        self.read_bindings().bound_count(input)
    }

    pub fn global_count(&self) -> usize {
        self.read_bindings().global_count()
    }

    /// Normalize and smooth a raw value for `input`.
    pub fn event_value(&self, input: &M::Input, raw: f32) -> Result<f32> {
        let (offset, amplitude) = self.inputs.params(input)?;
        Ok(smooth(normalize(raw, offset, amplitude), self.smoothing_epsilon))
    }

    /// Run one raw event through the dispatch pipeline.
    pub fn handle_event<S>(&self, source: &S, event: S::Event) -> HandleOutcome<M::Input>
    where
        S: EventSource<Id = M::Id>,
    {
        if !source.valid_event(&event) {
            return HandleOutcome::Invalid;
        }
        let id = source.event_id(&event);
        let Some(input) = self.inputs.find_input(&id) else {
            debug!("{}: no input for native id, event dropped", source.name());
            return HandleOutcome::Unresolved;
        };
        let raw = source.event_raw_value(&event);
        let value = match self.event_value(&input, raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("{}: {e}, event dropped", source.name());
                return HandleOutcome::Rejected;
            }
        };
        let record = EventRecord::new(input, value);
        self.emit(&record);
        HandleOutcome::Dispatched(record)
    }

    /// Dispatch stage only: call the listeners for an already normalized record.
    pub fn emit(&self, record: &EventRecord<M::Input>) {
        let listeners = self.read_bindings().listeners_for(&record.input);
        for listener in listeners {
            listener.on_input(record);
        }
    }

    fn read_bindings(&self) -> RwLockReadGuard<'_, BindingTable<M::Input>> {
        self.bindings.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, BindingTable<M::Input>> {
        self.bindings.write().unwrap_or_else(|e| e.into_inner())
    }
}
