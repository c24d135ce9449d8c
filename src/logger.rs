//! Diagnostics listener.
use crate::binding::InputListener;
use crate::engine::{Engine, InputMap};
use crate::event::EventRecord;
use log::info;
use std::sync::{Arc, Weak};

/// Logs every record it receives as `name: value`.
///
/// Values with `0 < |value| < threshold` are skipped so jittery axes do not
/// flood the log; exact zeros (releases, centred sticks) are still reported.
pub struct Logger<M: InputMap> {
    engine: Weak<Engine<M>>,
    threshold: f32,
}

impl<M: InputMap> Logger<M> {
    pub fn new(engine: &Arc<Engine<M>>) -> Self {
        Self {
            engine: Arc::downgrade(engine),
            threshold: 0.1,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Formatted line for `record`, or `None` if it falls under the threshold.
    pub fn line(&self, record: &EventRecord<M::Input>) -> Option<String> {
        let magnitude = record.value.abs();
        if magnitude > 0.0 && magnitude < self.threshold {
            return None;
        }
        let name = self
            .engine
            .upgrade()
            .and_then(|engine| engine.input_name(&record.input).ok())
            .unwrap_or_else(|| format!("{:?}", record.input));
        Some(format!("{:<10}{}", format!("{name}:"), record.value))
    }
}

impl<M: InputMap> InputListener<M::Input> for Logger<M> {
    fn on_input(&self, record: &EventRecord<M::Input>) {
        if let Some(line) = self.line(record) {
            info!("{line}");
        }
    }
}
