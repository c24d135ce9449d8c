//! Listeners and the binding table.
//!
//! A listener is anything implementing [`InputListener`]; every
//! `Fn(&EventRecord<I>)` closure qualifies. Extra arguments are simply
//! captured by the closure. The adapters below cover the cases where a
//! callback wants only the value, the origin input and value, or nothing at all.
//!
//! Bindings are write-once: there is no unbind. A binding lives as long as the
//! engine that holds it.

use crate::event::EventRecord;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Reacts to dispatched records.
///
/// Listeners run on the engine's worker thread, synchronously with event
/// consumption: a listener that blocks stalls the device read loop.
pub trait InputListener<I>: Send + Sync {
    fn on_input(&self, record: &EventRecord<I>);
}

impl<I, F> InputListener<I> for F
where
    F: Fn(&EventRecord<I>) + Send + Sync,
{
    fn on_input(&self, record: &EventRecord<I>) {
        self(record)
    }
}

/// Listener receiving only the normalized value.
pub struct OnValue<F>(F);

impl<I, F> InputListener<I> for OnValue<F>
where
    F: Fn(f32) + Send + Sync,
{
    fn on_input(&self, record: &EventRecord<I>) {
        (self.0)(record.value)
    }
}

/// Listener receiving the origin input and the value.
pub struct OnOriginValue<F>(F);

impl<I: Copy, F> InputListener<I> for OnOriginValue<F>
where
    F: Fn(I, f32) + Send + Sync,
{
    fn on_input(&self, record: &EventRecord<I>) {
        (self.0)(record.input, record.value)
    }
}

/// Listener that ignores the record entirely.
pub struct OnTrigger<F>(F);

impl<I, F> InputListener<I> for OnTrigger<F>
where
    F: Fn() + Send + Sync,
{
    fn on_input(&self, _record: &EventRecord<I>) {
        (self.0)()
    }
}

pub fn on_value<F: Fn(f32) + Send + Sync>(f: F) -> OnValue<F> {
    OnValue(f)
}

pub fn on_origin_value<I, F: Fn(I, f32) + Send + Sync>(f: F) -> OnOriginValue<F> {
    OnOriginValue(f)
}

pub fn on_trigger<F: Fn() + Send + Sync>(f: F) -> OnTrigger<F> {
    OnTrigger(f)
}

pub(crate) type SharedListener<I> = Arc<dyn InputListener<I>>;

/// Per-input listener lists plus the global list, both in registration order.
pub(crate) struct BindingTable<I> {
    per_input: HashMap<I, Vec<SharedListener<I>>>,
    global: Vec<SharedListener<I>>,
}

impl<I: Eq + Hash> BindingTable<I> {
    pub fn new() -> Self {
        Self {
            per_input: HashMap::new(),
            global: Vec::new(),
        }
    }

    pub fn bind(&mut self, input: I, listener: SharedListener<I>) {
        self.per_input.entry(input).or_default().push(listener);
    }

    pub fn bind_all(&mut self, listener: SharedListener<I>) {
        self.global.push(listener);
    }

    /// Listeners to call for `input`: its own first, then the global ones.
    pub fn listeners_for(&self, input: &I) -> Vec<SharedListener<I>> {
        let own = self.per_input.get(input).map(Vec::as_slice).unwrap_or(&[]);
        own.iter().chain(self.global.iter()).cloned().collect()
    }

    pub fn bound_count(&self, input: &I) -> usize {
        self.per_input.get(input).map_or(0, Vec::len)
    }

    pub fn global_count(&self) -> usize {
        self.global.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn per_input_listeners_come_before_global_ones() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table: BindingTable<u8> = BindingTable::new();

        let l = log.clone();
        table.bind_all(Arc::new(move |_: &EventRecord<u8>| l.lock().unwrap().push("global")));
        let l = log.clone();
        table.bind(1, Arc::new(move |_: &EventRecord<u8>| l.lock().unwrap().push("first")));
        let l = log.clone();
        table.bind(1, Arc::new(move |_: &EventRecord<u8>| l.lock().unwrap().push("second")));

        for listener in table.listeners_for(&1) {
            listener.on_input(&EventRecord::new(1, 1.0));
        }
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "global"]);
        assert_eq!(table.listeners_for(&2).len(), 1);
        assert_eq!(table.bound_count(&1), 2);
        assert_eq!(table.global_count(), 1);
    }

    #[test]
    fn adapters_pass_the_requested_parts() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = EventRecord::new('x', 0.5);

        let s = seen.clone();
        on_value(move |v| s.lock().unwrap().push(format!("value {v}"))).on_input(&record);
        let s = seen.clone();
        on_origin_value(move |i: char, v| s.lock().unwrap().push(format!("{i} {v}")))
            .on_input(&record);
        let s = seen.clone();
        InputListener::<char>::on_input(
            &on_trigger(move || s.lock().unwrap().push("fired".to_string())),
            &record,
        );

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["value 0.5", "x 0.5", "fired"]
        );
    }
}
