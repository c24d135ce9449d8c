//! Background polling.
//!
//! One dedicated thread per engine runs the adapter's read loop and calls
//! [`Engine::handle_event`] for every raw event, in production order. There is
//! no queue between the device and the listeners.
//!
//! The stop token is checked between reads. A read that is already blocked
//! inside the device cannot be interrupted; adapters that want prompt
//! shutdown use a read timeout.

use crate::device::EventSource;
use crate::engine::{Engine, InputMap};
use crate::error::{EngineError, Result};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl<M: InputMap> Engine<M> {
    /// Blocking read loop: read a batch, dispatch it, repeat until `stop` is set.
    ///
    /// Adapter errors end the loop and are returned.
    pub fn run<S>(&self, source: &mut S, stop: &StopToken) -> Result<()>
    where
        S: EventSource<Id = M::Id>,
    {
        while !stop.is_stopped() {
            for event in source.read_inputs()? {
                self.handle_event(source, event);
            }
        }
        Ok(())
    }

    /// Spawn a worker thread running [`run`](Self::run) on `source`.
    ///
    /// A `daemon` worker is detached when its handle is dropped. A non-daemon
    /// worker is joined on drop, so the owner waits for it as a process would
    /// wait for a non-daemon thread.
    pub fn background_loop<S>(self: &Arc<Self>, mut source: S, daemon: bool) -> Result<Worker>
    where
        S: EventSource<Id = M::Id>,
    {
        let stop = StopToken::new();
        let engine = Arc::clone(self);
        let token = stop.clone();
        let name = source.name().to_string();

        let handle = thread::Builder::new()
            .name(format!("inputflow:{name}"))
            .spawn(move || {
                info!("{name}: read loop started");
                let result = engine.run(&mut source, &token);
                match &result {
                    Ok(()) => info!("{name}: read loop stopped"),
                    Err(e) => error!("{name}: read loop terminated: {e}"),
                }
                result
            })?;

        Ok(Worker {
            handle: Some(handle),
            stop,
            daemon,
        })
    }
}

/// Handle to a running read loop.
pub struct Worker {
    handle: Option<JoinHandle<Result<()>>>,
    stop: StopToken,
    daemon: bool,
}

impl Worker {
    /// Ask the loop to exit after its current read.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the loop to exit and return its result.
    pub fn join(mut self) -> Result<()> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle.join().map_err(|panic| {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            EngineError::WorkerPanicked(msg)
        })?
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.daemon {
            return;
        }
        if let Err(e) = self.join_inner() {
            error!("worker exited with error: {e}");
        }
    }
}
