//! In-process input devices.
//!
//! A virtual device is a channel: the producing side ([`VirtualFeed`]) is held
//! by whatever generates input (a host event loop, a test, a replay), the
//! consuming side ([`VirtualReceiver`]) is read by an adapter like any
//! hardware device. Dropping every feed disconnects the device.

use crate::error::{EngineError, Result};
use crate::gamepad::{codes, GamepadReader, RawGamepadEvent};
use crate::metadata::DeviceMeta;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// How long a read waits for the first event before returning an empty batch.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Create a connected virtual device.
pub fn channel<E>(meta: DeviceMeta) -> (VirtualFeed<E>, VirtualReceiver<E>) {
    let (tx, rx) = mpsc::channel();
    let feed = VirtualFeed {
        tx,
        name: meta.name.clone(),
    };
    let receiver = VirtualReceiver {
        rx,
        meta,
        poll_interval: DEFAULT_POLL_INTERVAL,
    };
    (feed, receiver)
}

/// Producing side of a virtual device.
pub struct VirtualFeed<E> {
    tx: Sender<E>,
    name: String,
}

impl<E> Clone for VirtualFeed<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            name: self.name.clone(),
        }
    }
}

impl<E> VirtualFeed<E> {
    /// Inject a raw event. Fails once the receiving side is gone.
    pub fn send(&self, event: E) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| EngineError::Disconnected(self.name.clone()))
    }
}

/// Consuming side of a virtual device.
pub struct VirtualReceiver<E> {
    rx: Receiver<E>,
    meta: DeviceMeta,
    poll_interval: Duration,
}

impl<E> VirtualReceiver<E> {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn meta(&self) -> &DeviceMeta {
        &self.meta
    }

    /// Wait up to the poll interval for an event, then take everything queued.
    ///
    /// Returns an empty batch on timeout and [`EngineError::Disconnected`]
    /// once every feed has been dropped and the queue is drained.
    pub fn read(&mut self) -> Result<Vec<E>> {
        let first = match self.rx.recv_timeout(self.poll_interval) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(EngineError::Disconnected(self.meta.name.clone()))
            }
        };
        let mut events = vec![first];
        events.extend(self.rx.try_iter());
        Ok(events)
    }
}

impl GamepadReader for VirtualReceiver<RawGamepadEvent> {
    fn read_raw(&mut self) -> Result<Vec<RawGamepadEvent>> {
        self.read()
    }

    fn meta(&self) -> &DeviceMeta {
        &self.meta
    }
}

impl VirtualFeed<RawGamepadEvent> {
    /// Convenience method to set an absolute axis value.
    pub fn set_axis(&self, code: u16, value: i32) -> Result<()> {
        self.send(RawGamepadEvent::new(codes::EV_ABS, code, value))
    }

    pub fn press_button(&self, code: u16) -> Result<()> {
        self.send(RawGamepadEvent::new(codes::EV_KEY, code, 1))
    }

    pub fn release_button(&self, code: u16) -> Result<()> {
        self.send(RawGamepadEvent::new(codes::EV_KEY, code, 0))
    }

    /// End-of-frame marker, as real pads emit after each state change.
    pub fn sync(&self) -> Result<()> {
        self.send(RawGamepadEvent::sync())
    }
}
