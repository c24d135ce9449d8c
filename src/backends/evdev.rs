//! Linux evdev gamepad backend.
//!
//! Discovery scans `/dev/input/event*` for devices that report a south face
//! button, then picks one through [`select_device`]. Events are passed through
//! untouched: evdev already speaks the `(type, code, value)` language of
//! [`RawGamepadEvent`].
//!
//! Reads block until the kernel delivers the next batch, so a stop request is
//! honoured after the next input frame. Use a daemon worker when the pad may
//! stay idle for long.

use crate::error::{EngineError, Result};
use crate::gamepad::presets::{select_device, Selection, UnknownDevicePolicy};
use crate::gamepad::{self, Gamepad, GamepadConfig, GamepadReader, GamepadSource, RawGamepadEvent};
use crate::metadata::DeviceMeta;
use log::{debug, info};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// A connected evdev gamepad.
pub struct EvdevGamepad {
    device: evdev::Device,
    meta: DeviceMeta,
}

fn describe(path: &Path, device: &evdev::Device) -> DeviceMeta {
    let id = device.input_id();
    DeviceMeta {
        bus: Some("evdev".into()),
        vid: Some(id.vendor()),
        pid: Some(id.product()),
        path: Some(path.display().to_string()),
        ..DeviceMeta::named(device.name().unwrap_or("Unknown"))
    }
}

fn is_gamepad(device: &evdev::Device) -> bool {
    device
        .supported_keys()
        .map_or(false, |keys| keys.contains(evdev::Key::BTN_SOUTH))
}

/// Every gamepad-like evdev device currently present.
pub fn probe_devices() -> Vec<(DeviceMeta, evdev::Device)> {
    evdev::enumerate()
        .filter(|(_, device)| is_gamepad(device))
        .map(|(path, device)| (describe(&path, &device), device))
        .collect()
}

impl EvdevGamepad {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let device = evdev::Device::open(path)?;
        let meta = describe(path, &device);
        Ok(Self { device, meta })
    }

    /// Scan for gamepads and connect to one, with the preset chosen for it.
    ///
    /// With an `interval`, scanning repeats until a device is accepted;
    /// without one a single scan is made and [`EngineError::NoDevice`] is
    /// returned if nothing qualifies.
    pub fn discover(
        policy: UnknownDevicePolicy,
        interval: Option<Duration>,
    ) -> Result<(Self, Selection)> {
        loop {
            let mut found = probe_devices();
            debug!("evdev scan found {} gamepad(s)", found.len());
            let metas: Vec<DeviceMeta> = found.iter().map(|(meta, _)| meta.clone()).collect();
            if let Some(selection) = select_device(&metas, policy) {
                let (meta, device) = found.swap_remove(selection.index());
                info!("connected to {meta}");
                return Ok((Self { device, meta }, selection));
            }
            match interval {
                Some(wait) => {
                    debug!("no usable gamepad, retrying in {wait:?}");
                    thread::sleep(wait);
                }
                None => return Err(EngineError::NoDevice),
            }
        }
    }
}

impl GamepadReader for EvdevGamepad {
    fn read_raw(&mut self) -> Result<Vec<RawGamepadEvent>> {
        let events = self.device.fetch_events().map_err(|e| {
            debug!("{}: read failed: {e}", self.meta.name);
            EngineError::Disconnected(self.meta.name.clone())
        })?;
        Ok(events
            .map(|ev| RawGamepadEvent::new(ev.event_type().0, ev.code(), ev.value()))
            .collect())
    }

    fn meta(&self) -> &DeviceMeta {
        &self.meta
    }
}

/// Discover a gamepad and build its engine from `config`.
pub fn open_gamepad(config: &GamepadConfig) -> Result<(Gamepad, GamepadSource<EvdevGamepad>)> {
    let interval = config.discovery_interval_ms.map(Duration::from_millis);
    let (pad, selection) = EvdevGamepad::discover(config.unknown_device, interval)?;
    let engine = gamepad::engine_for(&pad.meta, selection.preset(), &config.engine)?;
    Ok((engine, GamepadSource::new(pad)))
}
