//! HID gamepad backend.
//!
//! For pads reachable only through hidapi (no evdev node, other platforms).
//! Only devices with a known [`ReportLayout`] are opened; their input reports
//! are decoded into the same event codes the evdev backend produces, so the
//! gamepad presets apply unchanged.

use crate::error::{EngineError, Result};
use crate::gamepad::presets::select_device;
use crate::gamepad::report::{find_layout, ReportLayout};
use crate::gamepad::{self, Gamepad, GamepadConfig, GamepadReader, GamepadSource, RawGamepadEvent};
use crate::metadata::DeviceMeta;
use hidapi::{DeviceInfo, HidApi, HidDevice};
use log::{debug, info};
use std::thread;
use std::time::Duration;

/// Maximum number of HID reports drained per read.
const MAX_REPORTS_PER_TICK: usize = 32;

/// Milliseconds a read waits for the first report.
const READ_TIMEOUT_MS: i32 = 50;

/// A connected HID gamepad with a known report layout.
pub struct HidGamepad {
    raw: HidDevice,
    layout: &'static ReportLayout,
    meta: DeviceMeta,
    buf: Vec<u8>,
    last: Option<Vec<u8>>,
}

fn describe(info: &DeviceInfo) -> DeviceMeta {
    DeviceMeta {
        bus: Some("hid".into()),
        vid: Some(info.vendor_id()),
        pid: Some(info.product_id()),
        path: Some(info.path().to_string_lossy().into_owned()),
        ..DeviceMeta::named(info.product_string().unwrap_or("Unknown"))
    }
}

fn candidates(api: &HidApi) -> Vec<(&DeviceInfo, &'static ReportLayout)> {
    api.device_list()
        .filter_map(|info| find_layout(info.vendor_id(), info.product_id()).map(|l| (info, l)))
        .collect()
}

/// Every HID device with a known layout.
pub fn probe_devices(api: &HidApi) -> Vec<(DeviceMeta, &'static ReportLayout)> {
    candidates(api)
        .into_iter()
        .map(|(info, layout)| (describe(info), layout))
        .collect()
}

/// Discover a HID gamepad and build its engine from `config`.
///
/// Only devices with a known report layout are candidates. Among them the
/// device and its preset are chosen as the evdev backend does, honouring
/// `config.unknown_device` and `config.discovery_interval_ms`.
pub fn open_gamepad(
    api: &mut HidApi,
    config: &GamepadConfig,
) -> Result<(Gamepad, GamepadSource<HidGamepad>)> {
    let interval = config.discovery_interval_ms.map(Duration::from_millis);
    loop {
        let found = candidates(api);
        debug!("hid scan found {} supported device(s)", found.len());
        let metas: Vec<DeviceMeta> = found.iter().map(|(info, _)| describe(info)).collect();
        if let Some(selection) = select_device(&metas, config.unknown_device) {
            let (info, layout) = found[selection.index()];
            let pad = HidGamepad::new(info, api, layout)?;
            let engine = gamepad::engine_for(&pad.meta, selection.preset(), &config.engine)?;
            return Ok((engine, GamepadSource::new(pad)));
        }
        match interval {
            Some(wait) => {
                debug!("no usable HID gamepad, retrying in {wait:?}");
                thread::sleep(wait);
                api.refresh_devices()?;
            }
            None => return Err(EngineError::NoDevice),
        }
    }
}

impl HidGamepad {
    pub fn new(info: &DeviceInfo, api: &HidApi, layout: &'static ReportLayout) -> Result<Self> {
        let raw = info.open_device(api)?;
        let meta = describe(info);
        info!("opened {meta} as {}", layout.name);
        Ok(Self {
            raw,
            layout,
            meta,
            buf: vec![0u8; 64],
            last: None,
        })
    }

    pub fn layout(&self) -> &'static ReportLayout {
        self.layout
    }

    fn read_report(&mut self, timeout_ms: i32) -> Result<Option<Vec<RawGamepadEvent>>> {
        let n = self.raw.read_timeout(&mut self.buf, timeout_ms).map_err(|e| {
            debug!("{}: read failed: {e}", self.meta.name);
            EngineError::Disconnected(self.meta.name.clone())
        })?;
        if n == 0 {
            return Ok(None);
        }
        let report = &self.buf[..n];
        let events = self.layout.diff(self.last.as_deref(), report);
        if self.layout.values(report).is_some() {
            self.last = Some(report.to_vec());
        }
        Ok(Some(events))
    }
}

impl GamepadReader for HidGamepad {
    /// Wait for one report, then drain up to [`MAX_REPORTS_PER_TICK`] queued ones.
    fn read_raw(&mut self) -> Result<Vec<RawGamepadEvent>> {
        let mut events = Vec::new();
        let Some(first) = self.read_report(READ_TIMEOUT_MS)? else {
            return Ok(events);
        };
        events.extend(first);
        for _ in 1..MAX_REPORTS_PER_TICK {
            match self.read_report(0)? {
                Some(batch) => events.extend(batch),
                None => break,
            }
        }
        Ok(events)
    }

    fn meta(&self) -> &DeviceMeta {
        &self.meta
    }
}
