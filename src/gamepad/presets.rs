//! Known gamepad models and their parameter presets.
//!
//! Different pads report the same physical control under different codes and
//! ranges. Each [`DevicePreset`] captures one model's differences from the
//! declared defaults, keyed by the product name the OS reports. The registry is
//! a static table, looked up once when a device is connected.
//!
//! A device without a preset is handled according to [`UnknownDevicePolicy`]:
//! either rejected, or accepted with declared defaults. Both outcomes are logged.

use super::GamepadInput::{self, *};
use crate::error::{EngineError, Result};
use crate::input::Overrides;
use crate::metadata::DeviceMeta;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Parameter preset for one gamepad model.
pub struct DevicePreset {
    /// Product name, as reported by the device (trimmed).
    pub device_name: &'static str,
    /// Smoothing epsilon this model needs (`0.0` for none).
    pub smoothing_epsilon: f32,
    build: fn() -> Overrides<GamepadInput>,
}

impl DevicePreset {
    pub fn overrides(&self) -> Overrides<GamepadInput> {
        (self.build)()
    }
}

impl std::fmt::Debug for DevicePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevicePreset")
            .field("device_name", &self.device_name)
            .field("smoothing_epsilon", &self.smoothing_epsilon)
            .finish()
    }
}

/// Every recognised model.
pub static PRESETS: &[DevicePreset] = &[
    DevicePreset {
        device_name: "Generic X-Box pad",
        smoothing_epsilon: 0.0,
        build: generic_xbox,
    },
    DevicePreset {
        device_name: "Wireless Controller",
        smoothing_epsilon: 0.0,
        build: dualshock,
    },
    DevicePreset {
        device_name: "Sony Interactive Entertainment Wireless Controller",
        smoothing_epsilon: 0.0,
        build: dualshock,
    },
    DevicePreset {
        device_name: "Xbox Wireless Controller",
        smoothing_epsilon: 0.1,
        build: xbox_wireless,
    },
    DevicePreset {
        device_name: "SZMY-POWER CO.,LTD. PLAYSTATION(R)3 Controller",
        smoothing_epsilon: 0.1,
        build: playstation3,
    },
];

/// Find the preset registered for a product name.
pub fn find_preset(device_name: &str) -> Option<&'static DevicePreset> {
    let name = device_name.trim();
    PRESETS.iter().find(|p| p.device_name == name)
}

/// Handling of devices with no registered preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDevicePolicy {
    /// Refuse the device.
    #[default]
    Reject,
    /// Accept the device with declared default parameters.
    Defaults,
}

/// Preset decision for one device.
///
/// `Ok(None)` means the device is accepted with defaults.
pub fn resolve_preset(
    meta: &DeviceMeta,
    policy: UnknownDevicePolicy,
) -> Result<Option<&'static DevicePreset>> {
    if let Some(preset) = find_preset(&meta.name) {
        info!("using preset '{}' for {meta}", preset.device_name);
        return Ok(Some(preset));
    }
    match policy {
        UnknownDevicePolicy::Reject => {
            warn!("no preset for {meta}; rejecting device");
            Err(EngineError::UnknownDevice(meta.name.clone()))
        }
        UnknownDevicePolicy::Defaults => {
            warn!("no preset for {meta}; falling back to declared defaults");
            Ok(None)
        }
    }
}

/// Outcome of choosing among discovered devices.
#[derive(Debug)]
pub enum Selection {
    /// A device with a preset.
    Known {
        index: usize,
        preset: &'static DevicePreset,
    },
    /// No device has a preset; the first one is used with defaults.
    Fallback { index: usize },
}

impl Selection {
    pub fn index(&self) -> usize {
        match self {
            Selection::Known { index, .. } | Selection::Fallback { index } => *index,
        }
    }

    pub fn preset(&self) -> Option<&'static DevicePreset> {
        match self {
            Selection::Known { preset, .. } => Some(*preset),
            Selection::Fallback { .. } => None,
        }
    }
}

/// Pick the first candidate with a preset; otherwise apply `policy`.
pub fn select_device(candidates: &[DeviceMeta], policy: UnknownDevicePolicy) -> Option<Selection> {
    for (index, meta) in candidates.iter().enumerate() {
        match find_preset(&meta.name) {
            Some(preset) => {
                info!("will connect to gamepad {meta}");
                return Some(Selection::Known { index, preset });
            }
            None => info!("found unknown gamepad {meta}"),
        }
    }
    match (policy, candidates.first()) {
        (UnknownDevicePolicy::Defaults, Some(meta)) => {
            warn!("no known gamepad; using {meta} with declared defaults");
            Some(Selection::Fallback { index: 0 })
        }
        _ => None,
    }
}

fn face_buttons(
    o: Overrides<GamepadInput>,
    circle: u16,
    triangle: u16,
    square: u16,
    cross: u16,
) -> Overrides<GamepadInput> {
    o.id(Circle, circle)
        .id(Triangle, triangle)
        .id(Square, square)
        .id(Cross, cross)
}

/// Sticks centred on `offset`; vertical axes flipped so that up is positive.
fn sticks(o: Overrides<GamepadInput>, offset: f32, amplitude: f32) -> Overrides<GamepadInput> {
    [RH, LH].into_iter().chain([RV, LV]).fold(o, |o, input| {
        let sign = if matches!(input, RV | LV) { -1.0 } else { 1.0 };
        o.offset(input, offset).amplitude(input, sign * amplitude)
    })
}

fn generic_xbox() -> Overrides<GamepadInput> {
    let o = face_buttons(Overrides::new(), 305, 308, 307, 304);
    sticks(o, 0.0, 32768.0)
        .amplitude(R2, 256.0)
        .amplitude(L2, 256.0)
}

fn dualshock() -> Overrides<GamepadInput> {
    let o = face_buttons(Overrides::new(), 305, 307, 308, 304);
    sticks(o, 128.0, 128.0)
        .amplitude(R2, 256.0)
        .amplitude(L2, 256.0)
        // button codes as assigned by the kernel's hid-playstation/hid-sony drivers
        .id(Create, 314)
        .id(Options, 315)
        .id(L3, 317)
        .id(R3, 318)
        .id(Touchpad, 330)
}

fn xbox_wireless() -> Overrides<GamepadInput> {
    let o = face_buttons(Overrides::new(), 305, 308, 307, 304);
    sticks(o, 32768.0, 32768.0)
        .id(RH, 2)
        .id(RV, 5)
        .id(LH, 0)
        .id(LV, 1)
        .id(R2, 9)
        .id(L2, 10)
        .offset(R2, 0.0)
        .offset(L2, 0.0)
        .amplitude(R2, 1024.0)
        .amplitude(L2, 1024.0)
        .id(PS, 316)
        .id(R1, 311)
        .id(L1, 310)
        .id(R3, 318)
        .id(L3, 317)
        .amplitude(DirH, -1.0)
        .amplitude(DirV, -1.0)
}

fn playstation3() -> Overrides<GamepadInput> {
    let o = face_buttons(Overrides::new(), 305, 307, 308, 304);
    sticks(o, 128.0, 128.0)
        .id(RH, 3)
        .id(RV, 4)
        .id(LH, 0)
        .id(LV, 1)
        .id(R2, 5)
        .id(L2, 2)
        .offset(R2, 0.0)
        .offset(L2, 0.0)
        .amplitude(R2, 255.0)
        .amplitude(L2, 255.0)
        .id(PS, 316)
        .id(R1, 311)
        .id(L1, 310)
        .id(R3, 318)
        .id(L3, 317)
        .amplitude(DirH, -1.0)
        .amplitude(DirV, -1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InputMap;
    use crate::fixed::FixedInputs;

    #[test]
    fn every_preset_builds_a_valid_table() {
        for preset in PRESETS {
            let inputs = FixedInputs::new(&preset.overrides());
            assert!(inputs.is_ok(), "{} does not build", preset.device_name);
        }
    }

    #[test]
    fn lookup_trims_the_reported_name() {
        let preset = find_preset("  Xbox Wireless Controller\n").unwrap();
        assert_eq!(preset.smoothing_epsilon, 0.1);
        assert!(find_preset("Joy-Con (L)").is_none());
    }

    #[test]
    fn xbox_wireless_remaps_triggers_and_sticks() {
        let inputs = FixedInputs::new(&find_preset("Xbox Wireless Controller").unwrap().overrides())
            .unwrap();
        assert_eq!(inputs.find_input(&2), Some(RH));
        assert_eq!(inputs.find_input(&9), Some(R2));
        assert_eq!(inputs.find_input(&10), Some(L2));
        assert_eq!(inputs.params(&LV).unwrap(), (32768.0, -32768.0));
        assert_eq!(inputs.params(&DirV).unwrap(), (0.0, -1.0));
    }

    #[test]
    fn dualshock_reaches_the_extra_buttons() {
        let inputs = FixedInputs::new(&find_preset("Wireless Controller").unwrap().overrides())
            .unwrap();
        assert_eq!(inputs.find_input(&314), Some(Create));
        assert_eq!(inputs.find_input(&315), Some(Options));
        assert_eq!(inputs.find_input(&317), Some(L3));
        assert_eq!(inputs.find_input(&318), Some(R3));
        assert_eq!(inputs.find_input(&330), Some(Touchpad));
    }

    #[test]
    fn unknown_device_follows_policy() {
        let meta = DeviceMeta::named("Mystery Pad");
        assert!(matches!(
            resolve_preset(&meta, UnknownDevicePolicy::Reject),
            Err(EngineError::UnknownDevice(name)) if name == "Mystery Pad"
        ));
        assert!(resolve_preset(&meta, UnknownDevicePolicy::Defaults)
            .unwrap()
            .is_none());
    }

    #[test]
    fn selection_prefers_known_devices() {
        let candidates = [
            DeviceMeta::named("Mystery Pad"),
            DeviceMeta::named("Wireless Controller"),
        ];
        let selection = select_device(&candidates, UnknownDevicePolicy::Reject).unwrap();
        assert_eq!(selection.index(), 1);
        assert_eq!(selection.preset().unwrap().device_name, "Wireless Controller");

        let unknown = [DeviceMeta::named("Mystery Pad")];
        assert!(select_device(&unknown, UnknownDevicePolicy::Reject).is_none());
        let fallback = select_device(&unknown, UnknownDevicePolicy::Defaults).unwrap();
        assert_eq!(fallback.index(), 0);
        assert!(fallback.preset().is_none());
        assert!(select_device(&[], UnknownDevicePolicy::Defaults).is_none());
    }
}
