//! Gamepads.
//!
//! Gamepad adapters (evdev, HID) all speak the same raw language: Linux input
//! event triples `(type, code, value)` where the code is the native id. The
//! engine side is a fixed-input-list engine over [`GamepadInput`], whose default
//! ids are the codes most pads report and whose per-device differences live in
//! [`presets`].
//!
//! # Example
//! ```
//! use inputflow::backends::virtual_input;
//! use inputflow::gamepad::{self, codes, GamepadInput, GamepadSource, RawGamepadEvent};
//! use inputflow::metadata::DeviceMeta;
//! use inputflow::EngineConfig;
//!
//! let meta = DeviceMeta::named("Wireless Controller");
//! let pad = gamepad::engine_for(&meta, gamepad::presets::find_preset(&meta.name), &EngineConfig::default())
//!     .unwrap();
//! let (feed, rx) = virtual_input::channel::<RawGamepadEvent>(meta);
//! let source = GamepadSource::new(rx);
//!
//! feed.set_axis(codes::ABS_X, 0).unwrap();
//! # let _ = (pad, source);
//! ```

pub mod presets;
pub mod report;

use crate::config::EngineConfig;
use crate::device::EventSource;
use crate::engine::Engine;
use crate::error::Result;
use crate::fixed::FixedInputs;
use crate::input::{InputList, Overrides};
use crate::metadata::DeviceMeta;
use log::info;
use presets::{DevicePreset, UnknownDevicePolicy};
use serde::{Deserialize, Serialize};

/// Linux input event types and codes used by gamepads
/// (from `<linux/input-event-codes.h>`).
pub mod codes {
    pub const EV_SYN: u16 = 0x00;
    pub const EV_KEY: u16 = 0x01;
    pub const EV_ABS: u16 = 0x03;
    pub const EV_MSC: u16 = 0x04;

    pub const SYN_REPORT: u16 = 0;

    pub const ABS_X: u16 = 0x00;
    pub const ABS_Y: u16 = 0x01;
    pub const ABS_Z: u16 = 0x02;
    pub const ABS_RX: u16 = 0x03;
    pub const ABS_RY: u16 = 0x04;
    pub const ABS_RZ: u16 = 0x05;
    pub const ABS_HAT0X: u16 = 0x10;
    pub const ABS_HAT0Y: u16 = 0x11;

    pub const BTN_SOUTH: u16 = 0x130;
    pub const BTN_EAST: u16 = 0x131;
    pub const BTN_NORTH: u16 = 0x133;
    pub const BTN_WEST: u16 = 0x134;
    pub const BTN_TL: u16 = 0x136;
    pub const BTN_TR: u16 = 0x137;
    pub const BTN_TL2: u16 = 0x138;
    pub const BTN_TR2: u16 = 0x139;
    pub const BTN_SELECT: u16 = 0x13a;
    pub const BTN_START: u16 = 0x13b;
    pub const BTN_MODE: u16 = 0x13c;
    pub const BTN_THUMBL: u16 = 0x13d;
    pub const BTN_THUMBR: u16 = 0x13e;
    pub const BTN_TOUCH: u16 = 0x14a;
}

/// Canonical gamepad inputs, named after the PlayStation layout.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamepadInput {
    Triangle,
    Square,
    Circle,
    Cross,
    L1,
    R1,
    L3,
    R3,
    Create,
    Options,
    PS,
    Touchpad,
    RH,
    RV,
    LH,
    LV,
    L2,
    R2,
    DirH,
    DirV,
}

impl InputList for GamepadInput {
    type Id = u16;

    const ALL: &'static [Self] = &[
        GamepadInput::Triangle,
        GamepadInput::Square,
        GamepadInput::Circle,
        GamepadInput::Cross,
        GamepadInput::L1,
        GamepadInput::R1,
        GamepadInput::L3,
        GamepadInput::R3,
        GamepadInput::Create,
        GamepadInput::Options,
        GamepadInput::PS,
        GamepadInput::Touchpad,
        GamepadInput::RH,
        GamepadInput::RV,
        GamepadInput::LH,
        GamepadInput::LV,
        GamepadInput::L2,
        GamepadInput::R2,
        GamepadInput::DirH,
        GamepadInput::DirV,
    ];

    fn name(self) -> &'static str {
        match self {
            GamepadInput::Triangle => "triangle",
            GamepadInput::Square => "square",
            GamepadInput::Circle => "circle",
            GamepadInput::Cross => "cross",
            GamepadInput::L1 => "L1",
            GamepadInput::R1 => "R1",
            GamepadInput::L3 => "L3",
            GamepadInput::R3 => "R3",
            GamepadInput::Create => "create",
            GamepadInput::Options => "options",
            GamepadInput::PS => "PS",
            GamepadInput::Touchpad => "touchpad",
            GamepadInput::RH => "RH",
            GamepadInput::RV => "RV",
            GamepadInput::LH => "LH",
            GamepadInput::LV => "LV",
            GamepadInput::L2 => "L2",
            GamepadInput::R2 => "R2",
            GamepadInput::DirH => "dirH",
            GamepadInput::DirV => "dirV",
        }
    }

    fn default_id(self) -> Option<u16> {
        use codes::*;
        match self {
            GamepadInput::L1 => Some(BTN_TL),
            GamepadInput::R1 => Some(BTN_TR),
            GamepadInput::L2 => Some(ABS_Z),
            GamepadInput::R2 => Some(ABS_RZ),
            GamepadInput::PS => Some(BTN_MODE),
            GamepadInput::LH => Some(ABS_X),
            GamepadInput::LV => Some(ABS_Y),
            GamepadInput::RH => Some(ABS_RX),
            GamepadInput::RV => Some(ABS_RY),
            GamepadInput::DirH => Some(ABS_HAT0X),
            GamepadInput::DirV => Some(ABS_HAT0Y),
            GamepadInput::Triangle => Some(BTN_NORTH),
            GamepadInput::Square => Some(BTN_WEST),
            GamepadInput::Circle => Some(BTN_EAST),
            GamepadInput::Cross => Some(BTN_SOUTH),
            GamepadInput::L3
            | GamepadInput::R3
            | GamepadInput::Create
            | GamepadInput::Options
            | GamepadInput::Touchpad => None,
        }
    }
}

/// One Linux input event as produced by a gamepad adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGamepadEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawGamepadEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    pub fn sync() -> Self {
        Self::new(codes::EV_SYN, codes::SYN_REPORT, 0)
    }

    /// Synchronization and miscellaneous events carry no input state.
    pub fn is_input(&self) -> bool {
        self.event_type != codes::EV_SYN && self.event_type != codes::EV_MSC
    }
}

/// Raw side of a gamepad adapter: a connected device that yields event batches.
pub trait GamepadReader: Send + 'static {
    /// Block for the next batch of raw events; empty on timeout.
    fn read_raw(&mut self) -> Result<Vec<RawGamepadEvent>>;

    fn meta(&self) -> &DeviceMeta;
}

/// [`EventSource`] for any [`GamepadReader`].
pub struct GamepadSource<R> {
    reader: R,
}

impl<R: GamepadReader> GamepadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn meta(&self) -> &DeviceMeta {
        self.reader.meta()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: GamepadReader> EventSource for GamepadSource<R> {
    type Event = RawGamepadEvent;
    type Id = u16;

    fn valid_event(&self, event: &RawGamepadEvent) -> bool {
        event.is_input()
    }

    fn event_id(&self, event: &RawGamepadEvent) -> u16 {
        event.code
    }

    fn event_raw_value(&self, event: &RawGamepadEvent) -> f32 {
        event.value as f32
    }

    fn read_inputs(&mut self) -> Result<Vec<RawGamepadEvent>> {
        self.reader.read_raw()
    }

    fn name(&self) -> &str {
        &self.reader.meta().name
    }
}

pub type GamepadInputs = FixedInputs<GamepadInput>;

/// Fixed-input-list engine over [`GamepadInput`].
pub type Gamepad = Engine<GamepadInputs>;

/// Gamepad-level configuration: engine overrides plus discovery behaviour.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    #[serde(flatten)]
    pub engine: EngineConfig<u16>,
    /// What to do with a device that has no preset.
    pub unknown_device: UnknownDevicePolicy,
    /// Re-scan interval while waiting for a device; `None` scans once.
    pub discovery_interval_ms: Option<u64>,
}

impl GamepadConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the engine for an already connected device, applying
    /// [`unknown_device`](Self::unknown_device) when it has no preset.
    pub fn engine_for(&self, meta: &DeviceMeta) -> Result<Gamepad> {
        let preset = presets::resolve_preset(meta, self.unknown_device)?;
        engine_for(meta, preset, &self.engine)
    }
}

/// Build a gamepad engine for a connected device.
///
/// Parameters are layered: declared defaults, then `preset`, then `config`.
/// A `config.smoothing_epsilon` that is set, `0.0` included, wins over the preset's.
pub fn engine_for(
    meta: &DeviceMeta,
    preset: Option<&DevicePreset>,
    config: &EngineConfig<u16>,
) -> Result<Gamepad> {
    let mut overrides = Overrides::new();
    let mut epsilon = 0.0;
    if let Some(preset) = preset {
        overrides.merge(&preset.overrides());
        epsilon = preset.smoothing_epsilon;
    }
    overrides.merge(&config.resolve::<GamepadInput>()?);
    if let Some(user) = config.smoothing_epsilon {
        epsilon = user;
    }
    info!(
        "gamepad '{}': {} preset, smoothing {epsilon}",
        meta.name,
        preset.map_or("no", |p| p.device_name)
    );
    Engine::new(FixedInputs::new(&overrides)?, epsilon)
}
