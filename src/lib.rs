//! Input normalization and dispatch for keyboards and gamepads.
//!
//! Heterogeneous devices report input under their own native identifiers and
//! value ranges. An [`Engine`] maps those onto one canonical set of inputs and
//! one normalized value model, then hands every change to the listeners bound
//! to it.
//!
//! # Layers
//! - **Adapters** ([`EventSource`], [`backends`]) discover and connect devices
//!   and answer three questions about each raw event: valid? native id? raw value?
//! - **Input spaces** ([`InputMap`]) resolve native ids to canonical inputs and
//!   hold per-input `(offset, amplitude)`: [`FixedInputs`] for enumerated
//!   devices (gamepads), [`IdentityInputs`] for unbounded ones (keyboards).
//! - **Engines** normalize (`(raw - offset) / amplitude`), smooth (deadzone)
//!   and dispatch in registration order.
//! - **Bridges** ([`connect`]) forward normalized values between engines.
//! - **Workers** ([`Engine::background_loop`]) run an adapter's read loop on a
//!   dedicated thread.
//!
//! # Example
//! ```
//! use inputflow::backends::virtual_input;
//! use inputflow::binding::on_value;
//! use inputflow::gamepad::{self, codes, GamepadInput, GamepadSource, RawGamepadEvent};
//! use inputflow::metadata::DeviceMeta;
//! use inputflow::{EngineConfig, EventSource};
//!
//! let meta = DeviceMeta::named("Wireless Controller");
//! let preset = gamepad::presets::find_preset(&meta.name);
//! let pad = gamepad::engine_for(&meta, preset, &EngineConfig::default()).unwrap();
//! pad.bind(GamepadInput::LH, on_value(|v| println!("left stick x: {v}")))
//!     .unwrap();
//!
//! let (feed, rx) = virtual_input::channel::<RawGamepadEvent>(meta);
//! let mut source = GamepadSource::new(rx);
//! feed.set_axis(codes::ABS_X, 0).unwrap();
//!
//! for event in source.read_inputs().unwrap() {
//!     pad.handle_event(&source, event); // prints "left stick x: -1"
//! }
//! ```

pub mod backends;
pub mod binding;
pub mod bridge;
pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod event;
pub mod fixed;
pub mod gamepad;
pub mod identity;
pub mod input;
pub mod keyboard;
pub mod logger;
pub mod metadata;
pub mod worker;

pub use binding::InputListener;
pub use bridge::connect;
pub use config::EngineConfig;
pub use device::EventSource;
pub use engine::{Engine, InputMap};
pub use error::{EngineError, Result};
pub use event::{EventRecord, HandleOutcome};
pub use fixed::FixedInputs;
pub use identity::IdentityInputs;
pub use input::{IdentityInput, InputList, Overrides};
pub use logger::Logger;
pub use metadata::DeviceMeta;
pub use worker::{StopToken, Worker};
