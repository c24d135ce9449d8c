//! Device adapters.
//!
//! Each backend turns a device family into something an engine's read loop can
//! consume: gamepad backends implement
//! [`GamepadReader`](crate::gamepad::GamepadReader), the virtual backend feeds
//! any event type through a channel.
//!
//! # Feature flags
//! - **`evdev`** (default): Linux gamepads through `/dev/input`.
//! - **`hid`**: gamepads through hidapi, for devices with a known report layout.

pub mod virtual_input;

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
pub mod evdev;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;
