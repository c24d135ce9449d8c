//! Device metadata snapshot.
//!
//! [`DeviceMeta`] describes a device found during discovery. Adapters fill in
//! what their platform reports; the product name is what preset lookup keys on.
//!
//! # Conventions
//! - `name` is the OS-reported product name, trimmed.
//! - `bus` is a short hint like `"evdev"` or `"hid"`.
//! - `path` is an OS path (opaque string) useful for diagnostics; it may change
//!   across reconnects, so treat it as diagnostic first, identity second.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Product name as reported by the driver/firmware.
    pub name: String,

    /// High-level source classification (e.g. `"evdev"`, `"hid"`, `"virtual"`).
    pub bus: Option<String>,

    /// USB Vendor ID, if known.
    pub vid: Option<u16>,

    /// USB Product ID, if known.
    pub pid: Option<u16>,

    /// OS path to the device.
    pub path: Option<String>,
}

impl DeviceMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ..Self::default()
        }
    }
}

impl fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " [{vid:04x}:{pid:04x}]")?;
        }
        if let Some(path) = &self.path {
            write!(f, " at {path}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_known_identity() {
        let meta = DeviceMeta {
            vid: Some(0x054c),
            pid: Some(0x05c4),
            path: Some("/dev/input/event7".into()),
            ..DeviceMeta::named("  Wireless Controller ")
        };
        assert_eq!(
            meta.to_string(),
            "Wireless Controller [054c:05c4] at /dev/input/event7"
        );
    }
}
