//! HID input report decoding.
//!
//! A [`ReportLayout`] says where each control lives in a device's input
//! report. Decoding turns a report into Linux-style `(type, code, value)`
//! events, so HID pads share the native id space (and the presets) of evdev
//! pads.
//!
//! Reports are state snapshots, not deltas. [`ReportLayout::diff`] compares a
//! report with the previous one and emits events only for fields whose value
//! changed, followed by a `SYN_REPORT` marker.
//!
//! Byte offsets include the report id byte, which hidapi places at index 0
//! for devices that use numbered reports.

use super::codes::*;
use super::RawGamepadEvent;

/// How a field's value is extracted from its byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole byte, unsigned.
    Byte,
    /// Single bit; `1` when `byte & mask != 0`.
    Bit(u8),
    /// Low nibble hat switch, horizontal component (`-1`, `0`, `1`).
    HatX,
    /// Low nibble hat switch, vertical component (`-1` up, `1` down).
    HatY,
}

#[derive(Clone, Copy, Debug)]
pub struct ReportField {
    pub event_type: u16,
    pub code: u16,
    pub byte: usize,
    pub kind: FieldKind,
}

const fn abs(code: u16, byte: usize) -> ReportField {
    ReportField {
        event_type: EV_ABS,
        code,
        byte,
        kind: FieldKind::Byte,
    }
}

const fn key(code: u16, byte: usize, mask: u8) -> ReportField {
    ReportField {
        event_type: EV_KEY,
        code,
        byte,
        kind: FieldKind::Bit(mask),
    }
}

const fn hat(code: u16, byte: usize, kind: FieldKind) -> ReportField {
    ReportField {
        event_type: EV_ABS,
        code,
        byte,
        kind,
    }
}

/// Input report structure of one device family.
#[derive(Debug)]
pub struct ReportLayout {
    pub name: &'static str,
    pub vendor_id: u16,
    pub product_ids: &'static [u16],
    /// Expected first byte, for devices with numbered reports.
    pub report_id: Option<u8>,
    pub fields: &'static [ReportField],
}

/// Sony DualShock 4 over USB, report `0x01`.
pub static DUALSHOCK4_USB: ReportLayout = ReportLayout {
    name: "DualShock 4 (USB)",
    vendor_id: 0x054c,
    product_ids: &[0x05c4, 0x09cc],
    report_id: Some(0x01),
    fields: &[
        abs(ABS_X, 1),
        abs(ABS_Y, 2),
        abs(ABS_RX, 3),
        abs(ABS_RY, 4),
        hat(ABS_HAT0X, 5, FieldKind::HatX),
        hat(ABS_HAT0Y, 5, FieldKind::HatY),
        key(BTN_WEST, 5, 0x10),
        key(BTN_SOUTH, 5, 0x20),
        key(BTN_EAST, 5, 0x40),
        key(BTN_NORTH, 5, 0x80),
        key(BTN_TL, 6, 0x01),
        key(BTN_TR, 6, 0x02),
        key(BTN_TL2, 6, 0x04),
        key(BTN_TR2, 6, 0x08),
        key(BTN_SELECT, 6, 0x10),
        key(BTN_START, 6, 0x20),
        key(BTN_THUMBL, 6, 0x40),
        key(BTN_THUMBR, 6, 0x80),
        key(BTN_MODE, 7, 0x01),
        key(BTN_TOUCH, 7, 0x02),
        abs(ABS_Z, 8),
        abs(ABS_RZ, 9),
    ],
};

/// Every layout the HID backend can decode.
pub static LAYOUTS: &[&ReportLayout] = &[&DUALSHOCK4_USB];

pub fn find_layout(vendor_id: u16, product_id: u16) -> Option<&'static ReportLayout> {
    LAYOUTS
        .iter()
        .copied()
        .find(|layout| layout.matches(vendor_id, product_id))
}

/// `(x, y)` of an 8-way hat nibble: `0` = up, clockwise; anything above 7 is neutral.
fn hat_axes(nibble: u8) -> (i32, i32) {
    match nibble {
        0 => (0, -1),
        1 => (1, -1),
        2 => (1, 0),
        3 => (1, 1),
        4 => (0, 1),
        5 => (-1, 1),
        6 => (-1, 0),
        7 => (-1, -1),
        _ => (0, 0),
    }
}

impl ReportLayout {
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_ids.contains(&product_id)
    }

    /// Smallest report that holds every field.
    pub fn min_len(&self) -> usize {
        self.fields.iter().map(|f| f.byte + 1).max().unwrap_or(0)
    }

    /// Field values of `report`, in field order; `None` if the report is not
    /// one this layout describes.
    pub fn values(&self, report: &[u8]) -> Option<Vec<i32>> {
        if report.len() < self.min_len() {
            return None;
        }
        if let Some(id) = self.report_id {
            if report.first() != Some(&id) {
                return None;
            }
        }
        let values = self
            .fields
            .iter()
            .map(|field| {
                let byte = report[field.byte];
                match field.kind {
                    FieldKind::Byte => i32::from(byte),
                    FieldKind::Bit(mask) => i32::from(byte & mask != 0),
                    FieldKind::HatX => hat_axes(byte & 0x0f).0,
                    FieldKind::HatY => hat_axes(byte & 0x0f).1,
                }
            })
            .collect();
        Some(values)
    }

    /// Events for every field of `report` that differs from `previous`
    /// (every field when there is no previous report).
    pub fn diff(&self, previous: Option<&[u8]>, report: &[u8]) -> Vec<RawGamepadEvent> {
        let Some(current) = self.values(report) else {
            return Vec::new();
        };
        let before = previous.and_then(|p| self.values(p));

        let mut events: Vec<RawGamepadEvent> = self
            .fields
            .iter()
            .zip(&current)
            .enumerate()
            .filter(|(i, (_, value))| before.as_ref().map_or(true, |b| b[*i] != **value))
            .map(|(_, (field, value))| RawGamepadEvent::new(field.event_type, field.code, *value))
            .collect();

        if !events.is_empty() {
            events.push(RawGamepadEvent::sync());
        }
        events
    }
}
