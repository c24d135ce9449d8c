//! Keyboards.
//!
//! Every key is its own input: the keyboard engine is identity-mapped over
//! [`Key`], and a key's native id is the key itself. Presses read `1.0`,
//! releases `0.0`.
//!
//! Keyboard capture belongs to the host application (a window event loop, a
//! terminal, a global hook). The host forwards key transitions through a
//! [`VirtualFeed<KeyEvent>`] and the engine's worker consumes them from the
//! paired [`KeyboardSource`].
//!
//! Non-character keys are named through a fixed registry
//! ([`SpecialKey::ALL`] / [`Key::from_name`]).

use crate::backends::virtual_input::{self, VirtualFeed, VirtualReceiver};
use crate::device::EventSource;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::identity::IdentityInputs;
use crate::input::IdentityInput;
use crate::metadata::DeviceMeta;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! special_keys {
    ($($variant:ident => $name:literal,)*) => {
        /// Keys without a character of their own.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum SpecialKey {
            $($variant,)*
        }

        impl SpecialKey {
            /// Every special key, in registry order.
            pub const ALL: &'static [SpecialKey] = &[$(SpecialKey::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(SpecialKey::$variant => $name,)*
                }
            }
        }
    };
}

special_keys! {
    Alt => "alt",
    AltL => "alt_l",
    AltR => "alt_r",
    AltGr => "alt_gr",
    Backspace => "backspace",
    CapsLock => "caps_lock",
    Cmd => "cmd",
    CmdL => "cmd_l",
    CmdR => "cmd_r",
    Ctrl => "ctrl",
    CtrlL => "ctrl_l",
    CtrlR => "ctrl_r",
    Delete => "delete",
    Down => "down",
    End => "end",
    Enter => "enter",
    Esc => "esc",
    F1 => "f1",
    F2 => "f2",
    F3 => "f3",
    F4 => "f4",
    F5 => "f5",
    F6 => "f6",
    F7 => "f7",
    F8 => "f8",
    F9 => "f9",
    F10 => "f10",
    F11 => "f11",
    F12 => "f12",
    Home => "home",
    Insert => "insert",
    Left => "left",
    Menu => "menu",
    NumLock => "num_lock",
    PageDown => "page_down",
    PageUp => "page_up",
    Pause => "pause",
    PrintScreen => "print_screen",
    Right => "right",
    ScrollLock => "scroll_lock",
    Shift => "shift",
    ShiftL => "shift_l",
    ShiftR => "shift_r",
    Space => "space",
    Tab => "tab",
    Up => "up",
}

impl SpecialKey {
    pub fn from_name(name: &str) -> Option<SpecialKey> {
        SpecialKey::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A key that produces a character.
    Char(char),
    Special(SpecialKey),
}

impl Key {
    /// Resolve a key name: a registry name (`"esc"`, `"shift_l"`) or a single character.
    pub fn from_name(name: &str) -> Result<Key> {
        if let Some(special) = SpecialKey::from_name(name) {
            return Ok(Key::Special(special));
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Key::Char(c)),
            _ => Err(EngineError::conversion(name, "a keyboard key")),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Special(k) => k.name().to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Char(c)
    }
}

impl From<SpecialKey> for Key {
    fn from(k: SpecialKey) -> Self {
        Key::Special(k)
    }
}

impl IdentityInput for Key {
    fn label(&self) -> String {
        self.name()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Press,
    Release,
}

/// One key transition reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl VirtualFeed<KeyEvent> {
    pub fn press(&self, key: impl Into<Key>) -> Result<()> {
        self.send(KeyEvent {
            key: key.into(),
            action: KeyAction::Press,
        })
    }

    pub fn release(&self, key: impl Into<Key>) -> Result<()> {
        self.send(KeyEvent {
            key: key.into(),
            action: KeyAction::Release,
        })
    }

    /// Press then release.
    pub fn tap(&self, key: impl Into<Key>) -> Result<()> {
        let key = key.into();
        self.press(key)?;
        self.release(key)
    }
}

/// Keyboard adapter fed by the host application.
pub struct KeyboardSource {
    rx: VirtualReceiver<KeyEvent>,
}

impl KeyboardSource {
    /// A source plus the feed the host uses to report key transitions.
    pub fn new(name: &str) -> (VirtualFeed<KeyEvent>, Self) {
        let (feed, rx) = virtual_input::channel(DeviceMeta::named(name));
        (feed, Self { rx })
    }
}

impl EventSource for KeyboardSource {
    type Event = KeyEvent;
    type Id = Key;

    fn event_id(&self, event: &KeyEvent) -> Key {
        event.key
    }

    fn event_raw_value(&self, event: &KeyEvent) -> f32 {
        match event.action {
            KeyAction::Press => 1.0,
            KeyAction::Release => 0.0,
        }
    }

    fn read_inputs(&mut self) -> Result<Vec<KeyEvent>> {
        self.rx.read()
    }

    fn name(&self) -> &str {
        &self.rx.meta().name
    }
}

/// Identity-mapped engine over [`Key`].
pub type Keyboard = Engine<IdentityInputs<Key>>;

pub fn engine(smoothing_epsilon: f32) -> Result<Keyboard> {
    Engine::new(IdentityInputs::new(), smoothing_epsilon)
}
