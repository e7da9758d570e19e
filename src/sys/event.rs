//! Input types shared by the interceptors and the platform hooks.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Virtual-key code as delivered by the keyboard interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const J: KeyCode = KeyCode(0x4A);

    pub const fn get(self) -> u32 { self.0 }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0x1B => f.write_str("Esc"),
            code @ (0x30..=0x39 | 0x41..=0x5A) => {
                write!(f, "{}", char::from_u32(code).unwrap_or('?'))
            }
            code => write!(f, "VK(0x{code:02X})"),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CONTROL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const WIN = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self { Self { key, modifiers } }

    pub const fn plain(key: KeyCode) -> Self { Self::new(key, Modifiers::empty()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self { Self { key, modifiers } }

    /// Extra modifiers held on top of the binding still match.
    pub fn matches(&self, press: &KeyPress) -> bool {
        press.key == self.key && press.modifiers.contains(self.modifiers)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::WIN, "Win"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// What an interceptor tells the OS to do with the event it just saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    PassThrough,
    Suppress,
}

impl Disposition {
    pub fn is_suppressed(self) -> bool { self == Disposition::Suppress }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkey_requires_its_modifiers() {
        let hotkey = Hotkey::new(KeyCode::J, Modifiers::CONTROL);
        assert!(hotkey.matches(&KeyPress::new(KeyCode::J, Modifiers::CONTROL)));
        assert!(hotkey.matches(&KeyPress::new(KeyCode::J, Modifiers::CONTROL | Modifiers::SHIFT)));
        assert!(!hotkey.matches(&KeyPress::plain(KeyCode::J)));
        assert!(!hotkey.matches(&KeyPress::new(KeyCode::ESCAPE, Modifiers::CONTROL)));
    }

    #[test]
    fn hotkey_display() {
        assert_eq!(Hotkey::new(KeyCode::J, Modifiers::CONTROL).to_string(), "Ctrl+J");
        assert_eq!(KeyCode(0x70).to_string(), "VK(0x70)");
    }
}
