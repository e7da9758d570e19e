use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sys::event::{Hotkey, KeyCode, Modifiers};

pub const ARRANGE_HOTKEY: Hotkey = Hotkey::new(KeyCode::J, Modifiers::CONTROL);
pub const CAPTURE_CANCEL_KEY: KeyCode = KeyCode::ESCAPE;
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_MIN_SPACING_Y: i32 = 20;

/// Parameters for an arrange. The hotkey reuses whatever was last set here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangeSettings {
    pub monitor: usize,
    pub offset_x: i32,
    pub offset_y: i32,
    pub min_spacing_y: i32,
}

impl Default for ArrangeSettings {
    fn default() -> Self {
        ArrangeSettings {
            monitor: 0,
            offset_x: 0,
            offset_y: 0,
            min_spacing_y: DEFAULT_MIN_SPACING_Y,
        }
    }
}

/// Runtime settings for one process. Nothing is read from or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub arrange: ArrangeSettings,
    pub hotkey: Hotkey,
    pub cancel_key: KeyCode,
    /// Show notifications as auto-dismissing message boxes as well as on the console.
    pub dialogs: bool,
    pub json: bool,
    pub notification_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            arrange: ArrangeSettings::default(),
            hotkey: ARRANGE_HOTKEY,
            cancel_key: CAPTURE_CANCEL_KEY,
            dialogs: false,
            json: false,
            notification_timeout: NOTIFICATION_TIMEOUT,
        }
    }
}
