use thiserror::Error;

use crate::sys::window_system::WindowId;

/// Failures reported by a [`WindowSystem`](crate::sys::window_system::WindowSystem) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SysError {
    #[error("failed to install input interception: {0}")]
    InterceptionInstall(String),

    #[error("failed to move window {id}: {reason}")]
    MoveFailed { id: WindowId, reason: String },

    #[error("window {0} is no longer available")]
    WindowGone(WindowId),
}

/// Errors surfaced to the user at the command boundary. The `Display` text is
/// the message the shell shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Please enter a valid number of windows to capture.")]
    InvalidCaptureCount(i64),

    #[error("Please enter a window title to capture.")]
    EmptyTitle,

    #[error("Window capturing is already in progress.")]
    CaptureInProgress,

    #[error("Cannot set hooks: {0}")]
    InterceptionUnavailable(String),

    #[error("Selected monitor not found.")]
    MonitorNotFound(usize),

    #[error("No windows to arrange. Please capture windows first.")]
    NothingToArrange,

    #[error("No valid windows to arrange.")]
    NoValidWindows,

    #[error(
        "Not enough vertical space for the specified spacing and Pixel Fix Y. Please reduce the spacing or Pixel Fix Y."
    )]
    LayoutInfeasible { available_height: i64 },

    #[error("Window positions would fall outside the screen. Please reduce Pixel Fix X or Pixel Fix Y.")]
    OffsetsOutOfRange,

    #[error("Window no longer available: {0}")]
    WindowGone(String),

    #[error("Could not restore {title}: {reason}")]
    RestoreFailed { title: String, reason: String },

    #[error("No captured window at position {0}.")]
    NoSuchPosition(usize),
}

/// Coarse classes used to pick how loudly an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InputValidation,
    StateConflict,
    ResourceUnavailable,
    EmptyInput,
    LayoutInfeasible,
    StaleReference,
}

impl CommandError {
    pub fn class(&self) -> ErrorClass {
        use CommandError::*;
        match self {
            InvalidCaptureCount(_) | EmptyTitle => ErrorClass::InputValidation,
            CaptureInProgress => ErrorClass::StateConflict,
            InterceptionUnavailable(_) | MonitorNotFound(_) => ErrorClass::ResourceUnavailable,
            NothingToArrange | NoValidWindows => ErrorClass::EmptyInput,
            LayoutInfeasible { .. } | OffsetsOutOfRange => ErrorClass::LayoutInfeasible,
            WindowGone(_) | RestoreFailed { .. } | NoSuchPosition(_) => ErrorClass::StaleReference,
        }
    }
}
