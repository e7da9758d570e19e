//! Outbox for user-facing messages.
//!
//! Operations post here and return; a shell drains the queue once the reactor
//! is no longer borrowed and presents it however it likes.

use std::collections::VecDeque;
use std::mem;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{error, info, warn};

use crate::common::error::{CommandError, ErrorClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub caption: String,
    pub message: String,
}

impl Notification {
    pub fn info(caption: &str, message: impl Into<String>) -> Self {
        Notification {
            severity: Severity::Info,
            caption: caption.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(caption: &str, message: impl Into<String>) -> Self {
        Notification {
            severity: Severity::Warning,
            caption: caption.to_string(),
            message: message.into(),
        }
    }

    pub fn error(caption: &str, message: impl Into<String>) -> Self {
        Notification {
            severity: Severity::Error,
            caption: caption.to_string(),
            message: message.into(),
        }
    }
}

impl From<&CommandError> for Notification {
    fn from(err: &CommandError) -> Self {
        match err.class() {
            ErrorClass::StaleReference => Notification::warning("Warning", err.to_string()),
            ErrorClass::StateConflict | ErrorClass::EmptyInput => {
                Notification::info("Info", err.to_string())
            }
            ErrorClass::InputValidation
            | ErrorClass::ResourceUnavailable
            | ErrorClass::LayoutInfeasible => Notification::error("Error", err.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: VecDeque<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self { Self::default() }

    pub fn post(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(message = %notification.message, "notify"),
            Severity::Warning => warn!(message = %notification.message, "notify"),
            Severity::Error => error!(message = %notification.message, "notify"),
        }
        self.pending.push_back(notification);
    }

    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    pub fn drain(&mut self) -> Vec<Notification> { mem::take(&mut self.pending).into() }
}

/// Something that can show a notification to the user.
pub trait Presenter {
    fn present(&mut self, notification: &Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_severity_by_class() {
        let n = Notification::from(&CommandError::WindowGone("Editor".into()));
        assert_eq!(n.severity, Severity::Warning);
        assert_eq!(n.message, "Window no longer available: Editor");

        let n = Notification::from(&CommandError::MonitorNotFound(3));
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.message, "Selected monitor not found.");

        let n = Notification::from(&CommandError::NothingToArrange);
        assert_eq!(n.severity, Severity::Info);
    }

    #[test_log::test]
    fn drain_empties_the_queue_in_order() {
        let mut center = NotificationCenter::new();
        center.post(Notification::info("Info", "one"));
        center.post(Notification::warning("Warning", "two"));

        let drained: Vec<String> = center.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["one", "two"]);
        assert!(center.is_empty());
    }
}
