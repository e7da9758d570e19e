use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sys::geometry::Rect;
use crate::sys::window_system::{RawMonitor, WindowSystem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorDescriptor {
    pub index: usize,
    pub frame: Rect,
    pub work_area: Rect,
    pub label: String,
}

pub fn monitor_label(index: usize, frame: &Rect) -> String {
    format!("Monitor {} ({}x{})", index + 1, frame.width(), frame.height())
}

/// The latest display enumeration. Indices are only meaningful until the next
/// call to [`MonitorRegistry::update_screen_config`].
#[derive(Debug, Default)]
pub struct MonitorRegistry {
    monitors: Vec<MonitorDescriptor>,
}

impl MonitorRegistry {
    pub fn new() -> Self { Self::default() }

    /// Re-enumerates the displays, replacing everything cached before.
    ///
    /// Zero displays is not an error; the registry is simply empty and any
    /// lookup misses.
    pub fn update_screen_config<S: WindowSystem + ?Sized>(
        &mut self,
        system: &S,
    ) -> &[MonitorDescriptor] {
        let raw = system.monitors();
        debug!("monitors={raw:?}");
        if raw.is_empty() {
            warn!("No monitors reported");
        }

        self.monitors = raw
            .into_iter()
            .enumerate()
            .map(|(index, RawMonitor { frame, work_area })| MonitorDescriptor {
                index,
                frame,
                work_area,
                label: monitor_label(index, &frame),
            })
            .collect();
        &self.monitors
    }

    pub fn get(&self, index: usize) -> Option<&MonitorDescriptor> { self.monitors.get(index) }

    pub fn monitors(&self) -> &[MonitorDescriptor] { &self.monitors }

    pub fn is_empty(&self) -> bool { self.monitors.is_empty() }
}
