use serde::{Deserialize, Serialize};

use crate::actor::capture::CaptureState;
use crate::model::store::WindowRecord;
use crate::sys::geometry::Rect;
use crate::sys::screen::MonitorDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRow {
    pub ordinal: usize,
    pub title: String,
    /// Handle formatted the way the window list shows it.
    pub handle: String,
    pub frame: Rect,
}

impl From<&WindowRecord> for WindowRow {
    fn from(record: &WindowRecord) -> Self {
        WindowRow {
            ordinal: record.ordinal,
            title: record.title.clone(),
            handle: record.id.to_string(),
            frame: record.frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRow {
    pub index: usize,
    pub label: String,
    pub work_area: Rect,
}

impl From<&MonitorDescriptor> for MonitorRow {
    fn from(monitor: &MonitorDescriptor) -> Self {
        MonitorRow {
            index: monitor.index,
            label: monitor.label.clone(),
            work_area: monitor.work_area,
        }
    }
}

/// Everything a shell needs to redraw itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub windows: Vec<WindowRow>,
    pub monitors: Vec<MonitorRow>,
    pub selected_monitor: usize,
    pub capture_state: CaptureState,
}
