use tracing::{debug, warn};

use crate::common::error::SysError;
use crate::layout_engine::grid::GridPlan;
use crate::model::store::WindowRecord;
use crate::sys::geometry::Rect;
use crate::sys::window_system::{WindowId, WindowSystem};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlacementReport {
    pub placed: Vec<(WindowId, Rect)>,
    /// Windows that closed between validation and their turn. Their cell is
    /// left empty.
    pub gone: Vec<WindowRecord>,
    pub failed: Vec<SysError>,
}

/// Moves `records` into `plan.cells`, pairing them up in order.
///
/// Each cell is a client area; the window is grown by its own decoration so
/// the client fills the cell. A window that can't be moved is skipped and the
/// rest carry on.
pub fn apply_plan<S: WindowSystem + ?Sized>(
    system: &mut S,
    records: &[WindowRecord],
    plan: &GridPlan,
) -> PlacementReport {
    let mut report = PlacementReport::default();

    for (record, cell) in records.iter().zip(&plan.cells) {
        if !system.is_window(record.id) {
            warn!(id = %record.id, title = %record.title, "Window closed before placement");
            report.gone.push(record.clone());
            continue;
        }

        let outer = system.outer_size_for_client(record.id, cell.size()).unwrap_or_else(|| {
            debug!(id = %record.id, "Falling back to cell size");
            cell.size()
        });
        let frame = Rect::from_origin_size(cell.origin(), outer);

        match system.place_window(record.id, frame) {
            Ok(()) => {
                system.refresh_window(record.id);
                report.placed.push((record.id, frame));
            }
            Err(err) => {
                warn!(%err, "Skipping window");
                report.failed.push(err);
            }
        }
    }

    system.minimize_shell();
    report
}
