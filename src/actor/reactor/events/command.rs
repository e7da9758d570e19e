use tracing::{info, warn};

use crate::actor::capture::capture_by_title;
use crate::actor::notification_center::Notification;
use crate::actor::reactor::{Command, Reactor};
use crate::common::config::ArrangeSettings;
use crate::common::error::CommandError;
use crate::layout_engine::{GridRequest, LayoutError, apply_plan, plan_grid};
use crate::model::store::MoveDirection;
use crate::sys::window_system::WindowSystem;

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_command<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        cmd: Command,
    ) -> Result<(), CommandError> {
        info!(?cmd);
        match cmd {
            Command::BeginCapture { count } => Self::handle_command_begin_capture(reactor, count),
            Command::CaptureByTitle { title } => {
                Self::handle_command_capture_by_title(reactor, &title)
            }
            Command::Restore => Self::handle_command_restore(reactor),
            Command::Clear => Self::handle_command_clear(reactor),
            Command::Arrange {
                monitor,
                offset_x,
                offset_y,
                min_spacing_y,
            } => Self::handle_command_arrange(reactor, ArrangeSettings {
                monitor,
                offset_x,
                offset_y,
                min_spacing_y,
            }),
            Command::Move { position, direction } => {
                Self::handle_command_move(reactor, position, direction);
                Ok(())
            }
            Command::Focus { position } => Self::handle_command_focus(reactor, position),
            Command::RefreshMonitors => {
                Self::handle_command_refresh_monitors(reactor);
                Ok(())
            }
            Command::SelectMonitor { index } => Self::handle_command_select_monitor(reactor, index),
            Command::List => Ok(()),
            Command::Quit => {
                reactor.request_quit();
                Ok(())
            }
        }
    }

    pub fn handle_command_begin_capture<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        count: i64,
    ) -> Result<(), CommandError> {
        reactor.capture.begin(&mut reactor.system, &mut reactor.store, count)?;
        reactor.notifications.post(Notification::info(
            "Info",
            "Click on the windows you wish to capture. Press ESC to cancel.",
        ));
        Ok(())
    }

    pub fn handle_command_capture_by_title<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        title: &str,
    ) -> Result<(), CommandError> {
        // Replacing the store under a click capture would hand the session
        // records it never counted.
        if reactor.capture.is_active() {
            return Err(CommandError::CaptureInProgress);
        }
        let matched = capture_by_title(&reactor.system, &mut reactor.store, title)?;
        let message = if matched == 0 {
            "No windows found with the specified title."
        } else {
            "All matching windows have been captured."
        };
        reactor.notifications.post(Notification::info("Info", message));
        Ok(())
    }

    pub fn handle_command_restore<S: WindowSystem>(
        reactor: &mut Reactor<S>,
    ) -> Result<(), CommandError> {
        for record in reactor.store.records() {
            let err = if !reactor.system.is_window(record.id) {
                CommandError::WindowGone(record.title.clone())
            } else if let Err(err) = reactor.system.restore_frame(record.id, record.frame) {
                warn!(%err, "Restore failed");
                CommandError::RestoreFailed {
                    title: record.title.clone(),
                    reason: err.to_string(),
                }
            } else {
                continue;
            };
            reactor.notifications.post(Notification::from(&err));
        }
        Ok(())
    }

    pub fn handle_command_clear<S: WindowSystem>(
        reactor: &mut Reactor<S>,
    ) -> Result<(), CommandError> {
        if reactor.capture.is_active() {
            return Err(CommandError::CaptureInProgress);
        }
        reactor.store.clear();
        reactor
            .notifications
            .post(Notification::info("Info", "All captured windows have been cleared."));
        Ok(())
    }

    /// Validates, plans, then moves. Nothing is moved unless the whole plan
    /// could be computed, and the settings the hotkey reuses only change when
    /// it was.
    pub fn handle_command_arrange<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        requested: ArrangeSettings,
    ) -> Result<(), CommandError> {
        let settings = ArrangeSettings {
            min_spacing_y: requested.min_spacing_y.max(0),
            ..requested
        };

        if reactor.store.is_empty() {
            return Err(CommandError::NothingToArrange);
        }

        let system = &reactor.system;
        for closed in reactor.store.retain_live(|id| system.is_window(id)) {
            reactor.notifications.post(Notification::info(
                "Info",
                format!("Window has been closed: {}", closed.title),
            ));
        }
        if reactor.store.is_empty() {
            return Err(CommandError::NoValidWindows);
        }

        let monitor = reactor
            .monitors
            .get(settings.monitor)
            .ok_or(CommandError::MonitorNotFound(settings.monitor))?;

        if requested.min_spacing_y < 0 {
            reactor.notifications.post(Notification::warning(
                "Invalid Input",
                "Minimum vertical spacing cannot be negative. Resetting to 0.",
            ));
        }

        let plan = plan_grid(&GridRequest {
            window_count: reactor.store.len(),
            work_area: monitor.work_area,
            offset_x: settings.offset_x,
            offset_y: settings.offset_y,
            min_spacing_y: settings.min_spacing_y,
        })
        .map_err(|err| match err {
            LayoutError::Infeasible { available } => {
                CommandError::LayoutInfeasible { available_height: available }
            }
            LayoutError::OutOfRange => CommandError::OffsetsOutOfRange,
            LayoutError::Empty => CommandError::NoValidWindows,
        })?;
        reactor.arrange = settings;
        info!(shape = ?plan.shape, monitor = %monitor.label, "Arranging");

        let report = apply_plan(&mut reactor.system, reactor.store.records(), &plan);
        if !report.gone.is_empty() || !report.failed.is_empty() {
            warn!(
                placed = report.placed.len(),
                gone = report.gone.len(),
                failed = report.failed.len(),
                "Arrangement incomplete"
            );
        }
        Ok(())
    }

    pub fn handle_command_move<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        position: usize,
        direction: MoveDirection,
    ) {
        if !reactor.store.move_record(position, direction) {
            info!(position, %direction, "Nothing to move");
        }
    }

    pub fn handle_command_focus<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        position: usize,
    ) -> Result<(), CommandError> {
        let record = reactor.store.get(position).ok_or(CommandError::NoSuchPosition(position + 1))?;
        if !reactor.system.focus_window(record.id) {
            return Err(CommandError::WindowGone(record.title.clone()));
        }
        Ok(())
    }

    pub fn handle_command_refresh_monitors<S: WindowSystem>(reactor: &mut Reactor<S>) {
        let count = reactor.monitors.update_screen_config(&reactor.system).len();
        reactor.arrange.monitor = 0;
        reactor
            .notifications
            .post(Notification::info("Info", format!("Found {count} monitor(s).")));
    }

    pub fn handle_command_select_monitor<S: WindowSystem>(
        reactor: &mut Reactor<S>,
        index: usize,
    ) -> Result<(), CommandError> {
        reactor.monitors.get(index).ok_or(CommandError::MonitorNotFound(index))?;
        reactor.arrange.monitor = index;
        Ok(())
    }
}
