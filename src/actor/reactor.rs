//! The reactor owns all mutable state of a running session and is the only
//! thing that changes it.
//!
//! Commands from the shell and events from the input hooks both end up here.
//! Hooks run inside the OS input path, so they only update the capture state
//! and queue follow-up events; anything slow or re-entrant (removing hooks,
//! moving windows, showing messages) happens when the owner next calls
//! [`Reactor::run_pending`].

pub mod events;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::actor::capture::CaptureSession;
use crate::actor::notification_center::{Notification, NotificationCenter};
use crate::common::config::{ArrangeSettings, Settings};
use crate::model::snapshot::{MonitorRow, Snapshot, WindowRow};
use crate::model::store::{MoveDirection, WindowStore};
use crate::sys::event::{Disposition, Hotkey, KeyPress};
use crate::sys::geometry::Point;
use crate::sys::screen::MonitorRegistry;
use crate::sys::window_system::WindowSystem;
use events::command::CommandEventHandler;
use events::input::InputEventHandler;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    BeginCapture { count: i64 },
    CaptureByTitle { title: String },
    Restore,
    Clear,
    Arrange {
        monitor: usize,
        offset_x: i32,
        offset_y: i32,
        min_spacing_y: i32,
    },
    /// `position` is the zero-based row in the window list.
    Move { position: usize, direction: MoveDirection },
    Focus { position: usize },
    RefreshMonitors,
    SelectMonitor { index: usize },
    List,
    Quit,
}

impl Command {
    pub fn arrange(settings: ArrangeSettings) -> Self {
        Command::Arrange {
            monitor: settings.monitor,
            offset_x: settings.offset_x,
            offset_y: settings.offset_y,
            min_spacing_y: settings.min_spacing_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// Remove the capture hooks and report how the session ended. Always
    /// queued from a hook, never run inside one.
    TeardownCapture,
    /// The arrange hotkey fired.
    Hotkey,
}

pub struct Reactor<S: WindowSystem> {
    pub(crate) system: S,
    pub(crate) store: WindowStore,
    pub(crate) capture: CaptureSession,
    pub(crate) monitors: MonitorRegistry,
    pub(crate) arrange: ArrangeSettings,
    pub(crate) hotkey: Hotkey,
    pub(crate) notifications: NotificationCenter,
    pending: VecDeque<Event>,
    needs_render: bool,
    quit: bool,
}

impl<S: WindowSystem> Reactor<S> {
    pub fn new(system: S, settings: &Settings) -> Self {
        let mut monitors = MonitorRegistry::new();
        monitors.update_screen_config(&system);
        Reactor {
            system,
            store: WindowStore::new(),
            capture: CaptureSession::new(settings.cancel_key),
            monitors,
            arrange: settings.arrange,
            hotkey: settings.hotkey,
            notifications: NotificationCenter::new(),
            pending: VecDeque::new(),
            needs_render: true,
            quit: false,
        }
    }

    pub fn enqueue(&mut self, event: Event) { self.pending.push_back(event); }

    pub fn has_pending(&self) -> bool { !self.pending.is_empty() }

    /// Handles queued events until the queue is empty, including any queued
    /// while handling.
    pub fn run_pending(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.handle_event(event);
        }
    }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        debug!(?event, "Event");
        match event {
            Event::Command(cmd) => self.dispatch(cmd),
            Event::TeardownCapture => InputEventHandler::handle_teardown(self),
            Event::Hotkey => {
                info!("Arrange hotkey");
                self.dispatch(Command::arrange(self.arrange));
            }
        }
    }

    /// Runs one command to completion. Failures become notifications; nothing
    /// escapes.
    #[instrument(name = "reactor::dispatch", skip_all)]
    pub fn dispatch(&mut self, cmd: Command) {
        self.needs_render = true;
        if let Err(err) = CommandEventHandler::handle_command(self, cmd) {
            self.notifications.post(Notification::from(&err));
        }
    }

    pub fn on_pointer_down(&mut self, point: Point) -> Disposition {
        InputEventHandler::handle_pointer_down(self, point)
    }

    pub fn on_capture_key(&mut self, press: KeyPress) -> Disposition {
        InputEventHandler::handle_capture_key(self, press)
    }

    pub fn on_hotkey_key(&mut self, press: KeyPress) -> Disposition {
        InputEventHandler::handle_hotkey_key(self, press)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> { self.notifications.drain() }

    /// True once after anything the snapshot shows may have changed.
    pub fn take_needs_render(&mut self) -> bool { std::mem::take(&mut self.needs_render) }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            windows: self.store.records().iter().map(WindowRow::from).collect(),
            monitors: self.monitors.monitors().iter().map(MonitorRow::from).collect(),
            selected_monitor: self.arrange.monitor,
            capture_state: self.capture.state(),
        }
    }

    pub fn settings(&self) -> ArrangeSettings { self.arrange }

    pub fn should_quit(&self) -> bool { self.quit }

    pub(crate) fn request_quit(&mut self) { self.quit = true; }

    /// Removes any hooks a capture left installed.
    pub fn shutdown(&mut self) {
        self.capture.abort(&mut self.system);
        self.pending.clear();
    }

    pub fn system(&self) -> &S { &self.system }

    pub fn system_mut(&mut self) -> &mut S { &mut self.system }
}
