use tracing::trace;

use crate::actor::capture::CaptureState;
use crate::actor::notification_center::Notification;
use crate::actor::reactor::{Event, Reactor};
use crate::sys::event::{Disposition, KeyPress};
use crate::sys::geometry::Point;
use crate::sys::window_system::WindowSystem;

/// Entry points for the input hooks. These run inside the OS input path, so
/// they only touch capture state and the event queue.
pub struct InputEventHandler;

impl InputEventHandler {
    pub fn handle_pointer_down<S: WindowSystem>(reactor: &mut Reactor<S>, point: Point) -> Disposition {
        let before = reactor.store.len();
        let response = reactor.capture.on_pointer_down(&reactor.system, &mut reactor.store, point);
        if reactor.store.len() != before {
            reactor.needs_render = true;
        }
        if response.teardown {
            reactor.enqueue(Event::TeardownCapture);
        }
        response.disposition
    }

    pub fn handle_capture_key<S: WindowSystem>(reactor: &mut Reactor<S>, press: KeyPress) -> Disposition {
        let response = reactor.capture.on_key_down(press);
        if response.teardown {
            reactor.enqueue(Event::TeardownCapture);
        }
        response.disposition
    }

    pub fn handle_hotkey_key<S: WindowSystem>(reactor: &mut Reactor<S>, press: KeyPress) -> Disposition {
        if !reactor.hotkey.matches(&press) {
            return Disposition::PassThrough;
        }
        trace!(hotkey = %reactor.hotkey, "Hotkey pressed");
        reactor.enqueue(Event::Hotkey);
        Disposition::Suppress
    }

    pub fn handle_teardown<S: WindowSystem>(reactor: &mut Reactor<S>) {
        let message = match reactor.capture.finish(&mut reactor.system) {
            Some(CaptureState::Completed) => "All windows have been captured.",
            Some(_) => "Window capturing has been canceled.",
            None => return,
        };
        reactor.needs_render = true;
        reactor.notifications.post(Notification::info("Info", message));
    }
}
