//! Click-to-capture session and capture by title.
//!
//! The session itself never installs or removes interception from inside an
//! input callback. Finishing or cancelling only flags that a teardown is due;
//! the reactor runs it on its next pass through the event queue.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::error::CommandError;
use crate::model::store::WindowStore;
use crate::sys::event::{Disposition, KeyCode, KeyPress};
use crate::sys::geometry::Point;
use crate::sys::window_system::{WindowId, WindowSystem};

/// Parent walks stop after this many hops. Real window trees are shallow; a
/// cycle reported by a misbehaving backend would otherwise never end.
const MAX_PARENT_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureState {
    Idle,
    Capturing { target: usize, captured: usize },
    Completed,
    Cancelled,
}

impl CaptureState {
    pub fn is_capturing(&self) -> bool { matches!(self, CaptureState::Capturing { .. }) }
}

/// What an input callback should do with the event, and whether the session
/// just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptResponse {
    pub disposition: Disposition,
    pub teardown: bool,
}

impl InterceptResponse {
    const PASS: InterceptResponse =
        InterceptResponse { disposition: Disposition::PassThrough, teardown: false };
    const SWALLOW: InterceptResponse =
        InterceptResponse { disposition: Disposition::Suppress, teardown: false };
    const END: InterceptResponse =
        InterceptResponse { disposition: Disposition::Suppress, teardown: true };
}

#[derive(Debug)]
pub struct CaptureSession {
    state: CaptureState,
    cancel_key: KeyCode,
}

impl Default for CaptureSession {
    fn default() -> Self { CaptureSession::new(KeyCode::ESCAPE) }
}

impl CaptureSession {
    pub fn new(cancel_key: KeyCode) -> Self { CaptureSession { state: CaptureState::Idle, cancel_key } }

    pub fn state(&self) -> CaptureState { self.state }

    /// A session counts as active until its teardown has run, not just while
    /// it is still collecting clicks.
    pub fn is_active(&self) -> bool { self.state != CaptureState::Idle }

    /// Starts a session for `count` windows. Interception is installed before
    /// anything else changes, so a failure leaves both the store and the
    /// session exactly as they were.
    pub fn begin<S: WindowSystem + ?Sized>(
        &mut self,
        system: &mut S,
        store: &mut WindowStore,
        count: i64,
    ) -> Result<(), CommandError> {
        if self.is_active() {
            return Err(CommandError::CaptureInProgress);
        }
        let target = usize::try_from(count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(CommandError::InvalidCaptureCount(count))?;

        system
            .install_capture_interception()
            .map_err(|err| CommandError::InterceptionUnavailable(err.to_string()))?;

        store.clear();
        self.state = CaptureState::Capturing { target, captured: 0 };
        info!(target, "Capture started");
        Ok(())
    }

    /// Pointer-button-down anywhere on the desktop. Every click is swallowed
    /// while a session exists, including after the last window was taken and
    /// before teardown has run.
    pub fn on_pointer_down<S: WindowSystem + ?Sized>(
        &mut self,
        system: &S,
        store: &mut WindowStore,
        point: Point,
    ) -> InterceptResponse {
        let CaptureState::Capturing { target, captured } = self.state else {
            return if self.is_active() { InterceptResponse::SWALLOW } else { InterceptResponse::PASS };
        };

        let Some(id) = top_level_window_at(system, point) else {
            debug!(?point, "Click hit no window");
            return InterceptResponse::SWALLOW;
        };
        let Some(frame) = system.window_frame(id) else {
            return InterceptResponse::SWALLOW;
        };
        let title = system.window_title(id);

        if !store.push(id, title, frame) {
            debug!(%id, "Window already captured");
            return InterceptResponse::SWALLOW;
        }

        let captured = captured + 1;
        debug!(%id, captured, target, "Captured window");
        if captured >= target {
            self.state = CaptureState::Completed;
            InterceptResponse::END
        } else {
            self.state = CaptureState::Capturing { target, captured };
            InterceptResponse::SWALLOW
        }
    }

    /// Key-down while the capture interceptor is installed. Only the cancel
    /// key is ever consumed.
    pub fn on_key_down(&mut self, press: KeyPress) -> InterceptResponse {
        if press.key != self.cancel_key || !self.state.is_capturing() {
            return InterceptResponse::PASS;
        }
        self.state = CaptureState::Cancelled;
        InterceptResponse::END
    }

    /// Runs the deferred teardown. Returns the state the session ended in, or
    /// `None` if there was nothing to tear down.
    pub fn finish<S: WindowSystem + ?Sized>(&mut self, system: &mut S) -> Option<CaptureState> {
        let ended = match self.state {
            CaptureState::Completed | CaptureState::Cancelled => self.state,
            _ => return None,
        };
        system.remove_capture_interception();
        self.state = CaptureState::Idle;
        info!(?ended, "Capture finished");
        Some(ended)
    }

    /// Drops any session in progress, e.g. on shutdown.
    pub fn abort<S: WindowSystem + ?Sized>(&mut self, system: &mut S) {
        if self.is_active() {
            system.remove_capture_interception();
            self.state = CaptureState::Idle;
        }
    }
}

/// The window under `point`, walked up to its top-level ancestor.
pub fn top_level_window_at<S: WindowSystem + ?Sized>(system: &S, point: Point) -> Option<WindowId> {
    let mut id = system.window_at(point)?;
    for _ in 0..MAX_PARENT_DEPTH {
        if !system.is_child(id) {
            break;
        }
        match system.parent(id) {
            Some(parent) => id = parent,
            None => break,
        }
    }
    Some(id)
}

/// Replaces the store with every top-level window whose title equals `title`,
/// ignoring case. Returns how many were captured.
pub fn capture_by_title<S: WindowSystem + ?Sized>(
    system: &S,
    store: &mut WindowStore,
    title: &str,
) -> Result<usize, CommandError> {
    if title.is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    let wanted = title.to_lowercase();

    store.clear();
    for id in system.top_level_windows() {
        let candidate = system.window_title(id);
        if candidate.to_lowercase() != wanted {
            continue;
        }
        let Some(frame) = system.window_frame(id) else { continue };
        store.push(id, candidate, frame);
    }
    debug!(title, matched = store.len(), "Captured by title");
    Ok(store.len())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::event::Modifiers;
    use crate::sys::geometry::Rect;
    use crate::sys::window_system::fake::{Call, FakeDesktop};

    fn desktop() -> FakeDesktop {
        let mut desktop = FakeDesktop::new();
        desktop.add_window(1, "Editor", Rect::new(0, 0, 500, 500));
        desktop.add_window(2, "Terminal", Rect::new(600, 0, 1100, 500));
        desktop.add_window(3, "Browser", Rect::new(0, 600, 500, 1000));
        desktop
    }

    fn ids(store: &WindowStore) -> Vec<u64> { store.records().iter().map(|r| r.id.get()).collect() }

    #[test]
    fn repeated_clicks_capture_a_window_once() {
        let mut system = desktop();
        let mut store = WindowStore::new();
        let mut session = CaptureSession::default();
        session.begin(&mut system, &mut store, 3).unwrap();

        for _ in 0..4 {
            let response = session.on_pointer_down(&system, &mut store, Point::new(10, 10));
            assert_eq!(response.disposition, Disposition::Suppress);
            assert!(!response.teardown);
        }
        assert_eq!(ids(&store), vec![1]);
        assert_eq!(session.state(), CaptureState::Capturing { target: 3, captured: 1 });
    }

    #[test]
    fn clicks_after_completion_are_swallowed_without_capturing() {
        let mut system = desktop();
        let mut store = WindowStore::new();
        let mut session = CaptureSession::default();
        session.begin(&mut system, &mut store, 2).unwrap();

        session.on_pointer_down(&system, &mut store, Point::new(10, 10));
        let response = session.on_pointer_down(&system, &mut store, Point::new(700, 10));
        assert!(response.teardown);
        assert_eq!(session.state(), CaptureState::Completed);

        let response = session.on_pointer_down(&system, &mut store, Point::new(10, 700));
        assert_eq!(response, InterceptResponse::SWALLOW);
        assert_eq!(ids(&store), vec![1, 2]);
        assert!(system.interception_installed);

        assert_eq!(session.finish(&mut system), Some(CaptureState::Completed));
        assert_eq!(session.state(), CaptureState::Idle);
        assert!(!system.interception_installed);

        let response = session.on_pointer_down(&system, &mut store, Point::new(10, 700));
        assert_eq!(response, InterceptResponse::PASS);
    }

    #[test]
    fn clicks_on_children_capture_the_top_level_window() {
        let mut system = desktop();
        let editor = WindowId::new(1);
        let pane = system.add_child(10, editor, Rect::new(10, 10, 200, 200));
        system.add_child(11, pane, Rect::new(20, 20, 50, 50));
        let mut store = WindowStore::new();
        let mut session = CaptureSession::default();
        session.begin(&mut system, &mut store, 1).unwrap();

        session.on_pointer_down(&system, &mut store, Point::new(25, 25));

        assert_eq!(ids(&store), vec![1]);
        assert_eq!(store.get(0).map(|r| r.title.as_str()), Some("Editor"));
    }

    #[test]
    fn escape_cancels_and_other_keys_pass() {
        let mut system = desktop();
        let mut store = WindowStore::new();
        let mut session = CaptureSession::default();
        session.begin(&mut system, &mut store, 2).unwrap();

        let response = session.on_key_down(KeyPress::new(KeyCode::J, Modifiers::CONTROL));
        assert_eq!(response, InterceptResponse::PASS);

        let response = session.on_key_down(KeyPress::plain(KeyCode::ESCAPE));
        assert_eq!(response, InterceptResponse::END);
        assert_eq!(session.state(), CaptureState::Cancelled);

        // a second escape before teardown isn't consumed
        assert_eq!(session.on_key_down(KeyPress::plain(KeyCode::ESCAPE)), InterceptResponse::PASS);
        assert_eq!(session.finish(&mut system), Some(CaptureState::Cancelled));
    }

    #[test]
    fn begin_validates_before_touching_anything() {
        let mut system = desktop();
        let mut store = WindowStore::new();
        store.push(WindowId::new(3), "Browser".into(), Rect::default());
        let mut session = CaptureSession::default();

        assert_eq!(
            session.begin(&mut system, &mut store, 0),
            Err(CommandError::InvalidCaptureCount(0))
        );
        assert_eq!(
            session.begin(&mut system, &mut store, -4),
            Err(CommandError::InvalidCaptureCount(-4))
        );
        assert!(system.calls.is_empty());
        assert_eq!(store.len(), 1);

        session.begin(&mut system, &mut store, 1).unwrap();
        assert!(store.is_empty());
        assert_eq!(session.begin(&mut system, &mut store, 1), Err(CommandError::CaptureInProgress));
        assert_eq!(system.calls, vec![Call::Install]);
    }

    #[test]
    fn install_failure_leaves_store_and_state() {
        let mut system = desktop();
        system.fail_install = true;
        let mut store = WindowStore::new();
        store.push(WindowId::new(3), "Browser".into(), Rect::default());
        let mut session = CaptureSession::default();

        let err = session.begin(&mut system, &mut store, 2).unwrap_err();

        assert!(matches!(err, CommandError::InterceptionUnavailable(_)));
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(ids(&store), vec![3]);
    }

    #[test]
    fn title_match_is_exact_but_case_insensitive() {
        let mut system = FakeDesktop::new();
        system.add_window(1, "NOTEPAD", Rect::new(0, 0, 10, 10));
        system.add_window(2, "Notepad2", Rect::new(0, 0, 10, 10));
        system.add_window(3, "notepad", Rect::new(0, 0, 10, 10));
        let mut store = WindowStore::new();
        store.push(WindowId::new(9), "old".into(), Rect::default());

        let matched = capture_by_title(&system, &mut store, "Notepad").unwrap();

        assert_eq!(matched, 2);
        let mut captured = ids(&store);
        captured.sort();
        assert_eq!(captured, vec![1, 3]);
    }

    #[test]
    fn empty_title_is_rejected_without_clearing() {
        let system = desktop();
        let mut store = WindowStore::new();
        store.push(WindowId::new(1), "Editor".into(), Rect::default());

        assert_eq!(capture_by_title(&system, &mut store, ""), Err(CommandError::EmptyTitle));
        assert_eq!(store.len(), 1);
    }
}
