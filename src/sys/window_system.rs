//! The seam between the arrangement logic and the desktop window manager.
//!
//! Everything the reactor needs from the OS goes through [`WindowSystem`]. The
//! Windows backend lives in `sys::win32`; tests drive the same code with an
//! in-memory desktop.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::SysError;
use crate::sys::geometry::{Point, Rect, Size};

/// Opaque OS window handle. Never assume it is still valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self { WindowId(raw) }

    pub const fn get(&self) -> u64 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "0x{:016X}", self.0) }
}

/// One display as reported by the OS, before the registry assigns it an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMonitor {
    pub frame: Rect,
    pub work_area: Rect,
}

pub trait WindowSystem {
    /// All active displays, in OS enumeration order.
    fn monitors(&self) -> Vec<RawMonitor>;

    /// Topmost window at a screen point, child windows included.
    fn window_at(&self, point: Point) -> Option<WindowId>;

    fn is_child(&self, id: WindowId) -> bool;

    fn parent(&self, id: WindowId) -> Option<WindowId>;

    fn is_window(&self, id: WindowId) -> bool;

    fn window_frame(&self, id: WindowId) -> Option<Rect>;

    fn window_title(&self, id: WindowId) -> String;

    fn top_level_windows(&self) -> Vec<WindowId>;

    /// Outer window size whose client area is `client`, given the window's
    /// current decoration. `None` when the adjustment cannot be computed.
    fn outer_size_for_client(&self, id: WindowId, client: Size) -> Option<Size>;

    /// Move and resize to `frame`, raise to the top of the z-order, don't activate.
    fn place_window(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError>;

    /// Force a window that was just placed to redraw and come forward.
    fn refresh_window(&mut self, id: WindowId);

    /// Move and resize to `frame` without touching z-order or activation.
    fn restore_frame(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError>;

    fn focus_window(&mut self, id: WindowId) -> bool;

    /// Get the tool's own window out of the way of an arranged result.
    fn minimize_shell(&mut self);

    fn install_capture_interception(&mut self) -> Result<(), SysError>;

    fn remove_capture_interception(&mut self);
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    #[derive(Debug, Clone)]
    pub struct FakeWindow {
        pub title: String,
        pub frame: Rect,
        pub parent: Option<WindowId>,
        pub child: bool,
        pub alive: bool,
        /// Border thickness (left, top, right, bottom) added around the client area.
        pub decoration: Option<(i32, i32, i32, i32)>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Place(WindowId, Rect),
        Refresh(WindowId),
        Restore(WindowId, Rect),
        Focus(WindowId),
        MinimizeShell,
        Install,
        Remove,
    }

    /// In-memory desktop. `z_order` lists windows topmost first.
    #[derive(Debug, Default)]
    pub struct FakeDesktop {
        pub monitors: Vec<RawMonitor>,
        pub windows: BTreeMap<WindowId, FakeWindow>,
        pub z_order: Vec<WindowId>,
        pub calls: Vec<Call>,
        pub fail_install: bool,
        pub failing_moves: BTreeSet<WindowId>,
        pub interception_installed: bool,
    }

    impl FakeDesktop {
        pub fn new() -> Self { Self::default() }

        pub fn with_monitor(mut self, frame: Rect, work_area: Rect) -> Self {
            self.monitors.push(RawMonitor { frame, work_area });
            self
        }

        pub fn add_window(&mut self, raw: u64, title: &str, frame: Rect) -> WindowId {
            let id = WindowId::new(raw);
            self.windows.insert(id, FakeWindow {
                title: title.to_string(),
                frame,
                parent: None,
                child: false,
                alive: true,
                decoration: None,
            });
            self.z_order.insert(0, id);
            id
        }

        pub fn add_child(&mut self, raw: u64, parent: WindowId, frame: Rect) -> WindowId {
            let id = self.add_window(raw, "", frame);
            let window = self.windows.get_mut(&id).unwrap();
            window.parent = Some(parent);
            window.child = true;
            id
        }

        pub fn close(&mut self, id: WindowId) {
            if let Some(window) = self.windows.get_mut(&id) {
                window.alive = false;
            }
        }

        pub fn frame_of(&self, id: WindowId) -> Rect { self.windows[&id].frame }

        pub fn placements(&self) -> Vec<(WindowId, Rect)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Place(id, rect) => Some((*id, *rect)),
                    _ => None,
                })
                .collect()
        }

        fn live(&self, id: WindowId) -> Option<&FakeWindow> {
            self.windows.get(&id).filter(|w| w.alive)
        }
    }

    impl WindowSystem for FakeDesktop {
        fn monitors(&self) -> Vec<RawMonitor> { self.monitors.clone() }

        fn window_at(&self, point: Point) -> Option<WindowId> {
            self.z_order
                .iter()
                .copied()
                .find(|id| self.live(*id).is_some_and(|w| w.frame.contains(point)))
        }

        fn is_child(&self, id: WindowId) -> bool { self.live(id).is_some_and(|w| w.child) }

        fn parent(&self, id: WindowId) -> Option<WindowId> { self.live(id)?.parent }

        fn is_window(&self, id: WindowId) -> bool { self.live(id).is_some() }

        fn window_frame(&self, id: WindowId) -> Option<Rect> { self.live(id).map(|w| w.frame) }

        fn window_title(&self, id: WindowId) -> String {
            self.live(id).map(|w| w.title.clone()).unwrap_or_default()
        }

        fn top_level_windows(&self) -> Vec<WindowId> {
            self.z_order.iter().copied().filter(|id| self.live(*id).is_some_and(|w| !w.child)).collect()
        }

        fn outer_size_for_client(&self, id: WindowId, client: Size) -> Option<Size> {
            let (l, t, r, b) = self.live(id)?.decoration?;
            Some(Size::new(client.width + l + r, client.height + t + b))
        }

        fn place_window(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError> {
            self.calls.push(Call::Place(id, frame));
            if self.failing_moves.contains(&id) {
                return Err(SysError::MoveFailed { id, reason: "access denied".into() });
            }
            let window = self.windows.get_mut(&id).filter(|w| w.alive).ok_or(SysError::WindowGone(id))?;
            window.frame = frame;
            Ok(())
        }

        fn refresh_window(&mut self, id: WindowId) { self.calls.push(Call::Refresh(id)); }

        fn restore_frame(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError> {
            self.calls.push(Call::Restore(id, frame));
            if self.failing_moves.contains(&id) {
                return Err(SysError::MoveFailed { id, reason: "access denied".into() });
            }
            let window = self.windows.get_mut(&id).filter(|w| w.alive).ok_or(SysError::WindowGone(id))?;
            window.frame = frame;
            Ok(())
        }

        fn focus_window(&mut self, id: WindowId) -> bool {
            self.calls.push(Call::Focus(id));
            self.live(id).is_some()
        }

        fn minimize_shell(&mut self) { self.calls.push(Call::MinimizeShell); }

        fn install_capture_interception(&mut self) -> Result<(), SysError> {
            self.calls.push(Call::Install);
            if self.fail_install {
                return Err(SysError::InterceptionInstall("hook rejected".into()));
            }
            self.interception_installed = true;
            Ok(())
        }

        fn remove_capture_interception(&mut self) {
            self.calls.push(Call::Remove);
            self.interception_installed = false;
        }
    }
}
