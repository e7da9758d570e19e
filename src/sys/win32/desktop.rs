use std::ffi::c_void;

use tracing::{debug, trace, warn};
use windows::Win32::Foundation::{HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, RDW_ALLCHILDREN, RDW_ERASE,
    RDW_FRAME, RDW_INVALIDATE, RDW_UPDATENOW, REDRAW_WINDOW_FLAGS, RedrawWindow,
};
use windows::Win32::System::Console::GetConsoleWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, EnumWindows, GWL_EXSTYLE, GWL_STYLE, GetMenu, GetParent, GetWindowLongW,
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, HWND_TOP, IsIconic, IsWindow,
    SW_MINIMIZE, SW_RESTORE, SWP_NOACTIVATE, SWP_NOZORDER, SWP_SHOWWINDOW, SetForegroundWindow,
    SetWindowPos, ShowWindow, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WindowFromPoint,
};
use windows::core::BOOL;

use super::hooks::CaptureHooks;
use crate::common::error::SysError;
use crate::sys::geometry::{Point, Rect, Size};
use crate::sys::window_system::{RawMonitor, WindowId, WindowSystem};

/// Repaints frame, client and children right away, without waiting for the
/// window's next `WM_PAINT`.
const REFRESH_FLAGS: REDRAW_WINDOW_FLAGS = REDRAW_WINDOW_FLAGS(
    RDW_INVALIDATE.0 | RDW_ERASE.0 | RDW_FRAME.0 | RDW_ALLCHILDREN.0 | RDW_UPDATENOW.0,
);

pub(super) fn hwnd(id: WindowId) -> HWND { HWND(id.get() as usize as *mut c_void) }

pub(super) fn window_id(hwnd: HWND) -> WindowId { WindowId::new(hwnd.0 as usize as u64) }

fn rect(r: RECT) -> Rect { Rect::new(r.left, r.top, r.right, r.bottom) }

/// The live desktop. Capture hooks are owned here so that removing them is
/// just dropping the handles.
#[derive(Default)]
pub struct Win32Desktop {
    capture_hooks: Option<CaptureHooks>,
}

impl Win32Desktop {
    pub fn new() -> Self { Self::default() }
}

unsafe extern "system" fn enum_monitors_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the &mut Vec passed to EnumDisplayMonitors below, which
    // outlives the enumeration.
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<RawMonitor>) };
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if unsafe { GetMonitorInfoW(hmonitor, &mut info) }.as_bool() {
        monitors.push(RawMonitor {
            frame: rect(info.rcMonitor),
            work_area: rect(info.rcWork),
        });
    }
    BOOL(1)
}

unsafe extern "system" fn enum_windows_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: see enum_monitors_callback.
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowId>) };
    windows.push(window_id(hwnd));
    BOOL(1)
}

impl WindowSystem for Win32Desktop {
    fn monitors(&self) -> Vec<RawMonitor> {
        let mut monitors: Vec<RawMonitor> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitors_callback),
                LPARAM(&mut monitors as *mut Vec<RawMonitor> as isize),
            )
        };
        if !ok.as_bool() {
            warn!("EnumDisplayMonitors failed");
        }
        monitors
    }

    fn window_at(&self, point: Point) -> Option<WindowId> {
        let hwnd = unsafe { WindowFromPoint(POINT { x: point.x, y: point.y }) };
        (!hwnd.is_invalid()).then(|| window_id(hwnd))
    }

    fn is_child(&self, id: WindowId) -> bool {
        let style = unsafe { GetWindowLongW(hwnd(id), GWL_STYLE) } as u32;
        style & WS_CHILD.0 != 0
    }

    fn parent(&self, id: WindowId) -> Option<WindowId> {
        let parent = unsafe { GetParent(hwnd(id)) }.ok()?;
        (!parent.is_invalid()).then(|| window_id(parent))
    }

    fn is_window(&self, id: WindowId) -> bool { unsafe { IsWindow(Some(hwnd(id))) }.as_bool() }

    fn window_frame(&self, id: WindowId) -> Option<Rect> {
        let mut r = RECT::default();
        unsafe { GetWindowRect(hwnd(id), &mut r) }.ok()?;
        Some(rect(r))
    }

    fn window_title(&self, id: WindowId) -> String {
        let hwnd = hwnd(id);
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
        String::from_utf16_lossy(&buf[..copied.max(0) as usize])
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = Vec::new();
        let result = unsafe {
            EnumWindows(
                Some(enum_windows_callback),
                LPARAM(&mut windows as *mut Vec<WindowId> as isize),
            )
        };
        if let Err(err) = result {
            warn!(%err, "EnumWindows failed");
        }
        windows
    }

    fn outer_size_for_client(&self, id: WindowId, client: Size) -> Option<Size> {
        let hwnd = hwnd(id);
        let mut r = RECT {
            left: 0,
            top: 0,
            right: client.width,
            bottom: client.height,
        };
        unsafe {
            let style = WINDOW_STYLE(GetWindowLongW(hwnd, GWL_STYLE) as u32);
            let ex_style = WINDOW_EX_STYLE(GetWindowLongW(hwnd, GWL_EXSTYLE) as u32);
            let has_menu = !GetMenu(hwnd).is_invalid();
            AdjustWindowRectEx(&mut r, style, has_menu, ex_style).ok()?;
        }
        Some(Size::new(r.right - r.left, r.bottom - r.top))
    }

    fn place_window(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError> {
        trace!(%id, %frame, "SetWindowPos");
        unsafe {
            SetWindowPos(
                hwnd(id),
                Some(HWND_TOP),
                frame.left,
                frame.top,
                frame.width(),
                frame.height(),
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            )
        }
        .map_err(|err| SysError::MoveFailed { id, reason: err.to_string() })
    }

    fn refresh_window(&mut self, id: WindowId) {
        let hwnd = hwnd(id);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            let _ = RedrawWindow(Some(hwnd), None, None, REFRESH_FLAGS);
            let _ = SetForegroundWindow(hwnd);
        }
    }

    fn restore_frame(&mut self, id: WindowId, frame: Rect) -> Result<(), SysError> {
        unsafe {
            SetWindowPos(
                hwnd(id),
                None,
                frame.left,
                frame.top,
                frame.width(),
                frame.height(),
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }
        .map_err(|err| SysError::MoveFailed { id, reason: err.to_string() })
    }

    fn focus_window(&mut self, id: WindowId) -> bool {
        if !self.is_window(id) {
            return false;
        }
        let hwnd = hwnd(id);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            SetForegroundWindow(hwnd).as_bool()
        }
    }

    fn minimize_shell(&mut self) {
        let console = unsafe { GetConsoleWindow() };
        if console.is_invalid() {
            debug!("No console window to minimize");
            return;
        }
        unsafe {
            let _ = ShowWindow(console, SW_MINIMIZE);
        }
    }

    fn install_capture_interception(&mut self) -> Result<(), SysError> {
        if self.capture_hooks.is_none() {
            self.capture_hooks = Some(CaptureHooks::install()?);
        }
        Ok(())
    }

    fn remove_capture_interception(&mut self) { self.capture_hooks = None; }
}
