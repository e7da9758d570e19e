//! Message boxes that close themselves.
//!
//! A CBT hook catches the box the moment it activates, records its handle and
//! arms a one-shot timer; when the timer fires the box is sent `WM_CLOSE`.

use std::cell::Cell;
use std::ffi::c_void;
use std::time::Duration;

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HCBT_ACTIVATE, HHOOK, KillTimer, MB_ICONERROR, MB_ICONINFORMATION,
    MB_ICONWARNING, MB_OK, MB_SETFOREGROUND, MB_TOPMOST, MessageBoxW, PostMessageW, SetTimer,
    SetWindowsHookExW, UnhookWindowsHookEx, WH_CBT, WM_CLOSE,
};
use windows::core::HSTRING;

use crate::actor::notification_center::{Notification, Severity};

thread_local! {
    static DIALOG: Cell<isize> = const { Cell::new(0) };
    static TIMER: Cell<usize> = const { Cell::new(0) };
    static CBT_HOOK: Cell<isize> = const { Cell::new(0) };
    static TIMEOUT_MS: Cell<u32> = const { Cell::new(2000) };
}

fn unhook_cbt() {
    let raw = CBT_HOOK.replace(0);
    if raw != 0 {
        unsafe {
            let _ = UnhookWindowsHookEx(HHOOK(raw as *mut c_void));
        }
    }
}

fn kill_timer() {
    let id = TIMER.replace(0);
    if id != 0 {
        unsafe {
            let _ = KillTimer(None, id);
        }
    }
}

unsafe extern "system" fn timeout_proc(_hwnd: HWND, _msg: u32, _id: usize, _time: u32) {
    let raw = DIALOG.get();
    if raw != 0 {
        unsafe {
            let _ = PostMessageW(Some(HWND(raw as *mut c_void)), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }
    kill_timer();
}

unsafe extern "system" fn cbt_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HCBT_ACTIVATE as i32 {
        DIALOG.set(wparam.0 as isize);
        kill_timer();
        let id = unsafe { SetTimer(None, 0, TIMEOUT_MS.get(), Some(timeout_proc)) };
        TIMER.set(id);
        unhook_cbt();
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

/// Shows `notification` in a message box that dismisses itself after `timeout`.
/// Blocks in the box's modal loop until it closes.
pub fn show_timed(notification: &Notification, timeout: Duration) {
    DIALOG.set(0);
    TIMEOUT_MS.set(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));

    let thread_id = unsafe { GetCurrentThreadId() };
    if let Ok(hook) = unsafe { SetWindowsHookExW(WH_CBT, Some(cbt_proc), None, thread_id) } {
        CBT_HOOK.set(hook.0 as isize);
    }

    let icon = match notification.severity {
        Severity::Info => MB_ICONINFORMATION,
        Severity::Warning => MB_ICONWARNING,
        Severity::Error => MB_ICONERROR,
    };
    let text = HSTRING::from(notification.message.as_str());
    let caption = HSTRING::from(notification.caption.as_str());
    unsafe {
        MessageBoxW(None, &text, &caption, MB_OK | MB_TOPMOST | MB_SETFOREGROUND | icon);
    }

    unhook_cbt();
    kill_timer();
    DIALOG.set(0);
}
