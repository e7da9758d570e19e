//! Low-level input hooks.
//!
//! Hook procedures run on the thread that installed them, inside its message
//! loop, so they reach the reactor through the run loop's thread-local slot.
//! They never block: they update capture state, queue follow-up events, and
//! wake the loop.

use tracing::{debug, info};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VK_CONTROL, VK_LWIN, VK_MENU, VK_RWIN, VK_SHIFT,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, HOOKPROC, KBDLLHOOKSTRUCT, MSLLHOOKSTRUCT,
    SetWindowsHookExW, UnhookWindowsHookEx, WH_KEYBOARD_LL, WH_MOUSE_LL, WINDOWS_HOOK_ID,
    WM_KEYDOWN, WM_LBUTTONDOWN, WM_SYSKEYDOWN,
};

use super::run_loop;
use crate::common::error::SysError;
use crate::sys::event::{Disposition, KeyCode, KeyPress, Modifiers};
use crate::sys::geometry::Point;

/// An installed hook. Dropping it unhooks.
pub struct HookHandle {
    hook: HHOOK,
    kind: &'static str,
}

impl HookHandle {
    fn install(id: WINDOWS_HOOK_ID, proc: HOOKPROC, kind: &'static str) -> Result<Self, SysError> {
        let hook = unsafe { SetWindowsHookExW(id, proc, None, 0) }
            .map_err(|err| SysError::InterceptionInstall(format!("{kind} hook: {err}")))?;
        debug!(kind, "Hook installed");
        Ok(HookHandle { hook, kind })
    }
}

impl Drop for HookHandle {
    fn drop(&mut self) {
        if !self.hook.is_invalid() {
            unsafe {
                let _ = UnhookWindowsHookEx(self.hook);
            }
            debug!(kind = self.kind, "Hook removed");
        }
    }
}

/// Pointer and keyboard hooks that exist only while a capture is running.
pub struct CaptureHooks {
    _mouse: HookHandle,
    _keyboard: HookHandle,
}

impl CaptureHooks {
    pub fn install() -> Result<Self, SysError> {
        let mouse = HookHandle::install(WH_MOUSE_LL, Some(capture_mouse_proc), "capture mouse")?;
        // If this one fails, `mouse` is dropped and unhooked on the way out.
        let keyboard =
            HookHandle::install(WH_KEYBOARD_LL, Some(capture_keyboard_proc), "capture keyboard")?;
        Ok(CaptureHooks { _mouse: mouse, _keyboard: keyboard })
    }
}

/// Installs the process-lifetime hotkey hook.
pub fn install_hotkey_hook() -> Result<HookHandle, SysError> {
    let hook = HookHandle::install(WH_KEYBOARD_LL, Some(hotkey_keyboard_proc), "hotkey")?;
    info!("Hotkey hook installed");
    Ok(hook)
}

fn held(vk: u16) -> bool { unsafe { GetAsyncKeyState(vk as i32) as u16 & 0x8000 != 0 } }

fn current_modifiers() -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::CONTROL, held(VK_CONTROL.0));
    modifiers.set(Modifiers::SHIFT, held(VK_SHIFT.0));
    modifiers.set(Modifiers::ALT, held(VK_MENU.0));
    modifiers.set(Modifiers::WIN, held(VK_LWIN.0) || held(VK_RWIN.0));
    modifiers
}

/// Reads the key press out of a keyboard hook message, if it's a key-down.
///
/// # Safety
/// `lparam` must be the `KBDLLHOOKSTRUCT` pointer of a `WH_KEYBOARD_LL` hook call.
unsafe fn key_down(wparam: WPARAM, lparam: LPARAM) -> Option<KeyPress> {
    let msg = wparam.0 as u32;
    if msg != WM_KEYDOWN && msg != WM_SYSKEYDOWN {
        return None;
    }
    let info = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
    Some(KeyPress::new(KeyCode(info.vkCode), current_modifiers()))
}

/// Only a swallowed event can have changed the reactor, so only those wake
/// the loop. Everything else goes down the hook chain untouched.
fn finish(disposition: Option<Disposition>, code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if disposition.is_some_and(Disposition::is_suppressed) {
        run_loop::wake();
        return LRESULT(1);
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

unsafe extern "system" fn capture_mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let mut disposition = None;
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_LBUTTONDOWN {
        // SAFETY: WH_MOUSE_LL passes an MSLLHOOKSTRUCT.
        let info = unsafe { &*(lparam.0 as *const MSLLHOOKSTRUCT) };
        let point = Point::new(info.pt.x, info.pt.y);
        disposition = run_loop::with_reactor(|reactor| reactor.on_pointer_down(point));
    }
    finish(disposition, code, wparam, lparam)
}

unsafe extern "system" fn capture_keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let mut disposition = None;
    if code == HC_ACTION as i32 {
        if let Some(press) = unsafe { key_down(wparam, lparam) } {
            disposition = run_loop::with_reactor(|reactor| reactor.on_capture_key(press));
        }
    }
    finish(disposition, code, wparam, lparam)
}

unsafe extern "system" fn hotkey_keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let mut disposition = None;
    if code == HC_ACTION as i32 {
        if let Some(press) = unsafe { key_down(wparam, lparam) } {
            disposition = run_loop::with_reactor(|reactor| reactor.on_hotkey_key(press));
        }
    }
    finish(disposition, code, wparam, lparam)
}
