//! The desktop event loop.
//!
//! Everything runs on one thread: the message loop, the input hooks, and the
//! reactor. Other threads (the console reader) talk to it through a channel
//! and wake it by posting to a message-only window, which keeps working while
//! a message box runs its own modal loop.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::c_void;

use anyhow::{Context, bail};
use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, HWND_MESSAGE,
    MSG, PostMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, WM_APP, WNDCLASSW,
};
use windows::core::{PCWSTR, w};

use super::desktop::Win32Desktop;
use super::dialog;
use super::hooks;
use crate::actor::notification_center::{Notification, Presenter};
use crate::actor::reactor::{Command, Reactor};
use crate::common::config::Settings;
use crate::ui::console::{self, ConsoleInput, ConsolePresenter, ParseError};

const WM_WAKE: u32 = WM_APP + 1;

/// Wakes the loop thread from any thread.
///
/// Holds the raw handle value since `HWND` isn't `Send`. Multiple wakes may be
/// collapsed into one pump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WakeupHandle(isize);

impl WakeupHandle {
    pub fn wake(&self) {
        let hwnd = HWND(self.0 as *mut c_void);
        if let Err(err) = unsafe { PostMessageW(Some(hwnd), WM_WAKE, WPARAM(0), LPARAM(0)) } {
            warn!(%err, "Failed to wake loop");
        }
    }
}

struct Shell {
    reactor: Reactor<Win32Desktop>,
    console: Receiver<ConsoleInput>,
    presenter: ConsolePresenter,
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
    static WAKE: Cell<Option<WakeupHandle>> = const { Cell::new(None) };
    static OUTBOX: RefCell<VecDeque<Notification>> = const { RefCell::new(VecDeque::new()) };
    static PRESENTING: Cell<bool> = const { Cell::new(false) };
    static DIALOGS: Cell<Option<std::time::Duration>> = const { Cell::new(None) };
}

/// Runs `f` against the reactor if it is not already in use further up the
/// stack. A hook firing during dispatch (e.g. from a nested modal loop) gets
/// `None` and should let the event through.
pub(super) fn with_reactor<R>(f: impl FnOnce(&mut Reactor<Win32Desktop>) -> R) -> Option<R> {
    SHELL.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        let shell = slot.as_mut()?;
        Some(f(&mut shell.reactor))
    })
}

pub(super) fn wake() {
    if let Some(handle) = WAKE.get() {
        handle.wake();
    }
}

impl Shell {
    fn poll_console(&mut self) {
        loop {
            match self.console.try_recv() {
                Ok(ConsoleInput::Line(line)) => match console::apply_line(&mut self.reactor, &line) {
                    Ok(()) => {}
                    Err(ParseError::Help) => println!("{}", console::USAGE),
                    Err(err) => println!("{err}"),
                },
                Ok(ConsoleInput::Closed) | Err(TryRecvError::Disconnected) => {
                    self.reactor.dispatch(Command::Quit);
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
    }

    fn render(&mut self) {
        if !self.reactor.take_needs_render() {
            return;
        }
        let snapshot = self.reactor.snapshot();
        if self.presenter.json {
            println!("{}", console::render_json(&snapshot));
        } else {
            print!("{}", console::render_snapshot(&snapshot));
        }
    }
}

/// Drains input and events, then presents whatever the reactor had to say.
/// Safe to call re-entrantly: nested calls do nothing while the reactor is
/// borrowed, and only the outermost call shows dialogs.
fn pump() {
    let quit = SHELL.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else { return false };
        let Some(shell) = slot.as_mut() else { return false };
        shell.poll_console();
        shell.reactor.run_pending();
        shell.render();
        let notes = shell.reactor.drain_notifications();
        for note in &notes {
            shell.presenter.present(note);
        }
        OUTBOX.with_borrow_mut(|outbox| outbox.extend(notes));
        shell.reactor.should_quit()
    });

    present_dialogs();

    if quit {
        unsafe { PostQuitMessage(0) };
    }
}

fn present_dialogs() {
    let Some(timeout) = DIALOGS.get() else {
        OUTBOX.with_borrow_mut(|outbox| outbox.clear());
        return;
    };
    if PRESENTING.replace(true) {
        return;
    }
    while let Some(note) = OUTBOX.with_borrow_mut(|outbox| outbox.pop_front()) {
        dialog::show_timed(&note, timeout);
    }
    PRESENTING.set(false);
}

unsafe extern "system" fn wake_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if msg == WM_WAKE {
        pump();
        return LRESULT(0);
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

fn create_wake_window() -> anyhow::Result<HWND> {
    unsafe {
        let instance = GetModuleHandleW(None).context("GetModuleHandleW")?;
        let class_name = w!("WingridWake");
        let wc = WNDCLASSW {
            lpfnWndProc: Some(wake_proc),
            hInstance: instance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            bail!("RegisterClassW failed");
        }
        CreateWindowExW(
            Default::default(),
            class_name,
            PCWSTR::null(),
            Default::default(),
            0,
            0,
            0,
            0,
            Some(HWND_MESSAGE),
            None,
            Some(instance.into()),
            None,
        )
        .context("CreateWindowExW")
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let wake_hwnd = create_wake_window()?;
    let waker = WakeupHandle(wake_hwnd.0 as isize);
    WAKE.set(Some(waker));
    DIALOGS.set(settings.dialogs.then_some(settings.notification_timeout));

    let hotkey = match hooks::install_hotkey_hook() {
        Ok(hook) => Some(hook),
        Err(err) => {
            warn!(%err, "Running without the arrange hotkey");
            None
        }
    };

    let (tx, rx) = crossbeam_channel::unbounded();
    console::spawn_reader(tx, move || waker.wake()).context("spawning console reader")?;

    let reactor = Reactor::new(Win32Desktop::new(), &settings);
    SHELL.set(Some(Shell {
        reactor,
        console: rx,
        presenter: ConsolePresenter { json: settings.json },
    }));
    info!(hotkey = %settings.hotkey, "Ready");
    println!("{}", console::USAGE);
    waker.wake();

    let mut msg = MSG::default();
    loop {
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match status.0 {
            0 => break,
            -1 => {
                warn!("GetMessageW failed");
                break;
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
    debug!("Message loop exited");

    if let Some(mut shell) = SHELL.take() {
        shell.reactor.shutdown();
    }
    drop(hotkey);
    unsafe {
        let _ = DestroyWindow(wake_hwnd);
    }
    Ok(())
}
