//! Windows backend.

mod desktop;
mod dialog;
mod hooks;
mod run_loop;

pub use desktop::Win32Desktop;
pub use run_loop::{WakeupHandle, run};
