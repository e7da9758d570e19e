pub mod event;
pub mod geometry;
pub mod screen;
pub mod window_system;

#[cfg(windows)]
pub mod win32;
