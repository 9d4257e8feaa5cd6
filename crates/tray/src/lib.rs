//! System tray icon for the ollamaps tray.
//!
//! Provides a tray icon showing the loaded-model count, a tooltip, a context
//! menu with "Show models" and "Quit", and a popup notification.
//!
//! The tray communicates with the app core via channels:
//! - [`TrayEvent`]: events from tray to core (e.g. quit requested)
//! - [`TrayUpdate`]: updates from core to tray (e.g. new icon and tooltip)
//!
//! # Platform notes
//! - Windows: `tray-icon` on top of `Shell_NotifyIcon`, popups via
//!   `notify-rust` toasts
//! - The tray event loop must run on the thread that created the icon; the
//!   icon itself is `!Send`, so updates travel over a channel

mod error;
mod menu;
mod tray;
#[cfg(windows)]
mod windows;

pub use error::TrayError;
pub use menu::{MenuAction, MenuItem, MenuState};
pub use tray::{IconImage, TrayConfig, TrayEvent, TrayHandle, TrayUpdate, TrayUpdater};
#[cfg(windows)]
pub use windows::run_event_loop;
