//! Tray handle, events, and update types.
//!
//! This module defines the channel-based interface the app core uses to
//! talk to the tray, independent of the platform backend. The backend owns
//! the receiving end of [`TrayUpdate`] and the sending end of [`TrayEvent`].

use std::sync::mpsc;

use crate::TrayError;
use crate::menu::MenuState;

/// Raw RGBA icon bitmap handed to the tray backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl IconImage {
    /// Wraps an RGBA buffer, checking it holds exactly `width * height` pixels.
    pub fn from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self, TrayError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(TrayError::Icon(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            rgba,
            width,
            height,
        })
    }
}

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Identifier of the tray icon.
    pub id: String,
    /// Tooltip shown until the first refresh.
    pub tooltip: String,
    /// Icon shown until the first refresh.
    pub icon: Option<IconImage>,
    /// Context menu labels.
    pub menu: MenuState,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            id: "OllamaPS".into(),
            tooltip: "Loading...".into(),
            icon: None,
            menu: MenuState::default(),
        }
    }
}

/// Events emitted by the tray to the app core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// User clicked "Show models" in the context menu.
    ShowModelsRequested,
    /// User clicked "Quit" in the context menu.
    QuitRequested,
}

/// Updates sent from the app core to the tray.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// Replace the tooltip, and the icon when one is given.
    Refresh {
        icon: Option<IconImage>,
        tooltip: String,
    },
    /// Show a popup notification.
    Notify { title: String, body: String },
    /// Request tray shutdown.
    Shutdown,
}

/// Cloneable sender for tray updates, usable from any thread or task.
#[derive(Debug, Clone)]
pub struct TrayUpdater {
    update_tx: mpsc::Sender<TrayUpdate>,
}

impl TrayUpdater {
    /// Replaces the tray tooltip, and the icon unless `icon` is `None`.
    ///
    /// Returns `false` once the tray has gone away.
    pub fn refresh(&self, icon: Option<IconImage>, tooltip: impl Into<String>) -> bool {
        self.send(TrayUpdate::Refresh {
            icon,
            tooltip: tooltip.into(),
        })
    }

    /// Shows a popup notification.
    pub fn notify(&self, title: impl Into<String>, body: impl Into<String>) -> bool {
        self.send(TrayUpdate::Notify {
            title: title.into(),
            body: body.into(),
        })
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) -> bool {
        self.send(TrayUpdate::Shutdown)
    }

    fn send(&self, update: TrayUpdate) -> bool {
        self.update_tx.send(update).is_ok()
    }
}

/// Handle for communicating with the system tray from the app core.
///
/// The tray event loop runs on the main thread and communicates via
/// channels.
pub struct TrayHandle {
    updater: TrayUpdater,
    event_rx: mpsc::Receiver<TrayEvent>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`: the sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new() -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            updater: TrayUpdater { update_tx },
            event_rx,
        };

        (handle, event_tx, update_rx)
    }

    /// Returns a sender that background tasks can keep.
    pub fn updater(&self) -> TrayUpdater {
        self.updater.clone()
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        let _ = self.updater.shutdown();
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }
}
