//! Windows tray backend.
//!
//! Owns the `tray-icon` instance on the calling thread, pumps Win32 messages
//! so the icon and its context menu stay responsive, and applies updates
//! arriving from the app core.

use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem as NativeMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage, WM_QUIT,
};

use crate::menu::MenuAction;
use crate::tray::{IconImage, TrayConfig, TrayEvent, TrayUpdate};
use crate::TrayError;

/// Sleep between message pump rounds.
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the tray until "Quit" is clicked, a [`TrayUpdate::Shutdown`] arrives,
/// or every update sender is dropped.
///
/// Must be called on the thread that should own the icon, normally `main`.
pub fn run_event_loop(
    config: TrayConfig,
    event_tx: mpsc::Sender<TrayEvent>,
    update_rx: mpsc::Receiver<TrayUpdate>,
) -> Result<(), TrayError> {
    let menu = Menu::new();
    let mut actions: Vec<(MenuId, MenuAction)> = Vec::new();
    for item in config.menu.build_menu() {
        let native = NativeMenuItem::new(&item.label, item.enabled, None);
        menu.append(&native)
            .map_err(|e| TrayError::Menu(e.to_string()))?;
        actions.push((native.id().clone(), item.action));
    }

    let mut builder = TrayIconBuilder::new()
        .with_id(config.id.as_str())
        .with_tooltip(&config.tooltip)
        .with_menu(Box::new(menu));
    if let Some(image) = config.icon {
        builder = builder.with_icon(to_icon(image)?);
    }
    let tray = builder
        .build()
        .map_err(|e| TrayError::Tray(e.to_string()))?;

    tracing::info!(id = %config.id, "tray icon registered");

    let menu_rx = MenuEvent::receiver();
    loop {
        if !pump_messages() {
            tracing::info!("WM_QUIT received, stopping tray");
            return Ok(());
        }

        while let Ok(event) = menu_rx.try_recv() {
            let Some(action) = actions
                .iter()
                .find(|(id, _)| *id == event.id)
                .map(|(_, action)| *action)
            else {
                continue;
            };

            match action {
                MenuAction::ShowModels => {
                    let _ = event_tx.send(TrayEvent::ShowModelsRequested);
                }
                MenuAction::Quit => {
                    tracing::info!("quit selected from tray menu");
                    let _ = event_tx.send(TrayEvent::QuitRequested);
                    return Ok(());
                }
            }
        }

        loop {
            match update_rx.try_recv() {
                Ok(TrayUpdate::Shutdown) => {
                    tracing::info!("tray shutdown requested");
                    return Ok(());
                }
                Ok(update) => apply(&tray, update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("all tray updaters dropped, stopping tray");
                    return Ok(());
                }
            }
        }

        std::thread::sleep(PUMP_INTERVAL);
    }
}

/// Applies a non-shutdown update. Failures are logged and ignored.
fn apply(tray: &TrayIcon, update: TrayUpdate) {
    match update {
        TrayUpdate::Refresh { icon, tooltip } => {
            match icon.map(to_icon) {
                Some(Ok(icon)) => {
                    if let Err(e) = tray.set_icon(Some(icon)) {
                        tracing::warn!("failed to update tray icon: {e}");
                    }
                }
                Some(Err(e)) => tracing::warn!("{e}"),
                None => {}
            }
            if let Err(e) = tray.set_tooltip(Some(&tooltip)) {
                tracing::warn!("failed to update tray tooltip: {e}");
            }
        }
        TrayUpdate::Notify { title, body } => {
            if let Err(e) = notify_rust::Notification::new()
                .summary(&title)
                .body(&body)
                .show()
            {
                tracing::warn!("failed to show notification: {e}");
            }
        }
        TrayUpdate::Shutdown => {}
    }
}

fn to_icon(image: IconImage) -> Result<Icon, TrayError> {
    Icon::from_rgba(image.rgba, image.width, image.height)
        .map_err(|e| TrayError::Icon(e.to_string()))
}

/// Drains the thread's Win32 message queue. Returns `false` on `WM_QUIT`.
fn pump_messages() -> bool {
    // SAFETY: `msg` is a plain-data out parameter owned by this frame, and a
    // null HWND asks for every message posted to the current thread.
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        while PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
            if msg.message == WM_QUIT {
                return false;
            }
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    true
}
