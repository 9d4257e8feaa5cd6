//! Error types for the tray facility.

/// Errors produced while building or driving the tray icon.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("invalid icon image: {0}")]
    Icon(String),

    #[error("menu error: {0}")]
    Menu(String),

    #[error("tray icon error: {0}")]
    Tray(String),
}
