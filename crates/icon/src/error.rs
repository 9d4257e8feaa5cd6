//! Error types for font loading.

/// Errors produced while loading the preferred icon font.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid font data")]
    InvalidFont,
}
