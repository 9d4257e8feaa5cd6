//! Tray icon rendering for the ollamaps tray.
//!
//! Draws a number in white on an opaque black 64×64 canvas, centering the
//! ink bounding box. A TrueType font is preferred; when it cannot be loaded
//! the renderer falls back to a built-in 5×7 bitmap font.

mod bitmap;
pub mod error;
mod render;

pub use error::IconError;
pub use render::{DEFAULT_FONT_PX, ICON_SIZE, IconRenderer, default_font_path};
