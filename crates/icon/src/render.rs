//! Number-to-bitmap rendering.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::IconError;
use crate::bitmap;

/// Edge length of the square icon, in pixels.
pub const ICON_SIZE: u32 = 64;

/// Pixel height of the preferred TrueType font.
pub const DEFAULT_FONT_PX: f32 = 50.0;

/// Largest integer scale applied to the built-in bitmap font.
const BITMAP_MAX_SCALE: u32 = 6;

/// Margin kept free when fitting text to the canvas.
const FIT_MARGIN: u32 = 2;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

enum Face {
    Vector { font: FontVec, scale: PxScale },
    Bitmap,
}

/// Renders numbers into tray icon bitmaps.
///
/// Holds the loaded font so the file is read once at startup.
pub struct IconRenderer {
    face: Face,
}

impl std::fmt::Debug for IconRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconRenderer")
            .field("builtin", &self.uses_builtin())
            .finish()
    }
}

impl IconRenderer {
    /// Loads the font at `path` (or the platform default) and falls back to
    /// the built-in bitmap font on any failure.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_font_path) else {
            tracing::debug!("no preferred font available, using built-in glyphs");
            return Self::builtin();
        };

        match Self::from_font_file(&path, DEFAULT_FONT_PX) {
            Ok(renderer) => {
                tracing::debug!(path = %path.display(), "icon font loaded");
                renderer
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "icon font unavailable, using built-in glyphs: {e}");
                Self::builtin()
            }
        }
    }

    /// Loads a TrueType/OpenType font file rendered at `px` pixels.
    pub fn from_font_file(path: &Path, px: f32) -> Result<Self, IconError> {
        let bytes = std::fs::read(path)?;
        Self::from_font_bytes(bytes, px)
    }

    /// Builds a renderer from raw font data rendered at `px` pixels.
    pub fn from_font_bytes(bytes: Vec<u8>, px: f32) -> Result<Self, IconError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| IconError::InvalidFont)?;
        Ok(Self {
            face: Face::Vector {
                font,
                scale: PxScale::from(px),
            },
        })
    }

    /// Renderer using only the built-in bitmap font.
    pub fn builtin() -> Self {
        Self { face: Face::Bitmap }
    }

    /// Returns `true` if the built-in bitmap font is in use.
    pub fn uses_builtin(&self) -> bool {
        matches!(self.face, Face::Bitmap)
    }

    /// Renders `number` as white text centered on an opaque black canvas.
    pub fn render(&self, number: i64) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, BACKGROUND);
        let text = number.to_string();

        match &self.face {
            Face::Vector { font, scale } => draw_vector(&mut canvas, font, *scale, &text),
            Face::Bitmap => draw_bitmap(&mut canvas, &text),
        }

        canvas
    }
}

/// Platform location of the preferred icon font.
pub fn default_font_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| r"C:\Windows".into());
        Some(PathBuf::from(windir).join("Fonts").join("arial.ttf"))
    }

    #[cfg(not(windows))]
    {
        None
    }
}

/// Lays out `text` on a single line and returns the outlined glyphs.
fn layout(font: &FontVec, scale: PxScale, text: &str) -> Vec<OutlinedGlyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0;
    let mut prev: Option<GlyphId> = None;
    let mut outlined = Vec::new();

    for c in text.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, glyph.id);
        }
        glyph.position = point(caret, scaled.ascent());
        caret += scaled.h_advance(glyph.id);
        prev = Some(glyph.id);

        if let Some(g) = font.outline_glyph(glyph) {
            outlined.push(g);
        }
    }

    outlined
}

/// Union of the pixel bounds of `glyphs` as `(min_x, min_y, max_x, max_y)`.
fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<(f32, f32, f32, f32)> {
    glyphs.iter().map(OutlinedGlyph::px_bounds).fold(None, |acc, b| {
        Some(match acc {
            None => (b.min.x, b.min.y, b.max.x, b.max.y),
            Some((x0, y0, x1, y1)) => (
                x0.min(b.min.x),
                y0.min(b.min.y),
                x1.max(b.max.x),
                y1.max(b.max.y),
            ),
        })
    })
}

fn draw_vector(canvas: &mut RgbaImage, font: &FontVec, scale: PxScale, text: &str) {
    let mut glyphs = layout(font, scale, text);
    let Some(mut bounds) = ink_bounds(&glyphs) else {
        return;
    };

    // Shrink text that would not fit, e.g. long negative numbers.
    let limit = (ICON_SIZE - 2 * FIT_MARGIN) as f32;
    let (w, h) = (bounds.2 - bounds.0, bounds.3 - bounds.1);
    if w > limit || h > limit {
        let factor = (limit / w).min(limit / h);
        glyphs = layout(font, PxScale::from(scale.y * factor), text);
        match ink_bounds(&glyphs) {
            Some(b) => bounds = b,
            None => return,
        }
    }

    let (min_x, min_y, max_x, max_y) = bounds;
    let size = ICON_SIZE as f32;
    let dx = ((size - (max_x - min_x)) / 2.0 - min_x).round() as i32;
    let dy = ((size - (max_y - min_y)) / 2.0 - min_y).round() as i32;

    for glyph in &glyphs {
        let b = glyph.px_bounds();
        let (ox, oy) = (b.min.x as i32 + dx, b.min.y as i32 + dy);
        glyph.draw(|x, y, coverage| {
            let (px, py) = (ox + x as i32, oy + y as i32);
            if px < 0 || py < 0 || px >= ICON_SIZE as i32 || py >= ICON_SIZE as i32 {
                return;
            }
            let v = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            // Overlapping glyph edges keep the brighter value.
            let v = v.max(pixel[0]);
            *pixel = Rgba([v, v, v, 255]);
        });
    }
}

fn draw_bitmap(canvas: &mut RgbaImage, text: &str) {
    let cells = bitmap::lit_cells(text);
    if cells.is_empty() {
        return;
    }

    let room = ICON_SIZE - 2 * FIT_MARGIN;
    let scale = BITMAP_MAX_SCALE
        .min(room / bitmap::text_width(text).max(1))
        .min(room / bitmap::GLYPH_H)
        .max(1);

    let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let max_x = cells.iter().map(|c| c.0).max().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
    let max_y = cells.iter().map(|c| c.1).max().unwrap_or(0);
    let ink_w = (max_x - min_x + 1) * scale;
    let ink_h = (max_y - min_y + 1) * scale;
    let ox = (ICON_SIZE as i64 - ink_w as i64) / 2 - (min_x * scale) as i64;
    let oy = (ICON_SIZE as i64 - ink_h as i64) / 2 - (min_y * scale) as i64;

    let white = Rgba([255, 255, 255, 255]);
    for (cx, cy) in cells {
        for sy in 0..scale {
            for sx in 0..scale {
                let px = ox + (cx * scale + sx) as i64;
                let py = oy + (cy * scale + sy) as i64;
                if (0..ICON_SIZE as i64).contains(&px) && (0..ICON_SIZE as i64).contains(&py) {
                    canvas.put_pixel(px as u32, py as u32, white);
                }
            }
        }
    }
}
