//! Built-in 5×7 bitmap glyphs for digits and the minus sign.

/// Glyph width in cells.
pub const GLYPH_W: u32 = 5;

/// Glyph height in cells.
pub const GLYPH_H: u32 = 7;

/// Blank cells between adjacent glyphs.
pub const GLYPH_GAP: u32 = 1;

/// Returns the seven rows of `c`; bit 4 of each row is the leftmost column.
pub fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        _ => return None,
    };
    Some(rows)
}

/// Lays out `text` and returns the lit cells as `(x, y)` in cell units.
///
/// Characters without a glyph still advance the caret.
pub fn lit_cells(text: &str) -> Vec<(u32, u32)> {
    let mut cells = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let origin = i as u32 * (GLYPH_W + GLYPH_GAP);
        for (y, row) in rows.iter().enumerate() {
            for x in 0..GLYPH_W {
                if row & (0x10 >> x) != 0 {
                    cells.push((origin + x, y as u32));
                }
            }
        }
    }
    cells
}

/// Width of `text` in cells, including inter-glyph gaps.
pub fn text_width(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        0
    } else {
        n * GLYPH_W + (n - 1) * GLYPH_GAP
    }
}
