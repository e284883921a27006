//! Blitters: encode rectangles of pixels as terminal cells.

use crate::canvas::Canvas;
use crate::cell::Cell;
use crate::color::{redmean_distance, Color};

use super::pixel::PixelBuffer;

/// How pixels are packed into one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlitMode {
    /// 2×4 braille dots (U+2800 block).
    #[default]
    Braille,
    /// 1×2 upper-half blocks.
    HalfBlock,
    /// 2×2 quadrant block elements.
    Quadrant,
    /// 1×1 character-ramp ASCII art.
    Ascii,
}

impl BlitMode {
    /// Pixels consumed per cell as `(x, y)`.
    #[must_use]
    pub const fn cell_pixels(self) -> (u32, u32) {
        match self {
            Self::Braille => (2, 4),
            Self::HalfBlock => (1, 2),
            Self::Quadrant => (2, 2),
            Self::Ascii => (1, 1),
        }
    }
}

/// Braille dot bit for the sub-pixel at `(x, y)` within a 2×4 cell.
///
/// Dots 1–8 of U+2800: column 0 rows 0–2 are dots 1–3 (0x01, 0x02,
/// 0x04), column 1 rows 0–2 are dots 4–6 (0x08, 0x10, 0x20), and row 3
/// holds dots 7 (0x40) and 8 (0x80).
const fn braille_bit(x: u32, y: u32) -> u8 {
    match (x, y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// Quadrant characters indexed by the 4-bit pattern
/// `TL | TR<<1 | BL<<2 | BR<<3`.
const QUADRANT_CHARS: [char; 16] = [
    ' ', '▘', '▝', '▀', '▖', '▌', '▞', '▛', '▗', '▚', '▐', '▜', '▄', '▙', '▟', '█',
];

/// Grayscale-to-character ramp for ASCII blitting, dark to light.
const ASCII_RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Color tolerance below which a half-block collapses to a space.
const HALF_BLOCK_TOLERANCE: f64 = 600.0;

/// Blit a pixel buffer to a canvas of cells.
///
/// The output is `(ceil(w / px_x), ceil(h / px_y))` cells for the mode's
/// pixels-per-cell. `threshold` drives the braille on/off decision; `fg`
/// and `bg` supply defaults where a cell has no lit or unlit pixels.
#[must_use]
pub fn blit(buffer: &PixelBuffer, mode: BlitMode, threshold: u8, fg: Color, bg: Color) -> Canvas {
    let (px_x, px_y) = mode.cell_pixels();
    let cols = buffer.width().div_ceil(px_x) as usize;
    let rows = buffer.height().div_ceil(px_y) as usize;
    let mut canvas = Canvas::new(cols, rows);

    for row in 0..rows {
        for col in 0..cols {
            let origin = (col as u32 * px_x, row as u32 * px_y);
            let cell = match mode {
                BlitMode::Braille => blit_braille(buffer, origin, threshold, fg, bg),
                BlitMode::HalfBlock => blit_half_block(buffer, origin, bg),
                BlitMode::Quadrant => blit_quadrant(buffer, origin, bg),
                BlitMode::Ascii => blit_ascii(buffer, origin, bg),
            };
            canvas.set(col, row, cell);
        }
    }
    canvas
}

/// One braille cell: a sub-pixel is "on" when its grayscale meets the
/// threshold; the codepoint is `0x2800 | bits`.
fn blit_braille(
    buffer: &PixelBuffer,
    (ox, oy): (u32, u32),
    threshold: u8,
    fg: Color,
    bg: Color,
) -> Cell {
    let mut bits: u8 = 0;
    let mut lit_sum = [0u32; 3];
    let mut lit_count = 0u32;
    for dy in 0..4 {
        for dx in 0..2 {
            let px = buffer.get(ox + dx, oy + dy).over(bg);
            if px.grayscale() >= threshold {
                bits |= braille_bit(dx, dy);
                lit_sum[0] += u32::from(px.r);
                lit_sum[1] += u32::from(px.g);
                lit_sum[2] += u32::from(px.b);
                lit_count += 1;
            }
        }
    }
    let cell_fg = if lit_count > 0 {
        Color::rgb(
            (lit_sum[0] / lit_count) as u8,
            (lit_sum[1] / lit_count) as u8,
            (lit_sum[2] / lit_count) as u8,
        )
    } else {
        fg
    };
    let ch = char::from_u32(0x2800 | u32::from(bits)).unwrap_or(' ');
    Cell::new(ch, cell_fg, Some(bg))
}

/// One half-block cell: upper half block with fg = top pixel, bg = bottom
/// pixel; near-identical halves collapse to a plain space.
fn blit_half_block(buffer: &PixelBuffer, (ox, oy): (u32, u32), bg: Color) -> Cell {
    let top = buffer.get(ox, oy).over(bg);
    let bottom = buffer.get(ox, oy + 1).over(bg);
    if redmean_distance(top, bottom) < HALF_BLOCK_TOLERANCE {
        // fg == bg so downstream quantization cannot reintroduce a seam.
        Cell::new(' ', top, Some(top))
    } else {
        Cell::new('▀', top, Some(bottom))
    }
}

/// One quadrant cell: pixels are classified light/dark against the cell
/// mean, the pattern picks the block element, and fg/bg average each
/// class.
fn blit_quadrant(buffer: &PixelBuffer, (ox, oy): (u32, u32), bg: Color) -> Cell {
    let px = [
        buffer.get(ox, oy).over(bg),
        buffer.get(ox + 1, oy).over(bg),
        buffer.get(ox, oy + 1).over(bg),
        buffer.get(ox + 1, oy + 1).over(bg),
    ];
    let mean: u32 = px.iter().map(|p| u32::from(p.grayscale())).sum::<u32>() / 4;

    let mut pattern = 0usize;
    let mut light = ([0u32; 3], 0u32);
    let mut dark = ([0u32; 3], 0u32);
    for (i, p) in px.iter().enumerate() {
        if u32::from(p.grayscale()) >= mean && p.grayscale() > 0 {
            pattern |= 1 << i;
            light.0[0] += u32::from(p.r);
            light.0[1] += u32::from(p.g);
            light.0[2] += u32::from(p.b);
            light.1 += 1;
        } else {
            dark.0[0] += u32::from(p.r);
            dark.0[1] += u32::from(p.g);
            dark.0[2] += u32::from(p.b);
            dark.1 += 1;
        }
    }
    let avg = |(sum, count): ([u32; 3], u32), fallback: Color| -> Color {
        if count == 0 {
            fallback
        } else {
            Color::rgb(
                (sum[0] / count) as u8,
                (sum[1] / count) as u8,
                (sum[2] / count) as u8,
            )
        }
    };
    Cell::new(
        QUADRANT_CHARS[pattern],
        avg(light, bg),
        Some(avg(dark, bg)),
    )
}

/// One ASCII cell: grayscale indexes the character ramp, foreground is
/// the pixel color.
fn blit_ascii(buffer: &PixelBuffer, (ox, oy): (u32, u32), bg: Color) -> Cell {
    let px = buffer.get(ox, oy).over(bg);
    let index = (usize::from(px.grayscale()) * (ASCII_RAMP.len() - 1)) / 255;
    Cell::new(ASCII_RAMP[index], px, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dimensions() {
        let buffer = PixelBuffer::filled(10, 10, Color::WHITE);
        assert_eq!(blit(&buffer, BlitMode::Braille, 128, Color::WHITE, Color::BLACK).width(), 5);
        assert_eq!(blit(&buffer, BlitMode::Braille, 128, Color::WHITE, Color::BLACK).height(), 3);
        assert_eq!(blit(&buffer, BlitMode::HalfBlock, 128, Color::WHITE, Color::BLACK).height(), 5);
        assert_eq!(blit(&buffer, BlitMode::Quadrant, 128, Color::WHITE, Color::BLACK).width(), 5);
        assert_eq!(blit(&buffer, BlitMode::Ascii, 128, Color::WHITE, Color::BLACK).width(), 10);
    }

    #[test]
    fn test_braille_single_dot() {
        // Only the sub-pixel at (1, 3) is above threshold → dot 8 →
        // 0x2800 | 0x80.
        let mut buffer = PixelBuffer::filled(2, 4, Color::BLACK);
        buffer.set(1, 3, Color::WHITE);
        let canvas = blit(&buffer, BlitMode::Braille, 128, Color::WHITE, Color::BLACK);
        assert_eq!(canvas.get(0, 0).unwrap().ch, '\u{2880}');
    }

    #[test]
    fn test_braille_codepoint_range() {
        // Every braille cell character lies in U+2800..=U+28FF.
        let mut buffer = PixelBuffer::filled(16, 16, Color::BLACK);
        for y in 0..16 {
            for x in 0..16 {
                if (x + y) % 3 == 0 {
                    buffer.set(x, y, Color::WHITE);
                }
            }
        }
        let canvas = blit(&buffer, BlitMode::Braille, 128, Color::WHITE, Color::BLACK);
        for row in canvas.rows() {
            for cell in row {
                let cp = cell.ch as u32;
                assert!((0x2800..=0x28FF).contains(&cp), "not braille: {cp:#x}");
            }
        }
    }

    #[test]
    fn test_half_block_collapse() {
        // Equal top and bottom collapse to a space with fg == bg.
        let buffer = PixelBuffer::filled(1, 2, Color::rgb(10, 20, 30));
        let canvas = blit(&buffer, BlitMode::HalfBlock, 128, Color::WHITE, Color::BLACK);
        let cell = canvas.get(0, 0).unwrap();
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.bg, Some(cell.fg));
    }

    #[test]
    fn test_half_block_split() {
        let mut buffer = PixelBuffer::filled(1, 2, Color::BLACK);
        buffer.set(0, 0, Color::WHITE);
        let canvas = blit(&buffer, BlitMode::HalfBlock, 128, Color::WHITE, Color::BLACK);
        let cell = canvas.get(0, 0).unwrap();
        assert_eq!(cell.ch, '▀');
        assert_eq!(cell.fg, Color::WHITE);
        assert_eq!(cell.bg, Some(Color::BLACK));
    }

    #[test]
    fn test_quadrant_patterns() {
        // Top row white, bottom row black → upper half block.
        let mut buffer = PixelBuffer::filled(2, 2, Color::BLACK);
        buffer.set(0, 0, Color::WHITE);
        buffer.set(1, 0, Color::WHITE);
        let canvas = blit(&buffer, BlitMode::Quadrant, 128, Color::WHITE, Color::BLACK);
        assert_eq!(canvas.get(0, 0).unwrap().ch, '▀');
    }

    #[test]
    fn test_ascii_ramp_extremes() {
        let black = PixelBuffer::filled(1, 1, Color::BLACK);
        let white = PixelBuffer::filled(1, 1, Color::WHITE);
        let dark = blit(&black, BlitMode::Ascii, 128, Color::WHITE, Color::BLACK);
        let light = blit(&white, BlitMode::Ascii, 128, Color::WHITE, Color::BLACK);
        assert_eq!(dark.get(0, 0).unwrap().ch, ' ');
        assert_eq!(light.get(0, 0).unwrap().ch, '@');
    }
}
