//! Length resolution onto the character-cell grid.
//!
//! The layout engine works in integer terminal cells. CSS absolute lengths
//! resolve at a fixed glyph-aspect ratio: one column is 8 px wide and one
//! row 16 px tall, matching common terminal fonts and the 2×4 braille
//! sub-pixel grid of the image pipeline. An em square spans two columns by
//! one row at that ratio.

use crate::style::Length;

/// Pixels per column.
pub const PX_PER_CELL_X: f32 = 8.0;
/// Pixels per row.
pub const PX_PER_CELL_Y: f32 = 16.0;
/// Columns per em.
pub const CELLS_PER_EM_X: f32 = 2.0;
/// Rows per em.
pub const CELLS_PER_EM_Y: f32 = 1.0;

/// Resolve a length against a horizontal containing dimension (columns).
///
/// Returns `None` for `auto`.
#[must_use]
pub fn resolve_width(length: Length, containing: i32) -> Option<i32> {
    match length {
        Length::Px(px) => Some((px as f32 / PX_PER_CELL_X).round() as i32),
        Length::Em(em) => Some((em * CELLS_PER_EM_X).round() as i32),
        Length::Percent(pct) => Some((containing as f32 * pct / 100.0).round() as i32),
        Length::Auto => None,
    }
}

/// Resolve a length against a vertical containing dimension (rows).
///
/// Returns `None` for `auto`.
#[must_use]
pub fn resolve_height(length: Length, containing: i32) -> Option<i32> {
    match length {
        Length::Px(px) => Some((px as f32 / PX_PER_CELL_Y).round() as i32),
        Length::Em(em) => Some((em * CELLS_PER_EM_Y).round() as i32),
        Length::Percent(pct) => Some((containing as f32 * pct / 100.0).round() as i32),
        Length::Auto => None,
    }
}

/// Convert a raw pixel count to columns.
#[must_use]
pub fn px_to_cols(px: f32) -> i32 {
    (px / PX_PER_CELL_X).round() as i32
}

/// Convert a raw pixel count to rows.
#[must_use]
pub fn px_to_rows(px: f32) -> i32 {
    (px / PX_PER_CELL_Y).round() as i32
}
