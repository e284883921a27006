//! Terminal cell model, ANSI serialization, and the raster-to-cell image
//! pipeline for the Wombat browser.
//!
//! # Scope
//!
//! - **Cells and canvas** — the `(character, fg, bg, attrs)` grid the
//!   renderer paints into
//! - **Colors** — RGBA colors, terminal capability levels, ANSI-256 cube
//!   and 16-color mappings, redmean distance
//! - **ANSI output** — canvas → SGR byte stream at the terminal's color
//!   precision (`ColorSupport::None` emits plain text)
//! - **Key codes** — the raw-input contract the terminal collaborator
//!   feeds
//! - **Image pipeline** — scale → dither → blit with braille, half-block,
//!   quadrant, and ASCII encodings
//!
//! Raw-mode terminal I/O itself lives outside this crate; everything here
//! is pure data in, bytes out.

/// Canvas serialization to ANSI escape sequences.
pub mod ansi;
/// The character canvas.
pub mod canvas;
/// Terminal cells and attributes.
pub mod cell;
/// Colors and capability conversions.
pub mod color;
/// Raster-to-cell image pipeline.
pub mod image;
/// Keyboard input contract.
pub mod keys;

pub use ansi::serialize;
pub use canvas::Canvas;
pub use cell::{Cell, CellAttrs};
pub use color::{
    ansi16_index, ansi256_color, ansi256_index, redmean_distance, Color, ColorSupport,
};
pub use image::{render_image, BlitMode, Dithering, ImageRenderOptions, Palette, PixelBuffer};
pub use keys::KeyCode;
