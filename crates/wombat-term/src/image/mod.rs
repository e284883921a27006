//! Raster-to-cell image pipeline.
//!
//! Scale → dither → blit: a pixel buffer plus render options becomes a
//! grid of styled cells. Each stage is its own module and independently
//! testable; [`render_image`] runs the full pipeline.

/// Blitters (braille, half-block, quadrant, ASCII).
pub mod blit;
/// Floyd–Steinberg and ordered dithering.
pub mod dither;
/// Quantization palettes.
pub mod palette;
/// Pixel buffers.
pub mod pixel;
/// Bilinear and nearest-neighbor scaling.
pub mod scale;

pub use blit::{blit, BlitMode};
pub use palette::Palette;
pub use pixel::PixelBuffer;

use crate::canvas::Canvas;
use crate::color::{Color, ColorSupport};

/// Dithering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dithering {
    /// No dithering; straight nearest-palette quantization happens at
    /// serialization time.
    #[default]
    None,
    /// Floyd–Steinberg error diffusion (serpentine scan).
    FloydSteinberg,
    /// Ordered (Bayer) dithering with a matrix of size 2, 4, or 8.
    Ordered(u8),
}

/// Options for one image render.
#[derive(Debug, Clone)]
pub struct ImageRenderOptions {
    /// Maximum output width in cells (`None` = derive from the buffer).
    pub target_width: Option<u32>,
    /// Maximum output height in cells (`None` = derive from the buffer).
    pub target_height: Option<u32>,
    /// Blit mode.
    pub blit_mode: BlitMode,
    /// Dithering strategy.
    pub dithering: Dithering,
    /// Terminal color capability (drives the dither palette).
    pub color_support: ColorSupport,
    /// Keep the source aspect ratio when fitting.
    pub preserve_aspect_ratio: bool,
    /// Braille on/off grayscale threshold.
    pub threshold: u8,
    /// Default foreground for cells with no lit pixels.
    pub fg: Color,
    /// Background color composited under transparent pixels.
    pub bg: Color,
}

impl Default for ImageRenderOptions {
    fn default() -> Self {
        Self {
            target_width: None,
            target_height: None,
            blit_mode: BlitMode::default(),
            dithering: Dithering::default(),
            color_support: ColorSupport::default(),
            preserve_aspect_ratio: true,
            threshold: 128,
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// Run the full pipeline: fit, scale, dither, blit.
///
/// The image is scaled so the output fits `target_width × px_x` by
/// `target_height × px_y` pixels, never upscaling beyond 1×. The
/// resulting canvas is `(ceil(w / px_x), ceil(h / px_y))` cells of the
/// scaled size.
#[must_use]
pub fn render_image(buffer: &PixelBuffer, opts: &ImageRenderOptions) -> Canvas {
    let (px_x, px_y) = opts.blit_mode.cell_pixels();

    if buffer.width() == 0 || buffer.height() == 0 {
        return Canvas::new(0, 0);
    }

    // Fit into the pixel budget implied by the cell targets.
    let max_w = opts.target_width.map_or(buffer.width(), |c| c * px_x);
    let max_h = opts.target_height.map_or(buffer.height(), |c| c * px_y);

    let scale_x = max_w as f64 / f64::from(buffer.width());
    let scale_y = max_h as f64 / f64::from(buffer.height());
    let (factor_x, factor_y) = if opts.preserve_aspect_ratio {
        // One uniform factor; never upscale.
        let f = scale_x.min(scale_y).min(1.0);
        (f, f)
    } else {
        (scale_x.min(1.0), scale_y.min(1.0))
    };

    let new_w = ((f64::from(buffer.width()) * factor_x).round() as u32).max(1);
    let new_h = ((f64::from(buffer.height()) * factor_y).round() as u32).max(1);

    let mut scaled = if opts.blit_mode == BlitMode::Ascii {
        scale::scale_nearest(buffer, new_w, new_h)
    } else {
        scale::scale_bilinear(buffer, new_w, new_h)
    };

    // Dither against the palette implied by the terminal's colors; a
    // true-color terminal needs no quantization.
    if let Some(palette) = Palette::for_support(opts.color_support) {
        match opts.dithering {
            Dithering::None => {}
            Dithering::FloydSteinberg => dither::floyd_steinberg(&mut scaled, palette),
            Dithering::Ordered(size) => dither::ordered(&mut scaled, palette, size),
        }
    }

    blit(&scaled, opts.blit_mode, opts.threshold, opts.fg, opts.bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_upscales() {
        let buffer = PixelBuffer::filled(4, 4, Color::WHITE);
        let opts = ImageRenderOptions {
            target_width: Some(100),
            target_height: Some(100),
            blit_mode: BlitMode::HalfBlock,
            ..ImageRenderOptions::default()
        };
        let canvas = render_image(&buffer, &opts);
        // 4×4 pixels at 1×2 per cell: 4 columns, 2 rows — not stretched
        // to the 100-cell budget.
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 2);
    }

    #[test]
    fn test_fits_width_budget() {
        let buffer = PixelBuffer::filled(100, 40, Color::WHITE);
        let opts = ImageRenderOptions {
            target_width: Some(20),
            target_height: Some(100),
            blit_mode: BlitMode::Braille,
            ..ImageRenderOptions::default()
        };
        let canvas = render_image(&buffer, &opts);
        assert!(canvas.width() <= 20);
        // Aspect preserved: 100×40 scaled to 40 px wide → 16 px tall →
        // 4 braille rows.
        assert_eq!(canvas.width(), 20);
        assert_eq!(canvas.height(), 4);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = PixelBuffer::filled(0, 0, Color::WHITE);
        let canvas = render_image(&buffer, &ImageRenderOptions::default());
        assert_eq!(canvas.width(), 0);
        assert_eq!(canvas.height(), 0);
    }
}
