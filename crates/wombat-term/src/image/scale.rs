//! Raster scaling.

use crate::color::Color;

use super::pixel::PixelBuffer;

/// Bilinear resampling to the target size.
///
/// Sample positions map cell centers back into the source so the first
/// and last rows/columns are not over-weighted.
#[must_use]
pub fn scale_bilinear(src: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    if new_width == 0 || new_height == 0 {
        return PixelBuffer::filled(0, 0, Color::TRANSPARENT);
    }
    if new_width == src.width() && new_height == src.height() {
        return src.clone();
    }

    let mut out = PixelBuffer::filled(new_width, new_height, Color::TRANSPARENT);
    let x_ratio = src.width() as f32 / new_width as f32;
    let y_ratio = src.height() as f32 / new_height as f32;

    for y in 0..new_height {
        let src_y = (y as f32 + 0.5) * y_ratio - 0.5;
        let y0 = src_y.floor().max(0.0) as u32;
        let y1 = (y0 + 1).min(src.height().saturating_sub(1));
        let ty = (src_y - src_y.floor()).clamp(0.0, 1.0);

        for x in 0..new_width {
            let src_x = (x as f32 + 0.5) * x_ratio - 0.5;
            let x0 = src_x.floor().max(0.0) as u32;
            let x1 = (x0 + 1).min(src.width().saturating_sub(1));
            let tx = (src_x - src_x.floor()).clamp(0.0, 1.0);

            let top = lerp(src.get(x0, y0), src.get(x1, y0), tx);
            let bottom = lerp(src.get(x0, y1), src.get(x1, y1), tx);
            out.set(x, y, lerp(top, bottom, ty));
        }
    }
    out
}

/// Nearest-neighbor resampling (cheap path for ASCII blitting).
#[must_use]
pub fn scale_nearest(src: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    if new_width == 0 || new_height == 0 {
        return PixelBuffer::filled(0, 0, Color::TRANSPARENT);
    }
    let mut out = PixelBuffer::filled(new_width, new_height, Color::TRANSPARENT);
    for y in 0..new_height {
        let src_y = (y as u64 * u64::from(src.height()) / u64::from(new_height)) as u32;
        for x in 0..new_width {
            let src_x = (x as u64 * u64::from(src.width()) / u64::from(new_width)) as u32;
            out.set(x, y, src.get(src_x, src_y));
        }
    }
    out
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    let mix = |x: u8, y: u8| -> u8 { (f32::from(x) * (1.0 - t) + f32::from(y) * t).round() as u8 };
    Color::rgba(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scale() {
        let src = PixelBuffer::filled(4, 4, Color::rgb(10, 20, 30));
        let out = scale_bilinear(&src, 4, 4);
        assert_eq!(out, src);
    }

    #[test]
    fn test_downscale_dimensions() {
        let src = PixelBuffer::filled(10, 8, Color::WHITE);
        let out = scale_bilinear(&src, 5, 2);
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 2);
        // Uniform input stays uniform.
        assert!(out.pixels().iter().all(|&p| p == Color::WHITE));
    }

    #[test]
    fn test_zero_target() {
        let src = PixelBuffer::filled(4, 4, Color::WHITE);
        let out = scale_bilinear(&src, 0, 3);
        assert_eq!(out.width(), 0);
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn test_nearest_picks_source_pixels() {
        let mut src = PixelBuffer::filled(2, 1, Color::BLACK);
        src.set(1, 0, Color::WHITE);
        let out = scale_nearest(&src, 4, 1);
        assert_eq!(out.get(0, 0), Color::BLACK);
        assert_eq!(out.get(3, 0), Color::WHITE);
    }
}
