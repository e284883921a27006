//! Dithering: error diffusion and ordered thresholding.

use crate::color::Color;

use super::palette::Palette;
use super::pixel::PixelBuffer;

/// Floyd–Steinberg error diffusion with serpentine scanning.
///
/// Weights: 7/16 to the next pixel, 3/16 down-left, 5/16 down, 1/16
/// down-right — mirrored on right-to-left rows so the error never piles
/// up along one edge.
pub fn floyd_steinberg(buffer: &mut PixelBuffer, palette: Palette) {
    let width = buffer.width() as i64;
    let height = buffer.height() as i64;
    // Channel error accumulators, f32 per channel.
    let mut errors: Vec<[f32; 3]> = vec![[0.0; 3]; (width * height).max(0) as usize];
    let idx = |x: i64, y: i64| (y * width + x) as usize;

    for y in 0..height {
        let left_to_right = y % 2 == 0;
        let xs: Vec<i64> = if left_to_right {
            (0..width).collect()
        } else {
            (0..width).rev().collect()
        };
        for x in xs {
            let original = buffer.get(x as u32, y as u32);
            let err = errors[idx(x, y)];
            let adjusted = Color::rgb(
                (f32::from(original.r) + err[0]).clamp(0.0, 255.0) as u8,
                (f32::from(original.g) + err[1]).clamp(0.0, 255.0) as u8,
                (f32::from(original.b) + err[2]).clamp(0.0, 255.0) as u8,
            );
            let quantized = palette.nearest(adjusted);
            buffer.set(
                x as u32,
                y as u32,
                Color::rgba(quantized.r, quantized.g, quantized.b, original.a),
            );

            let residual = [
                f32::from(adjusted.r) - f32::from(quantized.r),
                f32::from(adjusted.g) - f32::from(quantized.g),
                f32::from(adjusted.b) - f32::from(quantized.b),
            ];

            // Diffusion targets, mirrored on right-to-left rows.
            let forward: i64 = if left_to_right { 1 } else { -1 };
            let targets: [(i64, i64, f32); 4] = [
                (x + forward, y, 7.0 / 16.0),
                (x - forward, y + 1, 3.0 / 16.0),
                (x, y + 1, 5.0 / 16.0),
                (x + forward, y + 1, 1.0 / 16.0),
            ];
            for (tx, ty, weight) in targets {
                if tx >= 0 && tx < width && ty >= 0 && ty < height {
                    let slot = &mut errors[idx(tx, ty)];
                    for c in 0..3 {
                        slot[c] += residual[c] * weight;
                    }
                }
            }
        }
    }
}

/// Ordered (Bayer) dithering with a threshold matrix of size 2, 4, or 8.
///
/// Larger matrices are generated recursively from the 2×2 base:
/// `M(2n) = [[4M, 4M+2], [4M+3, 4M+1]]`.
pub fn ordered(buffer: &mut PixelBuffer, palette: Palette, matrix_size: u8) {
    let size = match matrix_size {
        2 | 4 | 8 => u32::from(matrix_size),
        _ => 4,
    };
    let matrix = bayer_matrix(size);
    let cells = (size * size) as f32;

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let original = buffer.get(x, y);
            // Normalized threshold in (-0.5, 0.5), scaled to a ±32-level
            // nudge before snapping to the palette.
            let t = matrix[(y % size) as usize][(x % size) as usize] as f32 / cells - 0.5;
            let nudge = t * 64.0;
            let adjusted = Color::rgb(
                (f32::from(original.r) + nudge).clamp(0.0, 255.0) as u8,
                (f32::from(original.g) + nudge).clamp(0.0, 255.0) as u8,
                (f32::from(original.b) + nudge).clamp(0.0, 255.0) as u8,
            );
            let quantized = palette.nearest(adjusted);
            buffer.set(
                x,
                y,
                Color::rgba(quantized.r, quantized.g, quantized.b, original.a),
            );
        }
    }
}

/// Generate a Bayer threshold matrix of the given power-of-two size.
fn bayer_matrix(size: u32) -> Vec<Vec<u32>> {
    if size <= 2 {
        return vec![vec![0, 2], vec![3, 1]];
    }
    let half = bayer_matrix(size / 2);
    let n = (size / 2) as usize;
    let mut matrix = vec![vec![0u32; size as usize]; size as usize];
    for y in 0..n {
        for x in 0..n {
            let v = 4 * half[y][x];
            matrix[y][x] = v;
            matrix[y][x + n] = v + 2;
            matrix[y + n][x] = v + 3;
            matrix[y + n][x + n] = v + 1;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_matrix_shapes() {
        let m2 = bayer_matrix(2);
        assert_eq!(m2, vec![vec![0, 2], vec![3, 1]]);

        let m4 = bayer_matrix(4);
        assert_eq!(m4.len(), 4);
        // A Bayer matrix is a permutation of 0..n².
        let mut values: Vec<u32> = m4.iter().flatten().copied().collect();
        values.sort_unstable();
        assert_eq!(values, (0..16).collect::<Vec<u32>>());

        let m8 = bayer_matrix(8);
        let mut values: Vec<u32> = m8.iter().flatten().copied().collect();
        values.sort_unstable();
        assert_eq!(values, (0..64).collect::<Vec<u32>>());
    }

    #[test]
    fn test_floyd_steinberg_output_is_palettized() {
        let mut buffer = PixelBuffer::filled(8, 8, Color::rgb(127, 127, 127));
        floyd_steinberg(&mut buffer, Palette::Mono);
        assert!(buffer
            .pixels()
            .iter()
            .all(|&p| p == Color::WHITE || p == Color::BLACK));
        // Mid-gray dithers to a mix, not a solid field.
        let whites = buffer.pixels().iter().filter(|&&p| p == Color::WHITE).count();
        assert!(whites > 0 && whites < 64);
    }

    #[test]
    fn test_ordered_output_is_palettized() {
        let mut buffer = PixelBuffer::filled(8, 8, Color::rgb(127, 127, 127));
        ordered(&mut buffer, Palette::Mono, 8);
        assert!(buffer
            .pixels()
            .iter()
            .all(|&p| p == Color::WHITE || p == Color::BLACK));
    }
}
