//! Terminal colors and color-support conversions.
//!
//! Defines the RGBA color type used across the cell and image pipeline,
//! the terminal color-capability levels, and the conversions onto the
//! ANSI-256 cube and the 16-color table.

/// An RGBA color (8 bits per channel, straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Rec. 601 luma, 0–255.
    #[must_use]
    pub fn grayscale(&self) -> u8 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b))
            .round() as u8
    }

    /// Alpha-blend `self` over an opaque background.
    #[must_use]
    pub fn over(&self, background: Self) -> Self {
        if self.a == 255 {
            return *self;
        }
        if self.a == 0 {
            return background;
        }
        let alpha = f32::from(self.a) / 255.0;
        let blend = |fg: u8, bg: u8| -> u8 {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        Self::rgb(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }
}

/// Terminal color capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// No color codes at all (plain characters).
    None,
    /// The 16 system colors.
    Ansi16,
    /// The 256-color cube + grayscale ramp.
    Ansi256,
    /// 24-bit SGR sequences.
    #[default]
    TrueColor,
}

/// Weighted Euclidean color distance ("redmean").
///
/// `rMean = (a.r + b.r) / 2`, weights `(2 + rMean/256, 4, 2 + (255 −
/// rMean)/256)` over the channel deltas. A cheap approximation of
/// perceptual distance that beats plain Euclidean on skin tones and
/// blues.
#[must_use]
pub fn redmean_distance(a: Color, b: Color) -> f64 {
    let r_mean = (f64::from(a.r) + f64::from(b.r)) / 2.0;
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (2.0 + r_mean / 256.0) * dr * dr + 4.0 * dg * dg + (2.0 + (255.0 - r_mean) / 256.0) * db * db
}

/// The 16 system colors (VGA-ish palette).
pub const ANSI16_COLORS: [Color; 16] = [
    Color::rgb(0, 0, 0),
    Color::rgb(205, 0, 0),
    Color::rgb(0, 205, 0),
    Color::rgb(205, 205, 0),
    Color::rgb(0, 0, 238),
    Color::rgb(205, 0, 205),
    Color::rgb(0, 205, 205),
    Color::rgb(229, 229, 229),
    Color::rgb(127, 127, 127),
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(92, 92, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(0, 255, 255),
    Color::rgb(255, 255, 255),
];

/// Cube channel levels for ANSI-256 indices 16–231.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// The RGB value of an ANSI-256 index.
///
/// Indices 16–231 map to the 6×6×6 cube over `{0, 95, 135, 175, 215,
/// 255}`; 232–255 to the grayscale ramp `8 + (i − 232) · 10`; 0–15 to the
/// system colors.
#[must_use]
pub fn ansi256_color(index: u8) -> Color {
    match index {
        0..=15 => ANSI16_COLORS[index as usize],
        16..=231 => {
            let i = index - 16;
            let r = CUBE_LEVELS[(i / 36) as usize];
            let g = CUBE_LEVELS[((i / 6) % 6) as usize];
            let b = CUBE_LEVELS[(i % 6) as usize];
            Color::rgb(r, g, b)
        }
        232..=255 => {
            let v = 8 + (index - 232) * 10;
            Color::rgb(v, v, v)
        }
    }
}

/// The nearest ANSI-256 index for a color: the best cube entry competes
/// with the best grayscale-ramp entry under the redmean metric.
#[must_use]
pub fn ansi256_index(color: Color) -> u8 {
    let level = |v: u8| -> u8 {
        let mut best = 0u8;
        let mut best_d = u32::MAX;
        for (i, &l) in CUBE_LEVELS.iter().enumerate() {
            let d = u32::from(v.abs_diff(l)).pow(2);
            if d < best_d {
                best_d = d;
                best = i as u8;
            }
        }
        best
    };
    let cube_index = 16 + 36 * level(color.r) + 6 * level(color.g) + level(color.b);
    let cube = ansi256_color(cube_index);

    let gray = color.grayscale();
    let gray_step = ((i32::from(gray) - 8 + 5) / 10).clamp(0, 23) as u8;
    let gray_index = 232 + gray_step;
    let ramp = ansi256_color(gray_index);

    if redmean_distance(color, ramp) < redmean_distance(color, cube) {
        gray_index
    } else {
        cube_index
    }
}

/// The nearest of the 16 system colors under the redmean metric.
#[must_use]
pub fn ansi16_index(color: Color) -> u8 {
    let mut best = 0u8;
    let mut best_d = f64::INFINITY;
    for (i, &candidate) in ANSI16_COLORS.iter().enumerate() {
        let d = redmean_distance(color, candidate);
        if d < best_d {
            best_d = d;
            best = i as u8;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_corners() {
        assert_eq!(ansi256_color(16), Color::rgb(0, 0, 0));
        assert_eq!(ansi256_color(231), Color::rgb(255, 255, 255));
        // 196 = 16 + 36*5 → pure red at full level.
        assert_eq!(ansi256_color(196), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_grayscale_ramp() {
        assert_eq!(ansi256_color(232), Color::rgb(8, 8, 8));
        assert_eq!(ansi256_color(255), Color::rgb(238, 238, 238));
    }

    #[test]
    fn test_index_round_trip_on_exact_cube_colors() {
        for index in [16u8, 21, 46, 196, 201, 226, 231] {
            let c = ansi256_color(index);
            assert_eq!(ansi256_index(c), index, "index {index} did not round-trip");
        }
    }

    #[test]
    fn test_ansi16_nearest() {
        assert_eq!(ansi16_index(Color::rgb(0, 0, 0)), 0);
        assert_eq!(ansi16_index(Color::rgb(255, 255, 255)), 15);
        assert_eq!(ansi16_index(Color::rgb(250, 10, 10)), 9);
    }

    #[test]
    fn test_redmean_symmetry() {
        let a = Color::rgb(12, 200, 80);
        let b = Color::rgb(240, 3, 77);
        assert_eq!(redmean_distance(a, b), redmean_distance(b, a));
        assert_eq!(redmean_distance(a, a), 0.0);
    }

    #[test]
    fn test_alpha_blend() {
        let half = Color::rgba(255, 0, 0, 128);
        let blended = half.over(Color::BLACK);
        assert!(blended.r > 120 && blended.r < 135);
        assert_eq!(blended.g, 0);
    }
}
