//! Quantization palettes.

use crate::color::{
    ansi16_index, ansi256_color, ansi256_index, Color, ColorSupport, ANSI16_COLORS,
};

/// A fixed palette to quantize against during dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// The 256-color cube + grayscale ramp.
    Ansi256,
    /// The 16 system colors.
    Ansi16,
    /// Black and white.
    Mono,
}

impl Palette {
    /// The palette implied by a terminal's color support; `TrueColor`
    /// needs no quantization.
    #[must_use]
    pub const fn for_support(support: ColorSupport) -> Option<Self> {
        match support {
            ColorSupport::TrueColor => None,
            ColorSupport::Ansi256 => Some(Self::Ansi256),
            ColorSupport::Ansi16 => Some(Self::Ansi16),
            ColorSupport::None => Some(Self::Mono),
        }
    }

    /// The nearest palette entry for a color (redmean metric for the
    /// color palettes, luma threshold for mono).
    #[must_use]
    pub fn nearest(&self, color: Color) -> Color {
        match self {
            Self::Ansi256 => ansi256_color(ansi256_index(color)),
            Self::Ansi16 => ANSI16_COLORS[ansi16_index(color) as usize],
            Self::Mono => {
                if color.grayscale() >= 128 {
                    Color::WHITE
                } else {
                    Color::BLACK
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_threshold() {
        assert_eq!(Palette::Mono.nearest(Color::rgb(200, 200, 200)), Color::WHITE);
        assert_eq!(Palette::Mono.nearest(Color::rgb(40, 40, 40)), Color::BLACK);
    }

    #[test]
    fn test_ansi256_snaps_to_cube() {
        let snapped = Palette::Ansi256.nearest(Color::rgb(100, 140, 180));
        // Every channel must be a cube level or a grayscale step.
        let levels = [0u8, 95, 135, 175, 215, 255];
        assert!(levels.contains(&snapped.r) || snapped.r == snapped.g && snapped.g == snapped.b);
    }

    #[test]
    fn test_truecolor_needs_no_palette() {
        assert_eq!(Palette::for_support(ColorSupport::TrueColor), None);
        assert_eq!(
            Palette::for_support(ColorSupport::None),
            Some(Palette::Mono)
        );
    }
}
