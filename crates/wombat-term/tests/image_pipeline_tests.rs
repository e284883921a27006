//! Integration tests for the image pipeline: scale → dither → blit →
//! serialize.

use wombat_term::image::{render_image, BlitMode, Dithering, ImageRenderOptions, PixelBuffer};
use wombat_term::{serialize, Color, ColorSupport};

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(width, height, Color::BLACK);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255) / width.max(1)) as u8;
            buffer.set(x, y, Color::rgb(v, v, v));
        }
    }
    buffer
}

#[test]
fn test_blitter_dimension_invariant() {
    // Output is (ceil(w/px_x), ceil(h/px_y)) cells for every mode.
    let cases = [
        (BlitMode::Braille, 2u32, 4u32),
        (BlitMode::HalfBlock, 1, 2),
        (BlitMode::Quadrant, 2, 2),
        (BlitMode::Ascii, 1, 1),
    ];
    for (mode, px, py) in cases {
        for (w, h) in [(7u32, 9u32), (8, 8), (1, 1), (3, 5)] {
            let buffer = gradient(w, h);
            let opts = ImageRenderOptions {
                blit_mode: mode,
                ..ImageRenderOptions::default()
            };
            let canvas = render_image(&buffer, &opts);
            assert_eq!(canvas.width() as u32, w.div_ceil(px), "{mode:?} {w}x{h}");
            assert_eq!(canvas.height() as u32, h.div_ceil(py), "{mode:?} {w}x{h}");
        }
    }
}

#[test]
fn test_braille_spec_scenario() {
    // 2×4 grayscale block with only pixel (1,3) above threshold →
    // codepoint 0x2800 | 0x80 = 0x2880.
    let mut buffer = PixelBuffer::filled(2, 4, Color::BLACK);
    buffer.set(1, 3, Color::rgb(250, 250, 250));
    let opts = ImageRenderOptions {
        blit_mode: BlitMode::Braille,
        threshold: 128,
        ..ImageRenderOptions::default()
    };
    let canvas = render_image(&buffer, &opts);
    assert_eq!(canvas.width(), 1);
    assert_eq!(canvas.height(), 1);
    assert_eq!(canvas.get(0, 0).unwrap().ch as u32, 0x2880);
}

#[test]
fn test_dithered_render_quantizes_to_palette() {
    let buffer = gradient(32, 8);
    let opts = ImageRenderOptions {
        blit_mode: BlitMode::HalfBlock,
        dithering: Dithering::FloydSteinberg,
        color_support: ColorSupport::Ansi16,
        ..ImageRenderOptions::default()
    };
    let canvas = render_image(&buffer, &opts);
    // Every cell color must be one of the 16 system colors.
    for row in canvas.rows() {
        for cell in row {
            assert!(
                wombat_term::color::ANSI16_COLORS.contains(&cell.fg),
                "fg {:?} not in ANSI-16 palette",
                cell.fg
            );
        }
    }
}

#[test]
fn test_ordered_dither_matrix_sizes() {
    for size in [2u8, 4, 8] {
        let buffer = gradient(16, 8);
        let opts = ImageRenderOptions {
            blit_mode: BlitMode::Ascii,
            dithering: Dithering::Ordered(size),
            color_support: ColorSupport::None,
            ..ImageRenderOptions::default()
        };
        let canvas = render_image(&buffer, &opts);
        assert_eq!(canvas.width(), 16);
    }
}

#[test]
fn test_transparent_pixels_composite_over_bg() {
    let buffer = PixelBuffer::filled(2, 4, Color::TRANSPARENT);
    let opts = ImageRenderOptions {
        blit_mode: BlitMode::Braille,
        bg: Color::BLACK,
        ..ImageRenderOptions::default()
    };
    let canvas = render_image(&buffer, &opts);
    // Fully transparent over black: no dots lit.
    assert_eq!(canvas.get(0, 0).unwrap().ch, '\u{2800}');
}

#[test]
fn test_serialization_respects_color_support() {
    let buffer = gradient(8, 8);
    let opts = ImageRenderOptions {
        blit_mode: BlitMode::HalfBlock,
        ..ImageRenderOptions::default()
    };
    let canvas = render_image(&buffer, &opts);

    let plain = serialize(&canvas, ColorSupport::None);
    assert!(!plain.contains('\x1b'));

    let truecolor = serialize(&canvas, ColorSupport::TrueColor);
    assert!(truecolor.contains("38;2;"));

    let ansi256 = serialize(&canvas, ColorSupport::Ansi256);
    assert!(ansi256.contains("38;5;"));
}

#[test]
fn test_render_is_deterministic() {
    let buffer = gradient(30, 20);
    let opts = ImageRenderOptions {
        blit_mode: BlitMode::Quadrant,
        dithering: Dithering::FloydSteinberg,
        color_support: ColorSupport::Ansi256,
        ..ImageRenderOptions::default()
    };
    let first = render_image(&buffer, &opts);
    let second = render_image(&buffer, &opts);
    assert_eq!(first, second);
}

#[test]
fn test_unpremultiply() {
    let mut buffer = PixelBuffer::filled(1, 1, Color::rgba(64, 32, 16, 128));
    buffer.unpremultiply();
    let px = buffer.get(0, 0);
    assert_eq!(px.r, 127);
    assert_eq!(px.g, 63);
    assert_eq!(px.b, 31);
    assert_eq!(px.a, 128);
}
