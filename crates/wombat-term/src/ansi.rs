//! ANSI serialization of a canvas.
//!
//! Turns a [`Canvas`] into a byte string of characters and SGR escape
//! sequences at the precision of the requested [`ColorSupport`]. Runs of
//! cells with identical styling share one escape sequence;
//! `ColorSupport::None` emits no escape bytes at all.

use crate::canvas::Canvas;
use crate::cell::CellAttrs;
use crate::color::{ansi16_index, ansi256_index, Color, ColorSupport};

const RESET: &str = "\x1b[0m";

/// Serialize the canvas to a string of text and SGR sequences, one line
/// per canvas row, each row reset and newline-terminated.
#[must_use]
pub fn serialize(canvas: &Canvas, support: ColorSupport) -> String {
    let mut out = String::with_capacity(canvas.width() * canvas.height() * 4);
    for row in canvas.rows() {
        let mut current: Option<(Color, Option<Color>, CellAttrs)> = None;
        for cell in row {
            if support == ColorSupport::None {
                out.push(cell.ch);
                continue;
            }
            let state = (cell.fg, cell.bg, cell.attrs);
            if current != Some(state) {
                out.push_str(RESET);
                out.push_str(&sgr_for(cell.fg, cell.bg, cell.attrs, support));
                current = Some(state);
            }
            out.push(cell.ch);
        }
        if support != ColorSupport::None {
            out.push_str(RESET);
        }
        out.push('\n');
    }
    out
}

/// Build the SGR sequence selecting the given style (assumes a preceding
/// reset).
fn sgr_for(fg: Color, bg: Option<Color>, attrs: CellAttrs, support: ColorSupport) -> String {
    let mut params: Vec<String> = Vec::new();
    if attrs.bold {
        params.push("1".to_string());
    }
    if attrs.italic {
        params.push("3".to_string());
    }
    if attrs.underline {
        params.push("4".to_string());
    }
    if attrs.reverse {
        params.push("7".to_string());
    }

    match support {
        ColorSupport::None => {}
        ColorSupport::TrueColor => {
            params.push(format!("38;2;{};{};{}", fg.r, fg.g, fg.b));
            if let Some(bg) = bg {
                params.push(format!("48;2;{};{};{}", bg.r, bg.g, bg.b));
            }
        }
        ColorSupport::Ansi256 => {
            params.push(format!("38;5;{}", ansi256_index(fg)));
            if let Some(bg) = bg {
                params.push(format!("48;5;{}", ansi256_index(bg)));
            }
        }
        ColorSupport::Ansi16 => {
            params.push(ansi16_fg(ansi16_index(fg)).to_string());
            if let Some(bg) = bg {
                params.push(ansi16_bg(ansi16_index(bg)).to_string());
            }
        }
    }

    if params.is_empty() {
        return String::new();
    }
    format!("\x1b[{}m", params.join(";"))
}

/// SGR code for a 16-color foreground (30–37 normal, 90–97 bright).
const fn ansi16_fg(index: u8) -> u8 {
    if index < 8 {
        30 + index
    } else {
        90 + (index - 8)
    }
}

/// SGR code for a 16-color background (40–47 normal, 100–107 bright).
const fn ansi16_bg(index: u8) -> u8 {
    if index < 8 {
        40 + index
    } else {
        100 + (index - 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn test_no_color_support_emits_no_escapes() {
        let mut canvas = Canvas::new(3, 1);
        canvas.set(0, 0, Cell::new('a', Color::rgb(255, 0, 0), Some(Color::BLACK)));
        let output = serialize(&canvas, ColorSupport::None);
        assert!(!output.contains('\x1b'));
        assert_eq!(output, "a  \n");
    }

    #[test]
    fn test_truecolor_sgr() {
        let mut canvas = Canvas::new(1, 1);
        canvas.set(0, 0, Cell::new('x', Color::rgb(1, 2, 3), None));
        let output = serialize(&canvas, ColorSupport::TrueColor);
        assert!(output.contains("\x1b[38;2;1;2;3m"));
        assert!(output.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn test_ansi256_sgr() {
        let mut canvas = Canvas::new(1, 1);
        canvas.set(0, 0, Cell::new('x', Color::rgb(255, 0, 0), None));
        let output = serialize(&canvas, ColorSupport::Ansi256);
        assert!(output.contains("\x1b[38;5;196m"));
    }

    #[test]
    fn test_run_sharing() {
        // Identically styled adjacent cells share one escape sequence.
        let mut canvas = Canvas::new(3, 1);
        for x in 0..3 {
            canvas.set(x, 0, Cell::new('a', Color::rgb(9, 9, 9), None));
        }
        let output = serialize(&canvas, ColorSupport::TrueColor);
        assert_eq!(output.matches("38;2;9;9;9").count(), 1);
    }
}
