//! The renderer: positioned box tree → character canvas.
//!
//! Iterates the laid-out boxes, clipping against the viewport: text boxes
//! write their characters, special tags draw ornaments (`hr` rules,
//! `blockquote` bars, box-drawn form controls), images blit through the
//! terminal image pipeline from the cache, and the focused element gets
//! its focus decorations.

use wombat_css::style::{CssColor, FontStyle, FontWeight, TextDecoration};
use wombat_css::{BoxType, LayoutBox};
use wombat_dom::{DomTree, NodeId};
use wombat_term::image::{render_image, BlitMode, Dithering, ImageRenderOptions};
use wombat_term::{Canvas, CellAttrs, Color, ColorSupport};

use crate::image_loader::ImageCache;

/// Default foreground for unstyled text.
const DEFAULT_FG: Color = Color::rgb(229, 229, 229);
/// Border color for unfocused form controls.
const CONTROL_BORDER: Color = Color::rgb(128, 128, 128);
/// Border color for the focused control.
const CONTROL_BORDER_FOCUSED: Color = Color::rgb(95, 175, 255);
/// Ornament color for rules and quote bars.
const ORNAMENT: Color = Color::rgb(110, 110, 110);

/// Everything a render pass needs besides the box tree.
pub struct RenderContext<'a> {
    /// The DOM (for attributes: input values, image sources, alt text).
    pub tree: &'a DomTree,
    /// Decoded images by resolved URL.
    pub cache: &'a ImageCache,
    /// Base URL for resolving image `src` attributes.
    pub base_url: &'a str,
    /// The focused element, if any.
    pub focus: Option<NodeId>,
    /// Terminal color capability (drives image quantization).
    pub color_support: ColorSupport,
    /// Image blit mode.
    pub blit_mode: BlitMode,
    /// Image dithering strategy.
    pub dithering: Dithering,
}

/// Render the box tree into a canvas of the given size at a scroll
/// offset. Two renders of identical inputs produce identical canvases.
#[must_use]
pub fn render(
    layout: &LayoutBox,
    ctx: &RenderContext<'_>,
    cols: usize,
    rows: usize,
    scroll_y: i32,
) -> Canvas {
    let mut canvas = Canvas::new(cols, rows);
    paint_box(layout, ctx, &mut canvas, scroll_y);
    if let Some(focused) = ctx.focus {
        paint_focus_brackets(layout, ctx, &mut canvas, scroll_y, focused);
    }
    canvas
}

fn paint_box(b: &LayoutBox, ctx: &RenderContext<'_>, canvas: &mut Canvas, scroll_y: i32) {
    let content = b.dimensions.content;
    let padding_box = b.dimensions.padding_box();

    // Clip: skip subtrees entirely above or below the viewport.
    let top = padding_box.y - scroll_y;
    let bottom = padding_box.bottom() - scroll_y;
    if bottom < 0 || top > canvas.height() as i32 {
        return;
    }

    // Background fill over the padding box.
    if let Some(bg) = b.style.background_color {
        canvas.fill_bg(
            padding_box.x,
            padding_box.y - scroll_y,
            padding_box.width,
            padding_box.height,
            css_color(bg),
        );
    }

    match b.box_type {
        BoxType::Text => {
            paint_text(b, canvas, scroll_y);
            return;
        }
        BoxType::Block | BoxType::InlineBlock | BoxType::Inline | BoxType::Anonymous => {}
    }

    if let Some(marker) = &b.list_marker {
        let x = content.x - marker.chars().count() as i32 - 1;
        canvas.write_str(x, content.y - scroll_y, marker, ORNAMENT, CellAttrs::default());
    }

    match b.tag.as_deref() {
        Some("hr") => {
            // A horizontal rule fills its content line.
            let line = "─".repeat(content.width.max(0) as usize);
            canvas.write_str(content.x, content.y - scroll_y, &line, ORNAMENT, CellAttrs::default());
        }
        Some("blockquote") => {
            // Left bar along the padding box.
            for row in padding_box.y..padding_box.bottom() {
                canvas.put_char(padding_box.x, row - scroll_y, '│', ORNAMENT, CellAttrs::default());
            }
        }
        Some("img") => {
            paint_image(b, ctx, canvas, scroll_y);
            return;
        }
        Some("input" | "button" | "select" | "textarea") => {
            paint_control(b, ctx, canvas, scroll_y);
            return;
        }
        _ => {}
    }

    for child in &b.children {
        paint_box(child, ctx, canvas, scroll_y);
    }
}

fn paint_text(b: &LayoutBox, canvas: &mut Canvas, scroll_y: i32) {
    let Some(text) = &b.text else { return };
    let content = b.dimensions.content;
    let fg = b.style.color.map_or(DEFAULT_FG, css_color);
    let attrs = CellAttrs {
        bold: b.style.font_weight == FontWeight::Bold,
        italic: b.style.font_style == FontStyle::Italic,
        underline: b.style.text_decoration == TextDecoration::Underline,
        // No strikethrough attribute on the cell grid; reverse video
        // stands in.
        reverse: b.style.text_decoration == TextDecoration::LineThrough,
    };
    if let Some(bg) = b.style.background_color {
        canvas.fill_bg(content.x, content.y - scroll_y, content.width, 1, css_color(bg));
    }
    canvas.write_str(content.x, content.y - scroll_y, text, fg, attrs);
}

fn paint_image(b: &LayoutBox, ctx: &RenderContext<'_>, canvas: &mut Canvas, scroll_y: i32) {
    let content = b.dimensions.content;
    let node = b.node;
    let src = node
        .and_then(|id| ctx.tree.as_element(id))
        .and_then(|e| e.attr("src"))
        .map(|src| wombat_common::url::resolve(src, ctx.base_url));

    let cached = src.as_deref().and_then(|url| ctx.cache.get(url));
    match cached {
        Some(buffer) => {
            let opts = ImageRenderOptions {
                target_width: Some(content.width.max(1) as u32),
                target_height: Some(content.height.max(1) as u32),
                blit_mode: ctx.blit_mode,
                dithering: ctx.dithering,
                color_support: ctx.color_support,
                ..ImageRenderOptions::default()
            };
            let cells = render_image(&buffer, &opts);
            for (dy, row) in cells.rows().enumerate() {
                for (dx, cell) in row.iter().enumerate() {
                    let x = content.x + dx as i32;
                    let y = content.y + dy as i32 - scroll_y;
                    if x >= 0 && y >= 0 {
                        canvas.set(x as usize, y as usize, *cell);
                    }
                }
            }
        }
        None => {
            // Unavailable image: the [alt] placeholder.
            let alt = node
                .and_then(|id| ctx.tree.as_element(id))
                .and_then(|e| e.attr("alt"))
                .unwrap_or("image");
            let label: String = format!("[{alt}]")
                .chars()
                .take(content.width.max(0) as usize)
                .collect();
            canvas.write_str(content.x, content.y - scroll_y, &label, ORNAMENT, CellAttrs::default());
        }
    }
}

/// Box-drawn frames for form controls, with a distinct border color when
/// focused and a block cursor inside the focused text input.
fn paint_control(b: &LayoutBox, ctx: &RenderContext<'_>, canvas: &mut Canvas, scroll_y: i32) {
    let content = b.dimensions.content;
    let node = b.node;
    let focused = node.is_some() && node == ctx.focus;
    let border = if focused {
        CONTROL_BORDER_FOCUSED
    } else {
        CONTROL_BORDER
    };
    let attr = |name: &str| -> Option<&str> {
        node.and_then(|id| ctx.tree.as_element(id))
            .and_then(|e| e.attr(name))
    };
    let tag = b.tag.as_deref().unwrap_or("");
    let input_type = attr("type").unwrap_or("text").to_ascii_lowercase();

    // Single-cell controls: checkbox and radio.
    if tag == "input" && (input_type == "checkbox" || input_type == "radio") {
        let checked = attr("checked").is_some();
        let glyph = match (input_type.as_str(), checked) {
            ("radio", true) => '◉',
            ("radio", false) => '○',
            (_, true) => '☑',
            (_, false) => '☐',
        };
        canvas.put_char(content.x, content.y - scroll_y, glyph, border, CellAttrs::default());
        return;
    }

    if content.width < 2 || content.height < 2 {
        return;
    }
    draw_frame(canvas, content.x, content.y - scroll_y, content.width, content.height, border);

    // Interior label.
    let interior_width = (content.width - 2).max(0) as usize;
    let label: String = match tag {
        "button" => ctx
            .tree
            .text_content(node.unwrap_or(NodeId::ROOT))
            .trim()
            .to_string(),
        "input" if input_type == "submit" || input_type == "button" => attr("value")
            .unwrap_or("Submit")
            .to_string(),
        "select" => {
            // Show the first option with a dropdown arrow.
            let first_option = node.and_then(|id| {
                ctx.tree
                    .descendants(id)
                    .find(|&c| ctx.tree.as_element(c).is_some_and(|e| e.tag_name == "option"))
            });
            let text = first_option.map_or_else(String::new, |o| {
                ctx.tree.text_content(o).trim().to_string()
            });
            format!("{text} ▾")
        }
        "textarea" => ctx
            .tree
            .text_content(node.unwrap_or(NodeId::ROOT))
            .lines()
            .next()
            .unwrap_or("")
            .to_string(),
        _ => attr("value").unwrap_or("").to_string(),
    };
    let mut shown: String = label.chars().take(interior_width).collect();
    if focused && tag == "input" && shown.chars().count() < interior_width {
        // Block cursor in the active text input.
        shown.push('█');
    }
    canvas.write_str(
        content.x + 1,
        content.y + 1 - scroll_y,
        &shown,
        DEFAULT_FG,
        CellAttrs::default(),
    );
}

fn draw_frame(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: Color) {
    let plain = CellAttrs::default();
    canvas.put_char(x, y, '┌', color, plain);
    canvas.put_char(x + w - 1, y, '┐', color, plain);
    canvas.put_char(x, y + h - 1, '└', color, plain);
    canvas.put_char(x + w - 1, y + h - 1, '┘', color, plain);
    for col in x + 1..x + w - 1 {
        canvas.put_char(col, y, '─', color, plain);
        canvas.put_char(col, y + h - 1, '─', color, plain);
    }
    for row in y + 1..y + h - 1 {
        canvas.put_char(x, row, '│', color, plain);
        canvas.put_char(x + w - 1, row, '│', color, plain);
    }
}

/// `›`/`‹` brackets immediately outside the focused link's content.
fn paint_focus_brackets(
    layout: &LayoutBox,
    ctx: &RenderContext<'_>,
    canvas: &mut Canvas,
    scroll_y: i32,
    focused: NodeId,
) {
    // Only link elements get brackets; controls show their border color.
    if !ctx
        .tree
        .as_element(focused)
        .is_some_and(|e| e.tag_name == "a")
    {
        return;
    }
    let mut bounds: Option<(i32, i32, i32)> = None; // (min_x, max_x, y)
    collect_focus_bounds(layout, ctx.tree, focused, &mut bounds);
    if let Some((min_x, max_x, y)) = bounds {
        canvas.put_char(min_x - 1, y - scroll_y, '›', CONTROL_BORDER_FOCUSED, CellAttrs::default());
        canvas.put_char(max_x, y - scroll_y, '‹', CONTROL_BORDER_FOCUSED, CellAttrs::default());
    }
}

fn collect_focus_bounds(
    b: &LayoutBox,
    tree: &DomTree,
    focused: NodeId,
    bounds: &mut Option<(i32, i32, i32)>,
) {
    if b.box_type == BoxType::Text {
        let belongs = b
            .node
            .is_some_and(|id| id == focused || tree.is_descendant_of(id, focused));
        if belongs {
            let rect = b.dimensions.content;
            let entry = bounds.get_or_insert((rect.x, rect.right(), rect.y));
            if rect.y == entry.2 {
                entry.0 = entry.0.min(rect.x);
                entry.1 = entry.1.max(rect.right());
            }
        }
    }
    for child in &b.children {
        collect_focus_bounds(child, tree, focused, bounds);
    }
}

/// Convert a CSS color to a terminal color.
#[must_use]
pub fn css_color(c: CssColor) -> Color {
    Color::rgb(c.r, c.g, c.b)
}
