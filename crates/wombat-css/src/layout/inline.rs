//! Inline layout and line breaking.
//!
//! [CSS 2 § 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! Nested inline content is flattened to a sequence of word boxes and
//! atomic inlines, packed greedily into lines of the containing width,
//! then aligned per `text-align`. On the cell grid a word is measured by
//! its character count and a text line is one row tall.

use crate::style::{ComputedStyle, TextAlign, WhiteSpace};

use super::box_model::Rect;
use super::layout_box::{BoxType, LayoutBox};

/// A flattened inline item awaiting line packing.
enum InlineItem {
    /// One unbreakable word (or a preserved pre segment).
    Word {
        text: String,
        style: ComputedStyle,
        node: Option<wombat_dom::NodeId>,
        /// Forces a line break before this item (`white-space: pre`).
        hard_break: bool,
    },
    /// An atomic inline, pre-laid at the origin and translated into
    /// place once its line and offset are known.
    Atom(Box<LayoutBox>),
}

impl InlineItem {
    fn width(&self) -> i32 {
        match self {
            Self::Word { text, .. } => text.chars().count() as i32,
            Self::Atom(b) => b.dimensions.margin_box().width,
        }
    }

    fn height(&self) -> i32 {
        match self {
            Self::Word { .. } => 1,
            Self::Atom(b) => b.dimensions.margin_box().height.max(1),
        }
    }

    const fn hard_break(&self) -> bool {
        matches!(self, Self::Word { hard_break: true, .. })
    }
}

/// An item placed on a line at a container-relative x offset.
struct Placed {
    item: InlineItem,
    rel_x: i32,
}

/// Lay out the inline-level children of `container` as lines.
///
/// The container's content width and position must already be resolved;
/// its children are replaced by positioned word boxes and atoms, and its
/// content height becomes the sum of line heights.
pub fn layout_inline_formatting(container: &mut LayoutBox) {
    let content = container.dimensions.content;
    let width = content.width.max(0);

    // Flatten nested inlines into words and atoms.
    let children = std::mem::take(&mut container.children);
    let mut items: Vec<InlineItem> = Vec::new();
    for child in children {
        flatten_inline(child, width, &mut items);
    }

    if items.is_empty() {
        container.dimensions.content.height = 0;
        return;
    }

    // Greedy line packing: break before an item that would overflow a
    // non-empty line. A zero-width container degenerates to one item per
    // line rather than looping.
    let mut lines: Vec<Vec<Placed>> = vec![Vec::new()];
    let mut cursor = 0i32;
    for item in items {
        let item_width = item.width();
        let current_empty = lines.last().is_some_and(Vec::is_empty);
        // "Words are separated by a single-cell space except after a
        // literal newline."
        let space = i32::from(!current_empty);
        let overflows = cursor + space + item_width > width && !current_empty;
        if item.hard_break() || overflows {
            lines.push(Vec::new());
            cursor = 0;
        }
        let line = lines.last_mut().expect("line list is never empty");
        let rel_x = if line.is_empty() { 0 } else { cursor + 1 };
        cursor = rel_x + item_width;
        line.push(Placed { item, rel_x });
    }

    // Position the lines: per-line height, then `text-align` offsets.
    let mut new_children: Vec<LayoutBox> = Vec::new();
    let mut y = content.y;
    let mut total_height = 0i32;
    for (line_index, line) in lines.into_iter().enumerate() {
        let line_width = line
            .last()
            .map_or(0, |placed| placed.rel_x + placed.item.width());
        let line_height = line.iter().map(|p| p.item.height()).max().unwrap_or(1);

        // [CSS Text § 6.1](https://www.w3.org/TR/css-text-3/#text-align-property)
        // `justify` falls back to left.
        let offset = match container.style.text_align {
            TextAlign::Center => ((width - line_width) / 2).max(0),
            TextAlign::Right => (width - line_width).max(0),
            TextAlign::Left | TextAlign::Justify => 0,
        };

        for placed in line {
            let x = content.x + offset + placed.rel_x;
            match placed.item {
                InlineItem::Word {
                    text, style, node, ..
                } => {
                    let mut word = LayoutBox::new(BoxType::Text);
                    word.dimensions.content =
                        Rect::new(x, y, text.chars().count() as i32, 1);
                    word.text = Some(text);
                    word.style = style;
                    word.node = node;
                    word.line = line_index;
                    new_children.push(word);
                }
                InlineItem::Atom(mut atom) => {
                    // The atom was pre-laid against an origin containing
                    // rect; shifting by (x, y) puts its margin box at the
                    // packed position.
                    atom.translate(x, y);
                    atom.line = line_index;
                    new_children.push(*atom);
                }
            }
        }

        y += line_height;
        total_height += line_height;
    }

    container.children = new_children;
    container.dimensions.content.height = total_height;
}

/// Flatten one inline-level box into words and atoms.
///
/// Inline containers merge their style down onto descendant text: bold
/// and italic accumulate, color and decoration pass to children whose own
/// value is the default.
fn flatten_inline(b: LayoutBox, avail_width: i32, out: &mut Vec<InlineItem>) {
    match b.box_type {
        BoxType::Text => {
            let Some(text) = b.text else { return };
            if b.style.white_space == WhiteSpace::Pre {
                // Preserve segments between literal newlines; each
                // segment after the first starts its own line.
                for (i, segment) in text.split('\n').enumerate() {
                    out.push(InlineItem::Word {
                        text: segment.to_string(),
                        style: b.style.clone(),
                        node: b.node,
                        hard_break: i > 0,
                    });
                }
            } else {
                for word in text.split_whitespace() {
                    out.push(InlineItem::Word {
                        text: word.to_string(),
                        style: b.style.clone(),
                        node: b.node,
                        hard_break: false,
                    });
                }
            }
        }
        BoxType::Inline => {
            let parent_style = b.style;
            for mut child in b.children {
                merge_inline_style(&parent_style, &mut child.style);
                flatten_inline(child, avail_width, out);
            }
        }
        BoxType::InlineBlock => {
            let mut atom = b;
            // Pre-lay the atom at the origin so its size is known for
            // packing; replaced atoms size from their intrinsic cells.
            let atom_width = atom
                .intrinsic
                .map_or_else(|| atom.measure_intrinsic_width(), |(w, _)| w)
                .min(avail_width.max(1));
            atom.layout_forced(Rect::new(0, 0, atom_width, 0), Some(atom_width));
            out.push(InlineItem::Atom(Box::new(atom)));
        }
        // Block boxes cannot appear in an inline run (anonymous wrapping
        // keeps them out); skip defensively.
        BoxType::Block | BoxType::Anonymous => {}
    }
}

/// Merge an inline parent's style into a child's for flattening.
fn merge_inline_style(parent: &ComputedStyle, child: &mut ComputedStyle) {
    use crate::style::{FontStyle, FontWeight, TextDecoration};
    if parent.font_weight == FontWeight::Bold {
        child.font_weight = FontWeight::Bold;
    }
    if parent.font_style == FontStyle::Italic {
        child.font_style = FontStyle::Italic;
    }
    if child.color.is_none() {
        child.color = parent.color;
    }
    if child.text_decoration == TextDecoration::None {
        child.text_decoration = parent.text_decoration;
    }
    if child.background_color.is_none() {
        child.background_color = parent.background_color;
    }
}
