//! Block layout.
//!
//! [CSS 2 § 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
//!
//! "The following constraints must hold among the used values of the
//! other properties: 'margin-left' + ... 'width' + ... 'margin-right' =
//! width of containing block."

use crate::style::{BoxSizing, EDGE_BOTTOM, EDGE_LEFT, EDGE_RIGHT, EDGE_TOP};

use super::box_model::{Edges, Rect};
use super::layout_box::LayoutBox;
use super::values::{resolve_height, resolve_width};
use super::inline;

/// Lay out a block-level box: resolve width, position, recurse into
/// children, then derive height.
pub fn layout_block(b: &mut LayoutBox, containing: Rect, forced_width: Option<i32>) {
    compute_block_width(b, containing, forced_width);
    compute_block_position(b, containing);
    layout_block_children(b);
}

/// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// Resolve the content width and horizontal margins.
pub fn compute_block_width(b: &mut LayoutBox, containing: Rect, forced_width: Option<i32>) {
    let available = containing.width.max(0);
    let padding = b.resolve_padding(available);

    let margin_left = resolve_width(b.style.margin[EDGE_LEFT], available);
    let margin_right = resolve_width(b.style.margin[EDGE_RIGHT], available);
    let margin_top = resolve_height(b.style.margin[EDGE_TOP], available).unwrap_or(0);
    let margin_bottom = resolve_height(b.style.margin[EDGE_BOTTOM], available).unwrap_or(0);

    let specified = forced_width.or_else(|| {
        resolve_width(b.style.width, available).map(|w| {
            // [CSS Sizing § 3 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
            //
            // border-box widths include padding; convert to a content
            // width. (Borders occupy no cells here.)
            if b.style.box_sizing == BoxSizing::BorderBox {
                w - padding.horizontal()
            } else {
                w
            }
        })
    });

    let mut content_width = specified.unwrap_or_else(|| {
        available - margin_left.unwrap_or(0) - margin_right.unwrap_or(0) - padding.horizontal()
    });

    // Clamp by min-width/max-width.
    if let Some(max) = resolve_width(b.style.max_width, available) {
        if !b.style.max_width.is_auto() {
            content_width = content_width.min(max);
        }
    }
    if let Some(min) = resolve_width(b.style.min_width, available) {
        if !b.style.min_width.is_auto() {
            content_width = content_width.max(min);
        }
    }
    content_width = content_width.max(0);

    // [§ 10.3.3] "If both 'margin-left' and 'margin-right' are 'auto',
    // their used values are equal", centering the box. One auto margin
    // absorbs all remaining space.
    let remaining = available - content_width - padding.horizontal();
    let (used_left, used_right) = match (margin_left, margin_right) {
        (Some(l), Some(r)) => (l, r),
        (None, None) if specified.is_some() => {
            let half = (remaining / 2).max(0);
            (half, (remaining - half).max(0))
        }
        (None, Some(r)) if specified.is_some() => ((remaining - r).max(0), r),
        (Some(l), None) if specified.is_some() => (l, (remaining - l).max(0)),
        // Auto margins without an explicit width resolve to zero.
        (l, r) => (l.unwrap_or(0), r.unwrap_or(0)),
    };

    b.dimensions.content.width = content_width;
    b.dimensions.padding = padding;
    b.dimensions.border = Edges::default();
    b.dimensions.margin = Edges {
        top: margin_top,
        right: used_right,
        bottom: margin_bottom,
        left: used_left,
    };
}

/// Position the content rect inside the containing rect (which the parent
/// has already advanced to this box's slot).
pub(super) fn compute_block_position(b: &mut LayoutBox, containing: Rect) {
    let d = &mut b.dimensions;
    d.content.x = containing.x + d.margin.left + d.padding.left;
    d.content.y = containing.y + d.margin.top + d.padding.top;
}

/// Recurse into children and set the content height.
fn layout_block_children(b: &mut LayoutBox) {
    if b.children.is_empty() {
        // Replaced boxes carry their intrinsic height; other empty boxes
        // are zero-height. (The width pass already clamped the intrinsic
        // width to the available space.)
        b.dimensions.content.height = b.intrinsic.map_or(0, |(_, h)| h);
        return;
    }

    if b.children.iter().all(LayoutBox::is_inline_level) {
        // A block container whose children are all inline-level
        // establishes an inline formatting context.
        inline::layout_inline_formatting(b);
        return;
    }

    // [CSS 2 § 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    //
    // "In a block formatting context, boxes are laid out one after the
    // other, vertically." Child top = parent content top + sum of
    // preceding children's margin-box heights (no margin collapsing in
    // the stacking pass).
    let content = b.dimensions.content;
    let mut cursor_y = content.y;
    for child in &mut b.children {
        child.layout(Rect::new(content.x, cursor_y, content.width, 0));
        cursor_y += child.dimensions.margin_box().height;
    }
    b.dimensions.content.height = (cursor_y - content.y).max(0);
}

/// [CSS 2 § 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths... If there are no positive
/// margins, the maximum of the absolute values... is deducted."
///
/// Adjacent vertical margins collapse to `max(a, b)` when both are
/// non-negative, `min(a, b)` when both are negative, and `a + b`
/// otherwise.
#[must_use]
pub const fn collapse_margins(a: i32, b: i32) -> i32 {
    if a >= 0 && b >= 0 {
        if a > b { a } else { b }
    } else if a < 0 && b < 0 {
        if a < b { a } else { b }
    } else {
        a + b
    }
}

#[cfg(test)]
mod tests {
    use super::collapse_margins;

    #[test]
    fn test_collapse_both_positive() {
        assert_eq!(collapse_margins(2, 3), 3);
        assert_eq!(collapse_margins(5, 5), 5);
        assert_eq!(collapse_margins(0, 0), 0);
    }

    #[test]
    fn test_collapse_both_negative() {
        assert_eq!(collapse_margins(-2, -5), -5);
    }

    #[test]
    fn test_collapse_mixed_signs() {
        assert_eq!(collapse_margins(4, -1), 3);
        assert_eq!(collapse_margins(-3, 2), -1);
    }
}
