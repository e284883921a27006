//! Flexbox layout on the cell grid.
//!
//! [CSS Flexible Box Layout Module Level 1 § 9](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! A single-pass subset of the flex algorithm: base sizes from
//! `flex-basis` / explicit width / natural content size, optional greedy
//! line wrapping, proportional `flex-grow` distribution with the rounding
//! residue awarded to the last growing item, then `justify-content` and
//! `align-items` placement. Shrinking is not performed (items overflow
//! instead), matching the engine's integer-cell model.

use crate::style::{AlignItems, BoxSizing, JustifyContent, EDGE_LEFT, EDGE_RIGHT};

use super::box_model::Rect;
use super::layout_box::LayoutBox;
use super::values::{resolve_height, resolve_width};
use super::block;

/// Per-item sizing data for one flex pass.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
struct FlexItem {
    /// Index into the container's children.
    index: usize,
    /// Flex base size (content box, main axis).
    base: i32,
    /// Main-axis margins + padding around the content box.
    outer: i32,
    /// flex-grow factor.
    grow: f32,
    /// Resolved target main size after growth.
    target: i32,
}

/// Lay out a flex container.
///
/// [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
pub fn layout_flex(container: &mut LayoutBox, containing: Rect, forced_width: Option<i32>) {
    // The container's own width resolves like any block box.
    block::compute_block_width(container, containing, forced_width);
    block::compute_block_position(container, containing);

    // "row-reverse and column-reverse lay out items in reverse order."
    if container.style.flex_direction.is_reverse() {
        container.children.reverse();
    }

    let content = container.dimensions.content;
    let gap_main = resolve_width(container.style.gap, content.width)
        .unwrap_or(0)
        .max(0);
    let gap_cross = resolve_height(container.style.gap, content.width)
        .unwrap_or(0)
        .max(0);

    if container.style.flex_direction.is_row() {
        layout_row(container, gap_main, gap_cross);
    } else {
        // The column main axis is vertical, so the gap resolves in rows.
        layout_column(container, gap_cross);
    }
}

/// Horizontal main axis: size, wrap, grow, justify, align.
fn layout_row(container: &mut LayoutBox, gap: i32, line_gap: i32) {
    let content = container.dimensions.content;
    let avail = content.width.max(0);

    // [§ 9.2 step 3] Determine the flex base size of each item.
    let mut items: Vec<FlexItem> = Vec::with_capacity(container.children.len());
    for (index, child) in container.children.iter().enumerate() {
        let padding = child.resolve_padding(avail);
        let margin_left = resolve_width(child.style.margin[EDGE_LEFT], avail).unwrap_or(0);
        let margin_right = resolve_width(child.style.margin[EDGE_RIGHT], avail).unwrap_or(0);
        let outer = margin_left + margin_right + padding.horizontal();
        let base = flex_base_size(child, avail, padding.horizontal());
        items.push(FlexItem {
            index,
            base,
            outer,
            grow: child.style.flex_grow,
            target: base,
        });
    }

    // [§ 9.3 step 5] Collect flex items into flex lines.
    //
    // "Otherwise, starting from the first uncollected item, collect
    // consecutive items one by one until the first time that the next
    // collected item would not fit."
    let wrap = container.style.flex_wrap != crate::style::FlexWrap::NoWrap;
    let mut lines: Vec<Vec<FlexItem>> = vec![Vec::new()];
    let mut cursor = 0i32;
    for item in items {
        let line_empty = lines.last().is_some_and(Vec::is_empty);
        let needed = item.base + item.outer + if line_empty { 0 } else { gap };
        if wrap && !line_empty && cursor + needed > avail {
            lines.push(Vec::new());
            cursor = item.base + item.outer;
        } else {
            cursor += needed;
        }
        lines
            .last_mut()
            .expect("line list is never empty")
            .push(item);
    }

    let mut y = content.y;
    let mut first_line = true;
    for line in &mut lines {
        if line.is_empty() {
            continue;
        }
        if !first_line {
            y += line_gap;
        }
        first_line = false;

        // [§ 9.7 Resolving Flexible Lengths] Distribute positive free
        // space proportionally to flex-grow; the integer residue goes to
        // the last growing item.
        let gaps_total = gap * (line.len() as i32 - 1);
        let used: i32 = line.iter().map(|i| i.base + i.outer).sum::<i32>() + gaps_total;
        let mut free = (avail - used).max(0);
        let total_grow: f32 = line.iter().map(|i| i.grow).sum();
        if free > 0 && total_grow > 0.0 {
            let mut distributed = 0i32;
            let last_grower = line.iter().rposition(|i| i.grow > 0.0);
            for (pos, item) in line.iter_mut().enumerate() {
                if item.grow <= 0.0 {
                    continue;
                }
                let mut extra = ((free as f32) * item.grow / total_grow).floor() as i32;
                if Some(pos) == last_grower {
                    extra = free - distributed;
                }
                distributed += extra;
                item.target = item.base + extra;
            }
            free = 0;
        }

        // [§ 8.2 justify-content] Main-axis alignment of the line.
        let (initial, between) = justify_offsets(container.style.justify_content, free, line.len());

        // Lay out each item once with its resolved main size.
        let mut x = content.x + initial;
        let mut line_height = 0i32;
        for item in line.iter() {
            let child = &mut container.children[item.index];
            child.layout_forced(Rect::new(x, y, item.target, 0), Some(item.target));
            let margin_box = child.dimensions.margin_box();
            x += margin_box.width + gap + between;
            line_height = line_height.max(margin_box.height);
        }

        // [§ 8.3 align-items] Cross-axis alignment within the line.
        // baseline and stretch are treated as flex-start.
        for item in line.iter() {
            let child = &mut container.children[item.index];
            let child_height = child.dimensions.margin_box().height;
            let dy = match container.style.align_items {
                AlignItems::FlexEnd => (line_height - child_height).max(0),
                AlignItems::Center => ((line_height - child_height) / 2).max(0),
                AlignItems::FlexStart | AlignItems::Baseline | AlignItems::Stretch => 0,
            };
            if dy != 0 {
                child.translate(0, dy);
            }
        }

        y += line_height;
    }

    // [§ 9.9 Cross Size Determination] Container cross size: sum of line
    // cross sizes plus gaps, independent of justify-content spacing.
    container.dimensions.content.height = (y - content.y).max(0);
}

/// Vertical main axis: children stack with gaps; the main size is the
/// content's natural height, so there is no free space to grow into.
fn layout_column(container: &mut LayoutBox, gap: i32) {
    let content = container.dimensions.content;
    let mut y = content.y;
    let mut first = true;
    let align = container.style.align_items;
    for child in &mut container.children {
        if !first {
            y += gap;
        }
        first = false;
        child.layout(Rect::new(content.x, y, content.width, 0));
        let margin_box = child.dimensions.margin_box();
        let dx = match align {
            AlignItems::FlexEnd => (content.width - margin_box.width).max(0),
            AlignItems::Center => ((content.width - margin_box.width) / 2).max(0),
            AlignItems::FlexStart | AlignItems::Baseline | AlignItems::Stretch => 0,
        };
        if dx != 0 {
            child.translate(dx, 0);
        }
        y += margin_box.height;
    }
    container.dimensions.content.height = (y - content.y).max(0);
}

/// [§ 9.2 step 3] Flex base size: `flex-basis` if definite, else the
/// explicit main-axis length, else the natural content size.
fn flex_base_size(child: &LayoutBox, avail: i32, padding_h: i32) -> i32 {
    let from_style = resolve_width(child.style.flex_basis, avail)
        .or_else(|| resolve_width(child.style.width, avail));
    match from_style {
        Some(mut size) => {
            if child.style.box_sizing == BoxSizing::BorderBox {
                size -= padding_h;
            }
            size.max(0)
        }
        None => (child.measure_intrinsic_width() - padding_h).max(0),
    }
}

/// [§ 8.2 Axis Alignment: justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(initial_offset, extra_gap_between_items)`.
fn justify_offsets(justify: JustifyContent, free: i32, count: usize) -> (i32, i32) {
    if count == 0 || free <= 0 {
        return (0, 0);
    }
    let n = count as i32;
    match justify {
        JustifyContent::FlexStart => (0, 0),
        // "Flex items are packed toward the end of the line."
        JustifyContent::FlexEnd => (free, 0),
        // "Flex items are packed toward the center of the line."
        JustifyContent::Center => (free / 2, 0),
        // "evenly distributed in the line... first item flush with the
        // main-start edge"
        JustifyContent::SpaceBetween => {
            if n <= 1 {
                (0, 0)
            } else {
                (0, free / (n - 1))
            }
        }
        // "...with half-size spaces on either end"
        JustifyContent::SpaceAround => {
            let per = free / n;
            (per / 2, per)
        }
        // "...with equal-size spaces around every item"
        JustifyContent::SpaceEvenly => {
            let per = free / (n + 1);
            (per, per)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::justify_offsets;
    use crate::style::JustifyContent;

    #[test]
    fn test_justify_start_end_center() {
        assert_eq!(justify_offsets(JustifyContent::FlexStart, 10, 2), (0, 0));
        assert_eq!(justify_offsets(JustifyContent::FlexEnd, 10, 2), (10, 0));
        assert_eq!(justify_offsets(JustifyContent::Center, 10, 2), (5, 0));
    }

    #[test]
    fn test_justify_distributed() {
        assert_eq!(justify_offsets(JustifyContent::SpaceBetween, 10, 3), (0, 5));
        assert_eq!(justify_offsets(JustifyContent::SpaceAround, 12, 3), (2, 4));
        assert_eq!(justify_offsets(JustifyContent::SpaceEvenly, 12, 3), (3, 3));
    }

    #[test]
    fn test_justify_no_free_space() {
        assert_eq!(justify_offsets(JustifyContent::Center, 0, 2), (0, 0));
        assert_eq!(justify_offsets(JustifyContent::SpaceBetween, -4, 2), (0, 0));
    }
}
