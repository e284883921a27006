//! Box model geometry in character cells.
//!
//! [CSS 2 § 8 Box model](https://www.w3.org/TR/CSS2/box.html)
//!
//! "Each box has a content area... and optional surrounding padding,
//! border, and margin areas."

use serde::Serialize;

/// A rectangle on the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    /// Leftmost column.
    pub x: i32,
    /// Topmost row.
    pub y: i32,
    /// Width in columns; never negative after layout.
    pub width: i32,
    /// Height in rows; never negative after layout.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottommost row.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Grow the rectangle outward by the given edges.
    #[must_use]
    pub const fn expanded_by(&self, edges: Edges) -> Self {
        Self {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.left + edges.right,
            height: self.height + edges.top + edges.bottom,
        }
    }
}

/// Per-edge cell counts (margins, padding, borders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Edges {
    /// Top edge rows.
    pub top: i32,
    /// Right edge columns.
    pub right: i32,
    /// Bottom edge rows.
    pub bottom: i32,
    /// Left edge columns.
    pub left: i32,
}

impl Edges {
    /// Combined left and right size.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Combined top and bottom size.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// [CSS 2 § 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
///
/// A box's content rectangle plus its padding, border, and margin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoxDimensions {
    /// Content area position and size.
    pub content: Rect,
    /// Padding edges.
    pub padding: Edges,
    /// Border edges (always zero in this engine; borders are painted as
    /// ornaments, not boxes).
    pub border: Edges,
    /// Margin edges.
    pub margin: Edges,
}

impl BoxDimensions {
    /// The padding box: content expanded by padding.
    #[must_use]
    pub const fn padding_box(&self) -> Rect {
        self.content.expanded_by(self.padding)
    }

    /// The border box: padding box expanded by borders.
    #[must_use]
    pub const fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(self.border)
    }

    /// The margin box: border box expanded by margins. Its height is the
    /// box's contribution to vertical stacking.
    #[must_use]
    pub const fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(self.margin)
    }
}
