//! Cell-grid layout engine.
//!
//! [CSS Display Level 3](https://www.w3.org/TR/css-display-3/) /
//! [CSS 2 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Builds a box tree from the styled DOM and computes positions and sizes
//! in integer character cells: block stacking, inline line breaking, and
//! flexbox.

/// Block layout and margin collapsing.
pub mod block;
/// Box model geometry (rects and edges in cells).
pub mod box_model;
/// Flexbox layout.
pub mod flex;
/// Inline layout and line breaking.
pub mod inline;
/// Box tree construction and dispatch.
pub mod layout_box;
/// Length resolution onto the cell grid.
pub mod values;

pub use block::collapse_margins;
pub use box_model::{BoxDimensions, Edges, Rect};
pub use layout_box::{build_box_tree, layout_document, BoxType, LayoutBox};
