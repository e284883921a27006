//! Layout box tree: construction, dispatch, and measurement.
//!
//! [CSS Display Module Level 3 § 1](https://www.w3.org/TR/css-display-3/#intro)
//!
//! "Each element and text run in the document tree can generate zero or
//! more boxes... This box tree then is used as the basis for layout."
//!
//! The box tree is built from the styled DOM, then laid out recursively
//! given an available width in columns.

use serde::Serialize;

use wombat_dom::{DomTree, NodeId, NodeType};

use crate::cascade::StyleMap;
use crate::style::{ComputedStyle, Display, ListStyleType, WhiteSpace};

use super::box_model::{BoxDimensions, Rect};
use super::values::{px_to_cols, px_to_rows};
use super::{block, flex};

/// The kind of box a node generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoxType {
    /// Block-level container.
    Block,
    /// Inline-level container (participates in line layout).
    Inline,
    /// Atomic inline (form controls, images, `display: inline-block`).
    InlineBlock,
    /// [§ 2.1 Anonymous boxes](https://www.w3.org/TR/css-display-3/#anonymous)
    /// "An anonymous box is a box that is not associated with any
    /// element." Wraps a run of inline siblings inside a block parent.
    Anonymous,
    /// A text run (one word after line breaking).
    Text,
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// What kind of box this is.
    pub box_type: BoxType,
    /// The originating DOM node (`None` for anonymous boxes; for text
    /// boxes, the parent element so the renderer can resolve focus and
    /// links).
    pub node: Option<NodeId>,
    /// Originating element's tag name (renderer ornaments key off this).
    pub tag: Option<String>,
    /// Computed style carried from the style map.
    pub style: ComputedStyle,
    /// Position and edge sizes, filled in by layout.
    pub dimensions: BoxDimensions,
    /// Text content for `Text` boxes.
    pub text: Option<String>,
    /// Child boxes in document order.
    pub children: Vec<LayoutBox>,
    /// Line index within the inline container (text and atoms).
    pub line: usize,
    /// List marker (`•` or `3.`) for list items.
    pub list_marker: Option<String>,
    /// Intrinsic cell size for replaced elements (controls, images).
    pub intrinsic: Option<(i32, i32)>,
}

impl LayoutBox {
    /// Create an empty box of the given type with default style.
    #[must_use]
    pub fn new(box_type: BoxType) -> Self {
        Self {
            box_type,
            node: None,
            tag: None,
            style: ComputedStyle::default(),
            dimensions: BoxDimensions::default(),
            text: None,
            children: Vec::new(),
            line: 0,
            list_marker: None,
            intrinsic: None,
        }
    }

    /// Whether this box participates in inline layout.
    #[must_use]
    pub const fn is_inline_level(&self) -> bool {
        matches!(
            self.box_type,
            BoxType::Inline | BoxType::InlineBlock | BoxType::Text
        )
    }

    /// Lay the box out within the given containing rect.
    pub fn layout(&mut self, containing: Rect) {
        self.layout_forced(containing, None);
    }

    /// Lay out with an optional forced content width (used by flex, which
    /// overrides item main sizes after resolving flexible lengths).
    pub fn layout_forced(&mut self, containing: Rect, forced_width: Option<i32>) {
        if self.style.display.is_flex() {
            flex::layout_flex(self, containing, forced_width);
        } else {
            block::layout_block(self, containing, forced_width);
        }
    }

    /// Shift this box and its subtree by the given cell offsets.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.dimensions.content.x += dx;
        self.dimensions.content.y += dy;
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// Natural (max-content) width in columns, used for flex base sizes
    /// and atomic-inline measurement.
    #[must_use]
    pub fn measure_intrinsic_width(&self) -> i32 {
        if let Some((w, _)) = self.intrinsic {
            return w;
        }
        if let Some(text) = &self.text {
            return text.chars().count() as i32;
        }
        // An explicit non-percentage width wins.
        if let Some(w) = super::values::resolve_width(self.style.width, 0) {
            if !matches!(self.style.width, crate::style::Length::Percent(_)) {
                return w;
            }
        }
        let padding = self.resolve_padding(0);
        let inner = if self.children.iter().all(Self::is_inline_level) {
            // A single hypothetical line: children side by side with
            // single-cell spaces.
            let sum: i32 = self
                .children
                .iter()
                .map(Self::measure_intrinsic_width)
                .sum();
            let gaps = self.children.len().saturating_sub(1) as i32;
            sum + gaps
        } else {
            self.children
                .iter()
                .map(Self::measure_intrinsic_width)
                .max()
                .unwrap_or(0)
        };
        inner + padding.horizontal()
    }

    /// Resolve this box's padding to cells against a containing width.
    #[must_use]
    pub fn resolve_padding(&self, containing: i32) -> super::box_model::Edges {
        use crate::style::{EDGE_BOTTOM, EDGE_LEFT, EDGE_RIGHT, EDGE_TOP};
        super::box_model::Edges {
            top: super::values::resolve_height(self.style.padding[EDGE_TOP], containing)
                .unwrap_or(0)
                .max(0),
            right: super::values::resolve_width(self.style.padding[EDGE_RIGHT], containing)
                .unwrap_or(0)
                .max(0),
            bottom: super::values::resolve_height(self.style.padding[EDGE_BOTTOM], containing)
                .unwrap_or(0)
                .max(0),
            left: super::values::resolve_width(self.style.padding[EDGE_LEFT], containing)
                .unwrap_or(0)
                .max(0),
        }
    }
}

/// Build the box tree for a whole document and lay it out at the given
/// viewport width. Returns an empty root box for a DOM with no document
/// element.
#[must_use]
pub fn layout_document(tree: &DomTree, styles: &StyleMap, viewport_width: i32) -> LayoutBox {
    let mut root = tree
        .document_element()
        .and_then(|id| build_box_tree(tree, styles, id))
        .unwrap_or_else(|| LayoutBox::new(BoxType::Block));
    if !matches!(root.box_type, BoxType::Block) {
        // The root box is always block-level regardless of styling.
        root.box_type = BoxType::Block;
    }
    root.layout(Rect::new(0, 0, viewport_width.max(0), 0));
    root
}

/// Build a layout box for a DOM node. Returns `None` for `display: none`
/// elements, comments, doctypes, and suppressed whitespace.
#[must_use]
pub fn build_box_tree(tree: &DomTree, styles: &StyleMap, id: NodeId) -> Option<LayoutBox> {
    let node = tree.get(id)?;
    match &node.node_type {
        NodeType::Document => {
            let child = tree.document_element()?;
            build_box_tree(tree, styles, child)
        }
        NodeType::Element(element) => {
            let style = styles.get(&id).cloned().unwrap_or_default();
            build_element_box(tree, styles, id, &element.tag_name, style)
        }
        // Bare text reaching here (outside an element walk) is rare;
        // treated as an inline run with default style.
        NodeType::Text(text) => {
            if text.trim().is_empty() {
                return None;
            }
            let mut b = LayoutBox::new(BoxType::Text);
            b.text = Some(collapse_whitespace(text));
            Some(b)
        }
        NodeType::Comment(_) | NodeType::DocumentType(_) => None,
    }
}

fn build_element_box(
    tree: &DomTree,
    styles: &StyleMap,
    id: NodeId,
    tag: &str,
    mut style: ComputedStyle,
) -> Option<LayoutBox> {
    style.display = coerce_display(tag, style.display);
    if style.display == Display::None {
        return None;
    }

    let box_type = match style.display {
        Display::Block | Display::ListItem | Display::Flex => BoxType::Block,
        Display::InlineBlock | Display::InlineFlex => BoxType::InlineBlock,
        Display::Inline => BoxType::Inline,
        Display::None => return None,
    };

    let mut layout_box = LayoutBox::new(box_type);
    layout_box.node = Some(id);
    layout_box.tag = Some(tag.to_string());
    layout_box.style = style.clone();

    if is_replaced(tag) {
        layout_box.intrinsic = Some(intrinsic_size(tree, id, tag));
        // Replaced elements have no laid-out children.
        return Some(layout_box);
    }

    // Build children, numbering list items for ordered markers.
    let mut list_index = 0usize;
    for &child_id in tree.children(id) {
        let child_node = tree.get(child_id)?;
        match &child_node.node_type {
            NodeType::Text(text) => {
                let preformatted = style.white_space == WhiteSpace::Pre;
                if !preformatted && text.trim().is_empty() {
                    continue;
                }
                let mut text_box = LayoutBox::new(BoxType::Text);
                text_box.node = Some(id);
                text_box.style = style.clone();
                text_box.text = Some(if preformatted {
                    text.clone()
                } else {
                    collapse_whitespace(text)
                });
                layout_box.children.push(text_box);
            }
            NodeType::Element(_) => {
                if let Some(mut child_box) = build_box_tree(tree, styles, child_id) {
                    if child_box.style.display == Display::ListItem {
                        list_index += 1;
                        child_box.list_marker = match child_box.style.list_style {
                            ListStyleType::None => None,
                            ListStyleType::Decimal => Some(format!("{list_index}.")),
                            // Ordered lists number their items even when
                            // the type was left at the initial disc.
                            ListStyleType::Disc if tag == "ol" => {
                                Some(format!("{list_index}."))
                            }
                            ListStyleType::Disc => Some("•".to_string()),
                        };
                    }
                    layout_box.children.push(child_box);
                }
            }
            NodeType::Comment(_) | NodeType::Document | NodeType::DocumentType(_) => {}
        }
    }

    // [§ 2.1 Anonymous boxes](https://www.w3.org/TR/css-display-3/#anonymous)
    //
    // "If a block container box has... both inline-level and block-level
    // boxes, the inline-level boxes are wrapped in anonymous block
    // container boxes."
    if matches!(layout_box.box_type, BoxType::Block | BoxType::InlineBlock) {
        wrap_inline_runs(&mut layout_box);
    }

    Some(layout_box)
}

/// Collapse runs of whitespace to single spaces, trimming nothing (edge
/// spaces still separate words across element boundaries).
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// [CSS 2 § 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// Wrap consecutive inline-level children of a block container in
/// anonymous block boxes when block-level siblings are also present.
fn wrap_inline_runs(container: &mut LayoutBox) {
    let has_block = container
        .children
        .iter()
        .any(|c| !c.is_inline_level());
    let has_inline = container.children.iter().any(LayoutBox::is_inline_level);
    if !has_block || !has_inline {
        return;
    }

    let children = std::mem::take(&mut container.children);
    let mut run: Vec<LayoutBox> = Vec::new();
    for child in children {
        if child.is_inline_level() {
            run.push(child);
        } else {
            flush_inline_run(container, &mut run);
            container.children.push(child);
        }
    }
    flush_inline_run(container, &mut run);
}

fn flush_inline_run(container: &mut LayoutBox, run: &mut Vec<LayoutBox>) {
    if run.is_empty() {
        return;
    }
    let mut anonymous = LayoutBox::new(BoxType::Anonymous);
    // The anonymous box inherits the container's text styling so line
    // alignment still applies inside it.
    anonymous.style = ComputedStyle {
        text_align: container.style.text_align,
        white_space: container.style.white_space,
        ..ComputedStyle::default()
    };
    anonymous.children = std::mem::take(run);
    container.children.push(anonymous);
}

/// Display coercion for special tags.
///
/// Table internals flatten to blocks, form controls and images become
/// atomic inlines. Applied after the cascade so author CSS cannot produce
/// layouts the engine has no algorithm for.
fn coerce_display(tag: &str, display: Display) -> Display {
    match tag {
        "center" | "table" | "thead" | "tbody" | "tfoot" | "caption" | "tr" | "td" | "th" => {
            if display == Display::None {
                Display::None
            } else {
                Display::Block
            }
        }
        "input" | "select" | "button" | "textarea" | "img" => {
            if display == Display::None {
                Display::None
            } else {
                Display::InlineBlock
            }
        }
        _ => display,
    }
}

/// Whether the element is replaced content with an intrinsic cell size.
fn is_replaced(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "button" | "textarea" | "img")
}

/// Intrinsic sizes for form controls and images, in cells.
fn intrinsic_size(tree: &DomTree, id: NodeId, tag: &str) -> (i32, i32) {
    let attr = |name: &str| -> Option<String> {
        tree.as_element(id)
            .and_then(|e| e.attr(name))
            .map(str::to_string)
    };
    let attr_num = |name: &str| -> Option<i32> { attr(name).and_then(|v| v.trim().parse().ok()) };

    match tag {
        "input" => {
            let input_type = attr("type").unwrap_or_default().to_ascii_lowercase();
            match input_type.as_str() {
                "checkbox" | "radio" => (1, 1),
                "submit" | "button" | "reset" => {
                    let label = attr("value").unwrap_or_else(|| "Submit".to_string());
                    ((label.chars().count() as i32 + 4).max(8), 3)
                }
                "hidden" => (0, 0),
                _ => {
                    let size = attr_num("size").unwrap_or(20).max(1);
                    ((size + 2).min(42), 3)
                }
            }
        }
        "button" => {
            let label = tree.text_content(id);
            let label = label.trim();
            ((label.chars().count() as i32 + 4).max(8), 3)
        }
        "select" => (15, 3),
        "textarea" => {
            let cols = attr_num("cols").unwrap_or(40).max(1);
            let rows = attr_num("rows").unwrap_or(4).max(1);
            (cols + 2, rows + 2)
        }
        "img" => {
            let w = attr_num("width").map_or(16, |px| px_to_cols(px as f32));
            let h = attr_num("height").map_or(6, |px| px_to_rows(px as f32));
            (w.clamp(1, 100), h.clamp(1, 50))
        }
        _ => (1, 1),
    }
}
