//! CSS engine for the Wombat terminal browser: tokenizer, parser,
//! selector matching, cascade, and cell-grid layout.
//!
//! # Scope
//!
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   — idents, hashes, strings, numbers/percentages/dimensions,
//!   functions, at-keywords, delimiters; comments skipped
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   — rules, declarations, `!important`, error recovery to `;`/`}`,
//!   bounded work
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   — type/id/class/attribute selectors, the four combinators,
//!   structural pseudo-classes, specificity
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   — `(importance, origin, specificity, source order)` with inline
//!   styles above normal rules, inheritance
//! - **Layout** — block stacking, inline line breaking, and flexbox over
//!   integer character cells
//!
//! # Not Implemented
//!
//! - Media queries and other at-rules (skipped with a warning)
//! - `rgb()`/`hsl()` functions (surfaced as opaque keywords)
//! - Floats, positioning, tables (coerced to blocks), grid

/// CSS cascade and style computation.
pub mod cascade;
/// Cell-grid layout engine.
pub mod layout;
/// CSS parser and stylesheet model.
pub mod parser;
/// Selector parsing and matching.
pub mod selector;
/// Computed style representation.
pub mod style;
/// CSS tokenizer.
pub mod tokenizer;
/// Built-in user-agent stylesheet.
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{parse_inline_style, resolve_styles, StyleMap};
pub use layout::{
    build_box_tree, collapse_margins, layout_document, BoxDimensions, BoxType, Edges, LayoutBox,
    Rect,
};
pub use parser::{
    selector_to_css, stylesheet_to_css, CssParser, CssValue, Declaration, Rule, Stylesheet,
};
pub use selector::{parse_selector, Combinator, PseudoClass, Selector, SimpleSelector, Specificity};
pub use style::{ComputedStyle, CssColor, Display, Length};
pub use tokenizer::{CssToken, CssTokenizer};
pub use ua_stylesheet::ua_stylesheet;

use wombat_dom::{DomTree, NodeId, NodeType};

/// [HTML Standard § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract CSS text from all `<style>` elements in the DOM tree, in
/// document order.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    collect_style_content(tree, tree.root(), &mut css);
    css
}

/// Recursively collect CSS text from style elements.
fn collect_style_content(tree: &DomTree, id: NodeId, css: &mut String) {
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(data) if data.tag_name == "style" => {
            for &child_id in tree.children(id) {
                if let Some(text) = tree.as_text(child_id) {
                    css.push_str(text);
                    css.push('\n');
                }
            }
        }
        _ => {
            for &child_id in tree.children(id) {
                collect_style_content(tree, child_id, css);
            }
        }
    }
}

/// Parse a CSS string into a stylesheet (tokenize + parse in one step).
#[must_use]
pub fn parse_stylesheet_str(css: &str) -> Stylesheet {
    let mut tokenizer = CssTokenizer::new(css);
    tokenizer.run();
    let mut parser = CssParser::new(tokenizer.into_tokens());
    parser.parse_stylesheet()
}
