//! HTML tokenizer and tree builder for the Wombat terminal browser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, tag, attribute, comment, doctype, and raw-text states
//!   - Named and numeric character references with attribute-value routing
//!   - Coalesced character tokens, bounded work and wall-clock deadline
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Implicit `html`/`head`/`body`, void elements, text merging
//!   - Unmatched end tags ignored; EOF closes unclosed elements
//!   - Fragment parsing for `innerHTML`
//!
//! # Not Implemented
//!
//! - Script-escape and CDATA tokenizer states
//! - Table/template/frameset insertion modes
//! - Foster parenting and the adoption agency algorithm

/// HTML tree construction and fragment parsing.
pub mod parser;
/// HTML serialization (innerHTML/outerHTML).
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{
    import_children, is_void_element, parse_fragment, print_tree, HtmlParser, InsertionMode,
    ParseIssue,
};
pub use serialize::{serialize_children, serialize_node};
pub use tokenizer::{Attribute, HtmlTokenizer, Token, TokenizerState};

use wombat_dom::DomTree;

/// Tokenize and parse an HTML document in one step.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let mut tokenizer = HtmlTokenizer::new(html);
    tokenizer.run();
    HtmlParser::new(tokenizer.into_tokens()).run()
}
