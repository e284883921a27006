//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! A pragmatic subset of the WHATWG tree builder:
//!
//! - implicit `html`, `head`, and `body` elements when absent
//! - void elements never get children; their end tags are ignored
//! - the self-closing flag is accepted everywhere but only obeyed on voids
//! - consecutive character data merges into one text node
//! - unmatched end tags are ignored; unclosed elements close at EOF
//! - comments attach under the current insertion parent; a doctype only as
//!   a child of Document, before `html`
//!
//! Table modes, templates, foster parenting, and the adoption agency
//! algorithm are deliberately absent.

use strum_macros::Display;

use wombat_common::warning::warn_once;
use wombat_dom::{DoctypeData, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.1.2 Elements — void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified
/// for void elements."
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether a tag names a void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Elements that belong in `<head>`; anything else seen while in head
/// closes it.
const HEAD_ELEMENTS: [&str; 8] = [
    "base", "link", "meta", "title", "style", "script", "noscript", "template",
];

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary
/// operation of the tree construction stage." This builder keeps only the
/// modes needed for the implicit html/head/body structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable issue encountered during tree construction. These are
/// never surfaced as failures; the builder always produces a document.
#[derive(Debug, Clone)]
pub struct ParseIssue {
    /// Description of the issue.
    pub message: String,
    /// Index into the token stream where it was encountered.
    pub token_index: usize,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
pub struct HtmlParser {
    tokens: Vec<Token>,
    tree: DomTree,
    mode: InsertionMode,
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    open_elements: Vec<NodeId>,
    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_pointer: Option<NodeId>,
    html_pointer: Option<NodeId>,
    issues: Vec<ParseIssue>,
    token_index: usize,
}

impl HtmlParser {
    /// Create a parser for a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            tree: DomTree::new(),
            mode: InsertionMode::Initial,
            open_elements: Vec::new(),
            head_pointer: None,
            html_pointer: None,
            issues: Vec::new(),
            token_index: 0,
        }
    }

    /// Run tree construction and return the document.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run tree construction and return the document together with the
    /// recoverable issues encountered.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.iter().enumerate() {
            self.token_index = index;
            self.process(token);
        }
        (self.tree, self.issues)
    }

    fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(ParseIssue {
            message: message.into(),
            token_index: self.token_index,
        });
    }

    /// The current insertion parent.
    fn current_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// Reprocess a token after a mode switch, as the spec's "reprocess the
    /// token" steps do.
    fn process(&mut self, token: &Token) {
        match self.mode {
            InsertionMode::Initial => self.process_initial(token),
            InsertionMode::BeforeHtml => self.process_before_html(token),
            InsertionMode::BeforeHead => self.process_before_head(token),
            InsertionMode::InHead => self.process_in_head(token),
            InsertionMode::AfterHead => self.process_after_head(token),
            InsertionMode::InBody => self.process_in_body(token),
            InsertionMode::AfterBody => self.process_after_body(token),
        }
    }

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn process_initial(&mut self, token: &Token) {
        match token {
            Token::Character(data) if data.trim().is_empty() => {}
            Token::Comment(data) => self.append_comment(NodeId::ROOT, data),
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
            } => {
                // "Append a DocumentType node to the Document node."
                let doctype = self.tree.alloc(NodeType::DocumentType(DoctypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone(),
                    system_id: system_identifier.clone(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype);
                self.mode = InsertionMode::BeforeHtml;
            }
            // Empty input produces the empty-but-well-formed document:
            // nothing is synthesized until actual content arrives.
            Token::EndOfFile => {}
            _ => {
                self.mode = InsertionMode::BeforeHtml;
                self.process(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn process_before_html(&mut self, token: &Token) {
        match token {
            Token::Character(data) if data.trim().is_empty() => {}
            Token::Comment(data) => self.append_comment(NodeId::ROOT, data),
            Token::Doctype { .. } => self.issue("doctype after document start ignored"),
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.insert_element(NodeId::ROOT, name, attributes);
                self.open_elements.push(html);
                self.html_pointer = Some(html);
                self.mode = InsertionMode::BeforeHead;
            }
            Token::EndTag { name }
                if name != "head" && name != "body" && name != "html" && name != "br" =>
            {
                self.issue(format!("unexpected end tag </{name}> before <html>"));
            }
            Token::EndOfFile => {}
            _ => {
                // "Create an html element... Append it to the Document
                // object... then reprocess."
                let html = self.insert_element(NodeId::ROOT, "html", &[]);
                self.open_elements.push(html);
                self.html_pointer = Some(html);
                self.mode = InsertionMode::BeforeHead;
                self.process(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn process_before_head(&mut self, token: &Token) {
        match token {
            Token::Character(data) if data.trim().is_empty() => {}
            Token::Comment(data) => self.append_comment(self.current_node(), data),
            Token::Doctype { .. } => self.issue("stray doctype ignored"),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_element(self.current_node(), name, attributes);
                self.open_elements.push(head);
                self.head_pointer = Some(head);
                self.mode = InsertionMode::InHead;
            }
            _ => {
                let head = self.insert_element(self.current_node(), "head", &[]);
                self.open_elements.push(head);
                self.head_pointer = Some(head);
                self.mode = InsertionMode::InHead;
                self.process(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn process_in_head(&mut self, token: &Token) {
        match token {
            Token::Character(data) => {
                if data.trim().is_empty() {
                    // Whitespace between head elements is dropped; it has
                    // no rendering and keeps <title> extraction clean.
                } else if self.in_raw_text_element() {
                    self.insert_text(self.current_node(), data);
                } else {
                    self.pop_head_and_reprocess(token);
                }
            }
            Token::Comment(data) => self.append_comment(self.current_node(), data),
            Token::Doctype { .. } => self.issue("stray doctype ignored"),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } if HEAD_ELEMENTS.contains(&name.as_str()) => {
                let elem = self.insert_element(self.current_node(), name, attributes);
                if !is_void_element(name) && !*self_closing {
                    self.open_elements.push(elem);
                }
            }
            Token::EndTag { name } if name == "head" => {
                self.pop_until("head");
                self.mode = InsertionMode::AfterHead;
            }
            Token::EndTag { name }
                if HEAD_ELEMENTS.contains(&name.as_str()) =>
            {
                self.pop_until(name);
            }
            Token::EndTag { name } if name == "body" || name == "html" || name == "br" => {
                self.pop_head_and_reprocess(token);
            }
            Token::EndTag { name } => {
                self.issue(format!("unmatched end tag </{name}> in head ignored"));
            }
            // EOF falls through head and after-head so the implicit body
            // still materializes for documents that only had head content.
            Token::EndOfFile => self.pop_head_and_reprocess(token),
            Token::StartTag { .. } => self.pop_head_and_reprocess(token),
        }
    }

    /// Whether the current node is a raw-text head element (`title`,
    /// `style`, `script`) whose character data becomes its text child.
    fn in_raw_text_element(&self) -> bool {
        self.tree
            .as_element(self.current_node())
            .is_some_and(|e| matches!(e.tag_name.as_str(), "title" | "style" | "script"))
    }

    fn pop_head_and_reprocess(&mut self, token: &Token) {
        self.pop_until("head");
        self.mode = InsertionMode::AfterHead;
        self.process(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn process_after_head(&mut self, token: &Token) {
        match token {
            Token::Character(data) if data.trim().is_empty() => {}
            Token::Comment(data) => self.append_comment(self.current_node(), data),
            Token::Doctype { .. } => self.issue("stray doctype ignored"),
            Token::StartTag {
                name, attributes, ..
            } if name == "body" => {
                let body = self.insert_element(self.current_node(), name, attributes);
                self.open_elements.push(body);
                self.mode = InsertionMode::InBody;
            }
            Token::StartTag { name, attributes, self_closing }
                if HEAD_ELEMENTS.contains(&name.as_str()) =>
            {
                // "This is a parse error." Late head elements attach to the
                // existing head.
                self.issue(format!("<{name}> after </head> moved into head"));
                let parent = self.head_pointer.unwrap_or_else(|| self.current_node());
                let elem = self.insert_element(parent, name, attributes);
                if !is_void_element(name) && !*self_closing {
                    // Raw-text content for a late style/script still needs
                    // a parent; push so the text lands inside it.
                    self.open_elements.push(elem);
                }
            }
            _ => {
                let body = self.insert_element(self.current_node(), "body", &[]);
                self.open_elements.push(body);
                self.mode = InsertionMode::InBody;
                self.process(token);
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn process_in_body(&mut self, token: &Token) {
        match token {
            Token::Character(data) => self.insert_text(self.current_node(), data),
            Token::Comment(data) => self.append_comment(self.current_node(), data),
            Token::Doctype { .. } => self.issue("stray doctype ignored"),
            Token::StartTag { name, .. } if name == "html" || name == "body" => {
                self.issue(format!("duplicate <{name}> ignored"));
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                // "If the stack of open elements has a p element in button
                // scope, then close a p element." Applied to the nesting
                // pairs that real documents rely on.
                if implies_end_of_same(name) && self.has_open_element(name) {
                    self.pop_until(name);
                }

                let elem = self.insert_element(self.current_node(), name, attributes);
                // Self-closing is accepted everywhere but only obeyed on
                // void elements.
                if !is_void_element(name) {
                    if *self_closing {
                        self.issue(format!("self-closing flag on non-void <{name}> ignored"));
                    }
                    self.open_elements.push(elem);
                }
            }
            Token::EndTag { name } if name == "body" || name == "html" => {
                self.mode = InsertionMode::AfterBody;
            }
            Token::EndTag { name } => {
                if is_void_element(name) {
                    self.issue(format!("end tag for void element </{name}> ignored"));
                } else if self.has_open_element(name) {
                    self.pop_until(name);
                } else {
                    self.issue(format!("unmatched end tag </{name}> ignored"));
                }
            }
            Token::EndOfFile => self.close_all(),
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn process_after_body(&mut self, token: &Token) {
        match token {
            Token::Comment(data) => {
                let parent = self.html_pointer.unwrap_or(NodeId::ROOT);
                self.append_comment(parent, data);
            }
            Token::Character(data) if data.trim().is_empty() => {}
            Token::EndOfFile => self.close_all(),
            _ => {
                // "Parse error. Switch the insertion mode to 'in body' and
                // reprocess the token."
                self.issue("content after </body> reparented into body");
                self.mode = InsertionMode::InBody;
                self.reopen_body();
                self.process(token);
            }
        }
    }

    fn reopen_body(&mut self) {
        if let (Some(html), Some(body)) = (self.html_pointer, self.tree.body()) {
            self.open_elements.push(html);
            self.open_elements.push(body);
        }
    }

    // ------------------------------------------------------------------
    // Insertion helpers
    // ------------------------------------------------------------------

    fn insert_element(&mut self, parent: NodeId, name: &str, attributes: &[Attribute]) -> NodeId {
        let mut data = ElementData::new(name);
        for attr in attributes {
            // First occurrence wins on duplicates (the tokenizer already
            // drops exact duplicates; this guards merged fragments).
            if !data.has_attr(&attr.name) {
                data.set_attr(&attr.name, &attr.value);
            }
        }
        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(parent, id);
        id
    }

    /// "If there is a Text node immediately before the insertion point,
    /// then append data to that Text node's data."
    fn insert_text(&mut self, parent: NodeId, data: &str) {
        if let Some(last) = self.tree.last_child(parent) {
            if let Some(NodeType::Text(existing)) =
                self.tree.get_mut(last).map(|n| &mut n.node_type)
            {
                existing.push_str(data);
                return;
            }
        }
        let text = self.tree.create_text(data);
        self.tree.append_child(parent, text);
    }

    fn append_comment(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    fn has_open_element(&self, name: &str) -> bool {
        self.open_elements
            .iter()
            .any(|&id| self.tree.as_element(id).is_some_and(|e| e.tag_name == name))
    }

    /// Pop open elements up to and including the first match from the top.
    fn pop_until(&mut self, name: &str) {
        while let Some(&top) = self.open_elements.last() {
            let matches = self.tree.as_element(top).is_some_and(|e| e.tag_name == name);
            let _ = self.open_elements.pop();
            if matches {
                break;
            }
        }
    }

    /// "Once the user agent stops parsing the document... pop all the nodes
    /// off the stack of open elements."
    fn close_all(&mut self) {
        if !self.open_elements.is_empty() {
            let unclosed: Vec<String> = self
                .open_elements
                .iter()
                .filter_map(|&id| self.tree.as_element(id).map(|e| e.tag_name.clone()))
                .collect();
            if unclosed.iter().any(|t| t != "html" && t != "body" && t != "head") {
                warn_once("HTML", &format!("unclosed elements at EOF: {unclosed:?}"));
            }
        }
        self.open_elements.clear();
    }
}

/// Tags where a new sibling of the same name implies the end of the
/// previous one (`<p>` after an open `<p>`, `<li>` after `<li>`, ...).
fn implies_end_of_same(name: &str) -> bool {
    matches!(
        name,
        "p" | "li" | "dt" | "dd" | "tr" | "td" | "th" | "option"
    )
}

/// Parse an HTML fragment in the context of an element with the given tag.
///
/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Returns a detached tree whose body children are the fragment nodes.
/// Used by the `innerHTML` setter; import the children via
/// [`import_children`].
#[must_use]
pub fn parse_fragment(html: &str) -> DomTree {
    let mut tokenizer = crate::tokenizer::HtmlTokenizer::new(html);
    tokenizer.run();
    let parser = HtmlParser::new(tokenizer.into_tokens());
    parser.run()
}

/// Deep-copy the children of `src_parent` in `src` under `dst_parent` in
/// `dst`, preserving document order.
pub fn import_children(
    dst: &mut DomTree,
    dst_parent: NodeId,
    src: &DomTree,
    src_parent: NodeId,
) {
    let children: Vec<NodeId> = src.children(src_parent).to_vec();
    for child in children {
        import_node(dst, dst_parent, src, child);
    }
}

fn import_node(dst: &mut DomTree, dst_parent: NodeId, src: &DomTree, src_node: NodeId) {
    let Some(node) = src.get(src_node) else { return };
    let id = dst.alloc(node.node_type.clone());
    dst.append_child(dst_parent, id);
    import_children(dst, id, src, src_node);
}

/// Print a DOM subtree to stdout with indentation (debugging aid).
pub fn print_tree(tree: &DomTree, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Document) => println!("{indent}#document"),
        Some(NodeType::DocumentType(d)) => println!("{indent}<!DOCTYPE {}>", d.name),
        Some(NodeType::Element(e)) => {
            let mut attrs: Vec<String> = e
                .attrs
                .iter()
                .map(|(k, v)| format!(" {k}=\"{v}\""))
                .collect();
            attrs.sort();
            println!("{indent}<{}{}>", e.tag_name, attrs.join(""));
        }
        Some(NodeType::Text(t)) => {
            let trimmed = t.trim();
            if !trimmed.is_empty() {
                println!("{indent}\"{trimmed}\"");
            }
        }
        Some(NodeType::Comment(c)) => println!("{indent}<!--{c}-->"),
        None => {}
    }
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}
