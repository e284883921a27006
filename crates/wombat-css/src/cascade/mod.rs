//! CSS cascading and style computation.
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! The cascade is deterministic: declarations sort by
//! `(importance, origin, specificity, source order)` with stable
//! tie-breaking on stylesheet and rule indices, so identical inputs always
//! produce identical computed styles.

use std::collections::HashMap;

use wombat_dom::{DomTree, NodeId, NodeType};

use crate::parser::{CssParser, Declaration, Stylesheet};
use crate::selector::Specificity;
use crate::style::ComputedStyle;
use crate::tokenizer::CssTokenizer;

/// Mapping from element identity to computed style.
pub type StyleMap = HashMap<NodeId, ComputedStyle>;

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Precedence tiers, low to high. Within author declarations: normal
/// stylesheet rules lose to normal inline style, which loses to any
/// `!important`, and an important inline declaration beats an important
/// stylesheet one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Normal,
    InlineNormal,
    Important,
    InlineImportant,
}

/// One declaration with its full sort key.
struct SortedDeclaration<'a> {
    tier: Tier,
    specificity: Specificity,
    sheet_index: usize,
    rule_index: usize,
    decl_index: usize,
    declaration: &'a Declaration,
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// "The cascade takes an unordered list of declared values for a given
/// property on a given element, sorts them by their declaration's
/// precedence..."
///
/// Compute styles for every element in the tree. Stylesheets are given in
/// precedence order (user-agent sheet first, author sheets after): a later
/// sheet wins ties against an earlier one.
#[must_use]
pub fn resolve_styles(tree: &DomTree, sheets: &[Stylesheet]) -> StyleMap {
    let mut styles = StyleMap::new();
    let initial = ComputedStyle::default();
    resolve_node(tree, tree.root(), sheets, &initial, &mut styles);
    styles
}

fn resolve_node(
    tree: &DomTree,
    id: NodeId,
    sheets: &[Stylesheet],
    inherited: &ComputedStyle,
    styles: &mut StyleMap,
) {
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(element) => {
            // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
            let mut computed = ComputedStyle::inherit_from(inherited);

            let mut matched: Vec<SortedDeclaration> = Vec::new();

            // Stylesheet rules, tree-aware selector matching.
            for (sheet_index, sheet) in sheets.iter().enumerate() {
                for (rule_index, rule) in sheet.rules.iter().enumerate() {
                    // Each selector of the rule matches independently with
                    // its own specificity; the best match wins for the
                    // whole rule.
                    let best: Option<Specificity> = rule
                        .selectors
                        .iter()
                        .filter(|s| s.matches(tree, id))
                        .map(|s| s.specificity)
                        .max();
                    let Some(specificity) = best else { continue };
                    for (decl_index, declaration) in rule.declarations.iter().enumerate() {
                        matched.push(SortedDeclaration {
                            tier: if declaration.important {
                                Tier::Important
                            } else {
                                Tier::Normal
                            },
                            specificity,
                            sheet_index,
                            rule_index,
                            decl_index,
                            declaration,
                        });
                    }
                }
            }

            // [§ 6.3 Element-Attached Styles](https://www.w3.org/TR/css-cascade-4/#preshint)
            //
            // "Declarations from the style attribute... are considered to
            // have a specificity higher than any selector."
            let inline_decls = element
                .attr("style")
                .map(parse_inline_style)
                .unwrap_or_default();
            for (decl_index, declaration) in inline_decls.iter().enumerate() {
                matched.push(SortedDeclaration {
                    tier: if declaration.important {
                        Tier::InlineImportant
                    } else {
                        Tier::InlineNormal
                    },
                    specificity: Specificity::default(),
                    sheet_index: usize::MAX,
                    rule_index: 0,
                    decl_index,
                    declaration,
                });
            }

            // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
            //
            // Ascending sort; applying in order makes the highest-
            // precedence declaration win each property.
            matched.sort_by_key(|d| {
                (
                    d.tier,
                    d.specificity,
                    d.sheet_index,
                    d.rule_index,
                    d.decl_index,
                )
            });

            for item in &matched {
                computed.apply_declaration(item.declaration);
            }

            let _ = styles.insert(id, computed.clone());

            for &child in tree.children(id) {
                resolve_node(tree, child, sheets, &computed, styles);
            }
        }
        NodeType::Document => {
            for &child in tree.children(id) {
                resolve_node(tree, child, sheets, inherited, styles);
            }
        }
        // Text and comment nodes don't carry styles; text picks up its
        // parent's computed style during layout.
        NodeType::Text(_) | NodeType::Comment(_) | NodeType::DocumentType(_) => {}
    }
}

/// Parse the contents of a `style` attribute as a declaration list.
#[must_use]
pub fn parse_inline_style(style_attr: &str) -> Vec<Declaration> {
    let mut tokenizer = CssTokenizer::new(style_attr);
    tokenizer.run();
    let mut parser = CssParser::new(tokenizer.into_tokens());
    parser.parse_declaration_list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::CssColor;
    use wombat_dom::{ElementData, NodeType};

    fn parse_css(css: &str) -> Stylesheet {
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        parser.parse_stylesheet()
    }

    /// Helper to create element node types
    fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> NodeType {
        let mut data = ElementData::new(tag);
        if let Some(id_val) = id {
            data.set_attr("id", id_val);
        }
        if !classes.is_empty() {
            data.set_attr("class", &classes.join(" "));
        }
        NodeType::Element(data)
    }

    #[test]
    fn test_simple_match_and_inheritance() {
        let sheet = parse_css("body { color: #ff0000; }");
        let mut tree = DomTree::new();
        let body = tree.alloc(make_element("body", None, &[]));
        let p = tree.alloc(make_element("p", None, &[]));
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert_eq!(
            styles.get(&body).unwrap().color,
            Some(CssColor::rgb(255, 0, 0))
        );
        // p inherits color from body.
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_background_not_inherited() {
        let sheet = parse_css("body { background-color: #f5f5f5; }");
        let mut tree = DomTree::new();
        let body = tree.alloc(make_element("body", None, &[]));
        let p = tree.alloc(make_element("p", None, &[]));
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert!(styles.get(&body).unwrap().background_color.is_some());
        assert!(styles.get(&p).unwrap().background_color.is_none());
    }

    #[test]
    fn test_specificity_class_beats_type() {
        let sheet = parse_css("p { color: #ff0000; } .highlight { color: #00ff00; }");
        let mut tree = DomTree::new();
        let p = tree.alloc(make_element("p", None, &["highlight"]));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0, 255, 0))
        );
    }

    #[test]
    fn test_source_order_breaks_ties() {
        let sheet = parse_css("p { color: #111111; } p { color: #222222; }");
        let mut tree = DomTree::new();
        let p = tree.alloc(make_element("p", None, &[]));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0x22, 0x22, 0x22))
        );
    }

    #[test]
    fn test_important_beats_higher_specificity() {
        // Spec scenario: p red; p.hi green; #x blue !important → blue.
        let sheet =
            parse_css("p { color: red; } p.hi { color: green; } #x { color: blue !important; }");
        let mut tree = DomTree::new();
        let p = tree.alloc(make_element("p", Some("x"), &["hi"]));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0, 0, 255))
        );
    }

    #[test]
    fn test_inline_style_beats_stylesheet_but_loses_to_important() {
        let sheet = parse_css("#x { color: red; } p { color: blue !important; }");
        let mut tree = DomTree::new();
        let mut data = ElementData::new("p");
        data.set_attr("id", "x");
        data.set_attr("style", "color: green");
        let p = tree.alloc(NodeType::Element(data));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[sheet]);
        // !important stylesheet rule beats the inline style.
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0, 0, 255))
        );
    }

    #[test]
    fn test_inline_style_beats_id_selector() {
        let sheet = parse_css("#x { color: red; }");
        let mut tree = DomTree::new();
        let mut data = ElementData::new("p");
        data.set_attr("id", "x");
        data.set_attr("style", "color: green");
        let p = tree.alloc(NodeType::Element(data));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[sheet]);
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0, 0x80, 0))
        );
    }

    #[test]
    fn test_later_sheet_wins_ties() {
        let ua = parse_css("p { color: #101010; }");
        let author = parse_css("p { color: #202020; }");
        let mut tree = DomTree::new();
        let p = tree.alloc(make_element("p", None, &[]));
        tree.append_child(NodeId::ROOT, p);

        let styles = resolve_styles(&tree, &[ua, author]);
        assert_eq!(
            styles.get(&p).unwrap().color,
            Some(CssColor::rgb(0x20, 0x20, 0x20))
        );
    }

    #[test]
    fn test_cascade_is_deterministic() {
        // Two runs over the same inputs produce identical styles (no
        // hash-order dependence).
        let sheet = parse_css(
            "p { color: red; margin: 4px; } .a { color: green; } p.a { padding: 8px; }",
        );
        let mut tree = DomTree::new();
        let p = tree.alloc(make_element("p", None, &["a"]));
        tree.append_child(NodeId::ROOT, p);

        let first = resolve_styles(&tree, std::slice::from_ref(&sheet));
        let second = resolve_styles(&tree, std::slice::from_ref(&sheet));
        assert_eq!(first.get(&p), second.get(&p));
    }
}
