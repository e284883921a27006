//! Integration tests for selector parsing and matching.

use wombat_css::{parse_selector, CssToken, CssTokenizer, Selector, Specificity};
use wombat_dom::{DomTree, NodeId};
use wombat_html::parse_document;

fn selector(text: &str) -> Selector {
    let mut tokenizer = CssTokenizer::new(text);
    tokenizer.run();
    let tokens: Vec<CssToken> = tokenizer
        .into_tokens()
        .into_iter()
        .filter(|t| !t.is_eof())
        .collect();
    parse_selector(&tokens).unwrap_or_else(|| panic!("selector '{text}' failed to parse"))
}

fn try_selector(text: &str) -> Option<Selector> {
    let mut tokenizer = CssTokenizer::new(text);
    tokenizer.run();
    let tokens: Vec<CssToken> = tokenizer
        .into_tokens()
        .into_iter()
        .filter(|t| !t.is_eof())
        .collect();
    parse_selector(&tokens)
}

/// Find the first element with the given tag name.
fn find(tree: &DomTree, tag: &str) -> NodeId {
    tree.iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .unwrap_or_else(|| panic!("no <{tag}> in test document"))
}

#[test]
fn test_specificity_triple() {
    assert_eq!(selector("p").specificity, Specificity(0, 0, 1));
    assert_eq!(selector(".hi").specificity, Specificity(0, 1, 0));
    assert_eq!(selector("#x").specificity, Specificity(1, 0, 0));
    assert_eq!(selector("p.hi#x").specificity, Specificity(1, 1, 1));
    assert_eq!(
        selector("div > p + span.a[href]:first-child").specificity,
        Specificity(0, 3, 3)
    );
    // Lexicographic comparison: one id beats any number of classes.
    assert!(selector("#x").specificity > selector(".a.b.c.d").specificity);
}

#[test]
fn test_universal_selector() {
    let tree = parse_document("<div><p>x</p></div>");
    let sel = selector("*");
    assert!(sel.matches(&tree, find(&tree, "p")));
    assert!(sel.matches(&tree, find(&tree, "div")));
    assert_eq!(sel.specificity, Specificity(0, 0, 0));
}

#[test]
fn test_type_id_class() {
    let tree = parse_document(r#"<div id="main" class="wide dark"><p class="a">x</p></div>"#);
    let div = find(&tree, "div");
    let p = find(&tree, "p");

    assert!(selector("div").matches(&tree, div));
    assert!(!selector("div").matches(&tree, p));
    assert!(selector("#main").matches(&tree, div));
    assert!(selector(".wide").matches(&tree, div));
    assert!(selector(".dark.wide").matches(&tree, div));
    assert!(!selector(".wide.missing").matches(&tree, div));
    assert!(selector("div#main.wide").matches(&tree, div));
}

#[test]
fn test_descendant_combinator() {
    let tree = parse_document("<div><section><p>x</p></section></div>");
    let p = find(&tree, "p");
    assert!(selector("div p").matches(&tree, p));
    assert!(selector("section p").matches(&tree, p));
    assert!(!selector("span p").matches(&tree, p));
}

#[test]
fn test_child_combinator() {
    let tree = parse_document("<div><section><p>x</p></section></div>");
    let p = find(&tree, "p");
    assert!(selector("section > p").matches(&tree, p));
    assert!(!selector("div > p").matches(&tree, p));
}

#[test]
fn test_descendant_backtracking() {
    // The nearest <b> ancestor has no <a> above it, but a farther <b>
    // does; matching must backtrack rather than commit to the nearest.
    let tree = parse_document(
        r#"<b class="outer"><a><b class="inner"><c>x</c></b></a></b>"#,
    );
    let c = find(&tree, "c");
    assert!(selector("a b c").matches(&tree, c));
}

#[test]
fn test_sibling_combinators() {
    let tree = parse_document(
        r#"<div><p>one</p><span class="a">two</span><span class="b">three</span></div>"#,
    );
    let spans: Vec<NodeId> = tree
        .iter_all()
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "span"))
        .collect();

    // span.a immediately follows the <p>.
    assert!(selector("p + span.a").matches(&tree, spans[0]));
    assert!(!selector("p + span.b").matches(&tree, spans[1]));
    // but both spans follow it generally.
    assert!(selector("p ~ span.a").matches(&tree, spans[0]));
    assert!(selector("p ~ span.b").matches(&tree, spans[1]));
}

#[test]
fn test_spec_combinator_scenario() {
    // `div > p + span.a` matches a span.a whose immediately preceding
    // element sibling is a <p> and whose parent is a <div>.
    let matching = parse_document(r#"<div><p>x</p><span class="a">y</span></div>"#);
    let span = find(&matching, "span");
    assert!(selector("div > p + span.a").matches(&matching, span));

    // No match when the parent is not a div...
    let wrong_parent = parse_document(r#"<section><p>x</p><span class="a">y</span></section>"#);
    let span = find(&wrong_parent, "span");
    assert!(!selector("div > p + span.a").matches(&wrong_parent, span));

    // ...or when something sits between the p and the span.
    let wrong_sibling =
        parse_document(r#"<div><p>x</p><em>z</em><span class="a">y</span></div>"#);
    let span = find(&wrong_sibling, "span");
    assert!(!selector("div > p + span.a").matches(&wrong_sibling, span));
}

#[test]
fn test_sibling_combinator_skips_text_nodes() {
    // Text between elements does not break adjacency.
    let tree = parse_document("<div><p>one</p> middle <span>two</span></div>");
    let span = find(&tree, "span");
    assert!(selector("p + span").matches(&tree, span));
}

#[test]
fn test_attribute_selectors() {
    let tree = parse_document(
        r#"<a href="https://example.com/page.html" lang="en-US" rel="nofollow external">x</a>"#,
    );
    let a = find(&tree, "a");

    assert!(selector("[href]").matches(&tree, a));
    assert!(!selector("[missing]").matches(&tree, a));
    assert!(selector(r#"[lang="en-US"]"#).matches(&tree, a));
    assert!(selector(r#"[href^="https"]"#).matches(&tree, a));
    assert!(selector(r#"[href$=".html"]"#).matches(&tree, a));
    assert!(selector(r#"[href*="example"]"#).matches(&tree, a));
    assert!(selector(r#"[rel~="external"]"#).matches(&tree, a));
    assert!(!selector(r#"[rel~="ext"]"#).matches(&tree, a));
    assert!(selector(r#"[lang|="en"]"#).matches(&tree, a));
    assert!(!selector(r#"[lang|="e"]"#).matches(&tree, a));
}

#[test]
fn test_attribute_case_sensitivity() {
    let tree = parse_document(r#"<input type="TEXT">"#);
    let input = find(&tree, "input");
    // Values are case-sensitive by default...
    assert!(!selector(r#"[type="text"]"#).matches(&tree, input));
    // ...unless the `i` flag is present.
    assert!(selector(r#"[type="text" i]"#).matches(&tree, input));
}

#[test]
fn test_structural_pseudo_classes() {
    let tree = parse_document("<ul><li>a</li><li>b</li><li>c</li></ul><div></div>");
    let lis: Vec<NodeId> = tree
        .iter_all()
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "li"))
        .collect();

    assert!(selector("li:first-child").matches(&tree, lis[0]));
    assert!(!selector("li:first-child").matches(&tree, lis[1]));
    assert!(selector("li:last-child").matches(&tree, lis[2]));
    assert!(!selector("li:only-child").matches(&tree, lis[0]));

    let div = find(&tree, "div");
    assert!(selector("div:empty").matches(&tree, div));
    assert!(!selector("ul:empty").matches(&tree, find(&tree, "ul")));

    let html = tree.document_element().unwrap();
    assert!(selector(":root").matches(&tree, html));
    assert!(!selector(":root").matches(&tree, div));
}

#[test]
fn test_unsupported_pseudo_never_matches() {
    let tree = parse_document(r##"<a href="#">x</a>"##);
    let a = find(&tree, "a");
    // The selector parses (the rule survives) but never matches.
    assert!(!selector("a:hover").matches(&tree, a));
    assert!(!selector("a::before").matches(&tree, a));
    let nth = try_selector("a:nth-child(2)").expect("functional pseudo should parse");
    assert!(!nth.matches(&tree, a));
}

#[test]
fn test_invalid_selectors_rejected() {
    assert!(try_selector("").is_none());
    assert!(try_selector(">").is_none());
    assert!(try_selector("div >").is_none());
    assert!(try_selector(". class").is_none());
}
