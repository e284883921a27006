//! Integration tests for the CSS parser and full style pipeline.

use wombat_css::style::{Display, FontWeight, TextAlign};
use wombat_css::{
    extract_style_content, parse_stylesheet_str, resolve_styles, ua_stylesheet, CssColor,
    CssValue, Length,
};
use wombat_dom::{DomTree, NodeId};
use wombat_html::parse_document;

fn find(tree: &DomTree, tag: &str) -> NodeId {
    tree.iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .unwrap_or_else(|| panic!("no <{tag}> in test document"))
}

#[test]
fn test_empty_stylesheet() {
    let sheet = parse_stylesheet_str("");
    assert!(sheet.rules.is_empty());
}

#[test]
fn test_rule_structure() {
    let sheet = parse_stylesheet_str("p, .note { color: red; margin: 4px !important; }");
    assert_eq!(sheet.rules.len(), 1);
    let rule = &sheet.rules[0];
    assert_eq!(rule.selectors.len(), 2);
    assert_eq!(rule.declarations.len(), 2);
    assert_eq!(rule.declarations[0].property, "color");
    assert!(!rule.declarations[0].important);
    assert!(rule.declarations[1].important);
}

#[test]
fn test_unknown_unit_degrades_to_keyword() {
    let sheet = parse_stylesheet_str("p { margin-top: 5pt; }");
    let decl = &sheet.rules[0].declarations[0];
    assert_eq!(decl.value, CssValue::Keyword("5pt".to_string()));
}

#[test]
fn test_function_skipped_as_opaque_keyword() {
    let sheet = parse_stylesheet_str("p { color: rgb(255, 0, 0); width: 10px; }");
    let rule = &sheet.rules[0];
    assert_eq!(rule.declarations[0].value, CssValue::Keyword("rgb(...)".to_string()));
    // The declaration after the function still parses.
    assert_eq!(rule.declarations[1].value, CssValue::Length(Length::Px(10)));
}

#[test]
fn test_error_recovery_skips_to_semicolon() {
    let sheet = parse_stylesheet_str("p { color red; margin: 4px; }");
    let rule = &sheet.rules[0];
    // The malformed declaration is dropped; the next one survives.
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].property, "margin");
}

#[test]
fn test_malformed_rule_does_not_poison_sheet() {
    let sheet = parse_stylesheet_str("p { { } } div { color: blue; }");
    assert!(sheet
        .rules
        .iter()
        .any(|r| r.declarations.iter().any(|d| d.property == "color")));
}

#[test]
fn test_at_rule_skipped_entirely() {
    let sheet =
        parse_stylesheet_str("@media (max-width: 100px) { p { color: red; } } div { margin: 8px; }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].declarations[0].property, "margin");
}

#[test]
fn test_adversarial_input_terminates() {
    // Deeply unbalanced braces and parens must hit the recovery paths,
    // not loop.
    let evil = "{".repeat(20_000) + &")".repeat(20_000);
    let _ = parse_stylesheet_str(&evil);
    let evil2 = "a{b:(".repeat(10_000);
    let _ = parse_stylesheet_str(&evil2);
}

#[test]
fn test_extract_style_content() {
    let tree = parse_document(
        "<html><head><style>p { color: red; }</style></head><body><style>b { color: blue; }</style></body></html>",
    );
    let css = extract_style_content(&tree);
    assert!(css.contains("p { color: red; }"));
    assert!(css.contains("b { color: blue; }"));
}

#[test]
fn test_full_pipeline_with_ua_sheet() {
    let html = r#"<html><head><style>
        h1 { color: #2563eb; }
        .note { background-color: #fef08a; text-align: center; }
    </style></head><body>
        <h1>Title</h1>
        <p class="note">hello</p>
    </body></html>"#;
    let tree = parse_document(html);
    let author = parse_stylesheet_str(&extract_style_content(&tree));
    let styles = resolve_styles(&tree, &[ua_stylesheet(), author]);

    let h1 = styles.get(&find(&tree, "h1")).unwrap();
    // Author color applied, UA block display and bold weight retained.
    assert_eq!(h1.color, Some(CssColor::rgb(0x25, 0x63, 0xeb)));
    assert_eq!(h1.display, Display::Block);
    assert_eq!(h1.font_weight, FontWeight::Bold);

    let p = styles.get(&find(&tree, "p")).unwrap();
    assert_eq!(p.background_color, Some(CssColor::rgb(0xfe, 0xf0, 0x8a)));
    assert_eq!(p.text_align, TextAlign::Center);
}

#[test]
fn test_ua_link_styling() {
    let tree = parse_document(r#"<body><a href="/x">link</a></body>"#);
    let styles = resolve_styles(&tree, &[ua_stylesheet()]);
    let a = styles.get(&find(&tree, "a")).unwrap();
    assert!(a.color.is_some());
    assert_eq!(
        a.text_decoration,
        wombat_css::style::TextDecoration::Underline
    );
}
