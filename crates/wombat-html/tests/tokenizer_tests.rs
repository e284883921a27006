//! Integration tests for the HTML tokenizer.

use wombat_html::{HtmlTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HtmlTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

#[test]
fn test_plain_text_coalesced() {
    let tokens = tokenize("Hello");
    // Consecutive character data arrives as a single coalesced token.
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], Token::Character("Hello".to_string()));
    assert!(tokens[1].is_eof());
}

#[test]
fn test_empty_input_ends_in_eof() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype { name, .. } => assert_eq!(name.as_deref(), Some("html")),
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_with_public_identifier() {
    let tokens =
        tokenize("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://x\">");
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(
                public_identifier.as_deref(),
                Some("-//W3C//DTD HTML 4.01//EN")
            );
            assert_eq!(system_identifier.as_deref(), Some("http://x"));
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_start_tag_lowercased() {
    let tokens = tokenize("<DIV>");
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    match &tokens[0] {
        Token::EndTag { name } => assert_eq!(name, "div"),
        other => panic!("Expected EndTag token, got {other:?}"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        other => panic!("Expected self-closing StartTag, got {other:?}"),
    }
}

#[test]
fn test_attributes_quoted_and_unquoted() {
    let tokens = tokenize("<a HREF=\"/x\" target=_blank data-n='7'>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 3);
            assert_eq!(attributes[0].name, "href");
            assert_eq!(attributes[0].value, "/x");
            assert_eq!(attributes[1].name, "target");
            assert_eq!(attributes[1].value, "_blank");
            assert_eq!(attributes[2].name, "data-n");
            assert_eq!(attributes[2].value, "7");
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_dropped() {
    let tokens = tokenize("<p id=a id=b>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "a");
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->after");
    assert_eq!(tokens[0], Token::Comment(" hi ".to_string()));
    assert_eq!(tokens[1], Token::Character("after".to_string()));
}

#[test]
fn test_bogus_comment_from_question_mark() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert!(matches!(&tokens[0], Token::Comment(_)));
}

#[test]
fn test_named_character_references() {
    let tokens = tokenize("a &amp; b &mdash; &copy;");
    assert_eq!(tokens[0], Token::Character("a & b — ©".to_string()));
}

#[test]
fn test_unknown_named_reference_passes_through() {
    let tokens = tokenize("&bogusref; &alsofake");
    assert_eq!(
        tokens[0],
        Token::Character("&bogusref; &alsofake".to_string())
    );
}

#[test]
fn test_numeric_character_references() {
    let tokens = tokenize("&#65;&#x42;&#X63;");
    assert_eq!(tokens[0], Token::Character("ABc".to_string()));
}

#[test]
fn test_numeric_reference_out_of_range_is_replacement() {
    let tokens = tokenize("&#0;&#x110000;&#xD800;");
    assert_eq!(
        tokens[0],
        Token::Character("\u{FFFD}\u{FFFD}\u{FFFD}".to_string())
    );
}

#[test]
fn test_script_content_is_verbatim() {
    let tokens = tokenize("<script>if (a < b && c > d) { x(); }</script>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "script"));
    assert_eq!(
        tokens[1],
        Token::Character("if (a < b && c > d) { x(); }".to_string())
    );
    assert!(matches!(&tokens[2], Token::EndTag { name } if name == "script"));
}

#[test]
fn test_style_content_is_verbatim() {
    let tokens = tokenize("<style>p > a { color: red; }</style>");
    assert_eq!(
        tokens[1],
        Token::Character("p > a { color: red; }".to_string())
    );
}

#[test]
fn test_script_end_tag_mismatch_stays_in_raw_text() {
    let tokens = tokenize("<script>a</scrip>b</script>");
    assert_eq!(tokens[1], Token::Character("a</scrip>b".to_string()));
}

#[test]
fn test_stray_lt_is_literal() {
    let tokens = tokenize("1 < 2");
    assert_eq!(tokens[0], Token::Character("1 < 2".to_string()));
}

#[test]
fn test_eof_inside_tag() {
    let tokens = tokenize("<div class=");
    // The unfinished tag is dropped; the stream still terminates with EOF.
    assert!(tokens.last().unwrap().is_eof());
}

#[test]
fn test_always_terminates_on_adversarial_input() {
    // A long run of tag-open characters must neither loop nor panic.
    let input = "<".repeat(50_000);
    let tokens = tokenize(&input);
    assert!(tokens.last().unwrap().is_eof());
}
