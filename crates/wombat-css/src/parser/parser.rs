//! CSS parser.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! Recursive descent over the token stream producing a [`Stylesheet`].
//! Parse errors inside a rule recover by skipping to the next `;` or `}`;
//! the parser never fails, it returns a best-effort stylesheet. Iteration
//! and wall-clock caps bound the work on adversarial input.

use std::time::{Duration, Instant};

use wombat_common::warning::warn_once;

use crate::selector::{parse_selector, Selector};
use crate::style::values::{CssColor, Length};
use crate::tokenizer::CssToken;

/// Wall-clock deadline for a single parse.
const DEADLINE: Duration = Duration::from_millis(1500);

/// [§ 9 CSS stylesheets](https://www.w3.org/TR/css-syntax-3/#css-stylesheets)
///
/// "A CSS stylesheet's value is a list of rules."
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Style rules in source order.
    pub rules: Vec<Rule>,
}

/// [§ 9.1 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
///
/// "A style rule is a qualified rule that associates a selector list with
/// a list of property declarations."
#[derive(Debug, Clone)]
pub struct Rule {
    /// The comma-separated selectors of the prelude, parsed.
    pub selectors: Vec<Selector>,
    /// The declaration block.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.5 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// "Declarations... associate a property or descriptor name with a value."
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Property name, lowercased.
    pub property: String,
    /// Parsed value (a single component or a space-separated list).
    pub value: CssValue,
    /// [CSS Cascade § 6.4.2](https://www.w3.org/TR/css-cascade-4/#importance)
    /// "A declaration is important if it has a !important annotation."
    pub important: bool,
}

/// A component value in a declaration.
///
/// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    /// A keyword (idents, unrecognized dimensions like `5pt`, and opaque
    /// skipped functions like `rgb(...)`).
    Keyword(String),
    /// A hex color.
    Color(CssColor),
    /// A quoted string.
    Str(String),
    /// A bare number.
    Number(f64),
    /// A percentage.
    Percentage(f64),
    /// A length with a recognized unit (px, em).
    Length(Length),
    /// A space-separated list of components.
    List(Vec<CssValue>),
}

impl CssValue {
    /// Iterate the component values (a single value yields itself).
    pub fn components(&self) -> impl Iterator<Item = &Self> {
        match self {
            Self::List(items) => items.iter(),
            single => std::slice::from_ref(single).iter(),
        }
    }

    /// The keyword string, if this is a keyword.
    #[must_use]
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(k) => Some(k),
            _ => None,
        }
    }

    /// Interpret this component as a length: explicit lengths pass
    /// through, percentages become `Length::Percent`, bare numbers are
    /// treated as px (quirk), and the `auto` keyword maps to
    /// `Length::Auto`.
    #[must_use]
    pub fn as_length(&self) -> Option<Length> {
        match self {
            Self::Length(l) => Some(*l),
            Self::Percentage(p) => Some(Length::Percent(*p as f32)),
            Self::Number(n) => Some(Length::Px(n.round() as i32)),
            Self::Keyword(k) if k == "auto" => Some(Length::Auto),
            _ => None,
        }
    }

    /// Interpret this component as a color (hex or named).
    #[must_use]
    pub fn as_color(&self) -> Option<CssColor> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Keyword(k) => CssColor::from_name(k),
            _ => None,
        }
    }
}

/// [§ 5.3 Parser Entry Points](https://www.w3.org/TR/css-syntax-3/#parser-entry-points)
///
/// Parser over a CSS token stream.
pub struct CssParser {
    tokens: Vec<CssToken>,
    pos: usize,
    iterations: usize,
    max_iterations: usize,
    deadline: Instant,
}

impl CssParser {
    /// Create a parser for a token stream.
    ///
    /// The iteration cap is `min(500k, max(100k, 5 * tokens))`; the
    /// wall-clock deadline ~1.5 s.
    #[must_use]
    pub fn new(tokens: Vec<CssToken>) -> Self {
        let max_iterations = 500_000.min(100_000.max(tokens.len().saturating_mul(5)));
        Self {
            tokens,
            pos: 0,
            iterations: 0,
            max_iterations,
            deadline: Instant::now() + DEADLINE,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Never fails; on malformed input the affected rules are dropped and
    /// the rest of the sheet parses normally.
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut rules = Vec::new();
        loop {
            if self.budget_exceeded() {
                warn_once("CSS", "stylesheet parse budget exceeded; truncating");
                break;
            }
            self.skip_whitespace();
            match self.peek() {
                None | Some(CssToken::Eof) => break,
                // "unexpected <}-token>: This is a parse error... drop the
                // token and continue."
                Some(CssToken::RightBrace) => {
                    let _ = self.next();
                }
                Some(CssToken::AtKeyword(name)) => {
                    let name = name.clone();
                    warn_once("CSS", &format!("skipping unsupported at-rule @{name}"));
                    self.skip_at_rule();
                }
                Some(_) => {
                    if let Some(rule) = self.parse_qualified_rule() {
                        rules.push(rule);
                    }
                }
            }
        }
        Stylesheet { rules }
    }

    /// Parse a bare declaration list (the contents of a `style`
    /// attribute).
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.parse_declarations_until_block_end()
    }

    fn budget_exceeded(&mut self) -> bool {
        self.iterations += 1;
        self.iterations > self.max_iterations
            || (self.iterations % 512 == 0 && Instant::now() > self.deadline)
    }

    fn peek(&self) -> Option<&CssToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<CssToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(CssToken::Whitespace)) {
            self.pos += 1;
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// Skips the prelude and, if present, the entire `{}` block.
    fn skip_at_rule(&mut self) {
        let _ = self.next(); // the at-keyword
        loop {
            if self.budget_exceeded() {
                return;
            }
            match self.next() {
                None | Some(CssToken::Eof | CssToken::Semicolon) => return,
                Some(CssToken::LeftBrace) => {
                    self.skip_block(1);
                    return;
                }
                Some(_) => {}
            }
        }
    }

    /// Skip a `{}` block with the given starting depth.
    fn skip_block(&mut self, mut depth: usize) {
        while depth > 0 {
            if self.budget_exceeded() {
                return;
            }
            match self.next() {
                None | Some(CssToken::Eof) => return,
                Some(CssToken::LeftBrace) => depth += 1,
                Some(CssToken::RightBrace) => depth -= 1,
                Some(_) => {}
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn parse_qualified_rule(&mut self) -> Option<Rule> {
        // Collect the prelude up to the block.
        let mut prelude: Vec<CssToken> = Vec::new();
        loop {
            if self.budget_exceeded() {
                return None;
            }
            match self.next() {
                // "EOF: This is a parse error. Return nothing."
                None | Some(CssToken::Eof) => return None,
                Some(CssToken::LeftBrace) => break,
                Some(token) => prelude.push(token),
            }
        }

        // Split the prelude on commas and parse each selector.
        let mut selectors = Vec::new();
        for group in prelude.split(|t| matches!(t, CssToken::Comma)) {
            match parse_selector(group) {
                Some(selector) => selectors.push(selector),
                None => {
                    if !group.iter().all(|t| matches!(t, CssToken::Whitespace)) {
                        warn_once("CSS", "dropping unparsable selector in rule prelude");
                    }
                }
            }
        }

        let declarations = self.parse_declarations_until_block_end();

        if selectors.is_empty() {
            // The block was still consumed; the rule just matches nothing.
            return None;
        }
        Some(Rule {
            selectors,
            declarations,
        })
    }

    /// [§ 5.4.4 Consume a style block's contents](https://www.w3.org/TR/css-syntax-3/#consume-style-block)
    fn parse_declarations_until_block_end(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            if self.budget_exceeded() {
                return declarations;
            }
            self.skip_whitespace();
            match self.peek() {
                None | Some(CssToken::Eof) => return declarations,
                Some(CssToken::RightBrace) => {
                    let _ = self.next();
                    return declarations;
                }
                Some(CssToken::Semicolon) => {
                    let _ = self.next();
                }
                Some(CssToken::Ident(_)) => {
                    if let Some(decl) = self.parse_declaration() {
                        declarations.push(decl);
                    }
                }
                Some(_) => {
                    // "This is a parse error. Reconsume... consume the
                    // remnants of a bad declaration."
                    self.recover_declaration();
                }
            }
        }
    }

    /// [§ 5.4.5 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn parse_declaration(&mut self) -> Option<Declaration> {
        let property = match self.next() {
            Some(CssToken::Ident(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };
        self.skip_whitespace();
        if !matches!(self.peek(), Some(CssToken::Colon)) {
            warn_once("CSS", &format!("missing ':' after property '{property}'"));
            self.recover_declaration();
            return None;
        }
        let _ = self.next(); // colon

        let mut components: Vec<CssValue> = Vec::new();
        let mut important = false;
        loop {
            if self.budget_exceeded() {
                break;
            }
            self.skip_whitespace();
            match self.peek() {
                None | Some(CssToken::Eof | CssToken::Semicolon | CssToken::RightBrace) => {
                    if matches!(self.peek(), Some(CssToken::Semicolon)) {
                        let _ = self.next();
                    }
                    break;
                }
                // "If the last two non-<whitespace-token>s... are a
                // <delim-token> with the value '!' followed by an
                // <ident-token> with a value that is an ASCII
                // case-insensitive match for 'important'..."
                Some(CssToken::Delim('!')) => {
                    let _ = self.next();
                    self.skip_whitespace();
                    match self.next() {
                        Some(CssToken::Ident(word)) if word.eq_ignore_ascii_case("important") => {
                            important = true;
                        }
                        _ => {
                            self.recover_declaration();
                            return None;
                        }
                    }
                }
                Some(_) => {
                    if let Some(component) = self.parse_component() {
                        components.push(component);
                    }
                }
            }
        }

        if components.is_empty() {
            return None;
        }
        let value = if components.len() == 1 {
            components.remove(0)
        } else {
            CssValue::List(components)
        };
        Some(Declaration {
            property,
            value,
            important,
        })
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn parse_component(&mut self) -> Option<CssValue> {
        match self.next()? {
            CssToken::Ident(name) => Some(CssValue::Keyword(name.to_ascii_lowercase())),
            // `#hex` → color; a non-hex hash degrades to a keyword.
            CssToken::Hash(value) => Some(
                CssColor::from_hex(&value)
                    .map_or_else(|| CssValue::Keyword(format!("#{value}")), CssValue::Color),
            ),
            CssToken::String(s) => Some(CssValue::Str(s)),
            CssToken::Number(n) => Some(CssValue::Number(n)),
            CssToken::Percentage(p) => Some(CssValue::Percentage(p)),
            CssToken::Dimension(value, unit) => Some(match unit.to_ascii_lowercase().as_str() {
                "px" => CssValue::Length(Length::Px(value.round() as i32)),
                "em" | "rem" => CssValue::Length(Length::Em(value as f32)),
                // Unrecognized unit: pass through as the keyword "N<unit>".
                _ => CssValue::Keyword(format!("{}{unit}", format_css_number(value))),
            }),
            // `name(...)` is skipped to the matching `)` and surfaced as an
            // opaque keyword.
            CssToken::Function(name) => {
                self.skip_function_args();
                Some(CssValue::Keyword(format!("{name}(...)")))
            }
            CssToken::Comma => Some(CssValue::Keyword(",".to_string())),
            CssToken::Delim(c) => Some(CssValue::Keyword(c.to_string())),
            // Stray structural tokens inside a value: drop them.
            _ => None,
        }
    }

    fn skip_function_args(&mut self) {
        let mut depth = 1;
        while depth > 0 {
            if self.budget_exceeded() {
                return;
            }
            match self.next() {
                None | Some(CssToken::Eof) => return,
                Some(CssToken::Function(_) | CssToken::LeftParen) => depth += 1,
                Some(CssToken::RightParen) => depth -= 1,
                Some(_) => {}
            }
        }
    }

    /// Error recovery: skip to the next `;` (consumed) or `}` (left for
    /// the block parser).
    fn recover_declaration(&mut self) {
        loop {
            if self.budget_exceeded() {
                return;
            }
            match self.peek() {
                None | Some(CssToken::Eof | CssToken::RightBrace) => return,
                Some(CssToken::Semicolon) => {
                    let _ = self.next();
                    return;
                }
                Some(_) => {
                    let _ = self.next();
                }
            }
        }
    }
}

/// Format a number the way it would appear in CSS source (integers
/// without a trailing `.0`).
#[must_use]
pub fn format_css_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
