//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing),
//! plus stylesheet re-serialization.

#[allow(clippy::module_inception)]
mod parser;

pub use parser::{format_css_number, CssParser, CssValue, Declaration, Rule, Stylesheet};

use crate::selector::{AttrMatchKind, Combinator, PseudoClass, Selector};

/// Serialize a stylesheet back to CSS text.
///
/// Re-tokenizing the output yields the original token stream modulo
/// whitespace (for the supported grammar; never-matching pseudo-classes
/// are dropped since their names are not retained).
#[must_use]
pub fn stylesheet_to_css(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    for rule in &sheet.rules {
        let selectors: Vec<String> = rule.selectors.iter().map(selector_to_css).collect();
        out.push_str(&selectors.join(", "));
        out.push_str(" {\n");
        for decl in &rule.declarations {
            out.push_str("  ");
            out.push_str(&decl.property);
            out.push_str(": ");
            out.push_str(&value_to_css(&decl.value));
            if decl.important {
                out.push_str(" !important");
            }
            out.push_str(";\n");
        }
        out.push_str("}\n");
    }
    out
}

/// Serialize a parsed selector back to CSS text.
#[must_use]
pub fn selector_to_css(selector: &Selector) -> String {
    let mut out = String::new();
    for (simple, combinator) in &selector.parts {
        if let Some(tag) = &simple.tag {
            out.push_str(tag);
        } else if simple.id.is_none()
            && simple.classes.is_empty()
            && simple.attributes.is_empty()
            && simple.pseudo_classes.is_empty()
        {
            out.push('*');
        }
        if let Some(id) = &simple.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &simple.classes {
            out.push('.');
            out.push_str(class);
        }
        for attr in &simple.attributes {
            out.push('[');
            out.push_str(&attr.name);
            let op = match attr.kind {
                AttrMatchKind::Exists => None,
                AttrMatchKind::Exact => Some("="),
                AttrMatchKind::Prefix => Some("^="),
                AttrMatchKind::Suffix => Some("$="),
                AttrMatchKind::Contains => Some("*="),
                AttrMatchKind::Word => Some("~="),
                AttrMatchKind::Hyphen => Some("|="),
            };
            if let Some(op) = op {
                out.push_str(op);
                out.push('"');
                out.push_str(&attr.value);
                out.push('"');
                if attr.case_insensitive {
                    out.push_str(" i");
                }
            }
            out.push(']');
        }
        for pseudo in &simple.pseudo_classes {
            let name = match pseudo {
                PseudoClass::FirstChild => ":first-child",
                PseudoClass::LastChild => ":last-child",
                PseudoClass::OnlyChild => ":only-child",
                PseudoClass::Empty => ":empty",
                PseudoClass::Root => ":root",
                PseudoClass::NeverMatch => continue,
            };
            out.push_str(name);
        }
        match combinator {
            Some(Combinator::Descendant) => out.push(' '),
            Some(Combinator::Child) => out.push_str(" > "),
            Some(Combinator::NextSibling) => out.push_str(" + "),
            Some(Combinator::SubsequentSibling) => out.push_str(" ~ "),
            None => {}
        }
    }
    out
}

fn value_to_css(value: &CssValue) -> String {
    match value {
        CssValue::Keyword(k) => k.clone(),
        CssValue::Color(c) => format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        CssValue::Str(s) => format!("\"{s}\""),
        CssValue::Number(n) => format_css_number(*n),
        CssValue::Percentage(p) => format!("{}%", format_css_number(*p)),
        CssValue::Length(l) => match l {
            crate::style::values::Length::Px(v) => format!("{v}px"),
            crate::style::values::Length::Em(v) => format!("{}em", format_css_number(f64::from(*v))),
            crate::style::values::Length::Percent(v) => {
                format!("{}%", format_css_number(f64::from(*v)))
            }
            crate::style::values::Length::Auto => "auto".to_string(),
        },
        CssValue::List(items) => items
            .iter()
            .map(value_to_css)
            .collect::<Vec<_>>()
            .join(" "),
    }
}
