//! Computed style representation and declaration application.
//!
//! [CSS Cascading and Inheritance Level 4 § 4.4](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value...
//! generally absolutizing relative values."
//!
//! `ComputedStyle` is a flat record over the supported properties. The
//! cascade applies declarations onto it in precedence order; unknown
//! properties and malformed values are reported once and dropped.

use wombat_common::warning::warn_once;

use crate::parser::{CssValue, Declaration};
use crate::style::values::{
    AlignItems, BoxSizing, CssColor, Display, FlexDirection, FlexWrap, FontStyle, FontWeight,
    JustifyContent, Length, ListStyleType, Position, TextAlign, TextDecoration, WhiteSpace,
};

/// The computed style of one element.
///
/// Defaults are the CSS initial values; [`ComputedStyle::inherit_from`]
/// builds a child's starting style from its parent per the inherited
/// property list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    /// [display](https://www.w3.org/TR/css-display-3/#the-display-properties) — initial: `inline`.
    pub display: Display,
    /// [position](https://www.w3.org/TR/css-position-3/#position-property) — parsed, not laid out.
    pub position: Position,
    /// [font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop) — inherited.
    pub font_weight: FontWeight,
    /// [font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop) — inherited.
    pub font_style: FontStyle,
    /// [color](https://www.w3.org/TR/css-color-4/#the-color-property) — inherited;
    /// `None` means the terminal's default foreground.
    pub color: Option<CssColor>,
    /// [background-color](https://www.w3.org/TR/css-backgrounds-3/#background-color) — not inherited.
    pub background_color: Option<CssColor>,
    /// Margin edges (top, right, bottom, left).
    pub margin: [Length; 4],
    /// Padding edges (top, right, bottom, left).
    pub padding: [Length; 4],
    /// [width](https://www.w3.org/TR/css-sizing-3/#preferred-size-properties)
    pub width: Length,
    /// min-width — `Auto` means no minimum.
    pub min_width: Length,
    /// max-width — `Auto` means no maximum.
    pub max_width: Length,
    /// [text-align](https://www.w3.org/TR/css-text-3/#text-align-property) — inherited.
    pub text_align: TextAlign,
    /// [text-decoration](https://www.w3.org/TR/css-text-decor-3/) — inherited here
    /// (decorations propagate to descendant text in this engine).
    pub text_decoration: TextDecoration,
    /// [white-space](https://www.w3.org/TR/css-text-3/#white-space-property) — inherited.
    pub white_space: WhiteSpace,
    /// [flex-direction](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
    pub flex_direction: FlexDirection,
    /// [flex-wrap](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
    pub flex_wrap: FlexWrap,
    /// [flex-grow](https://www.w3.org/TR/css-flexbox-1/#flex-grow-property)
    pub flex_grow: f32,
    /// [flex-basis](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
    pub flex_basis: Length,
    /// [justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
    pub justify_content: JustifyContent,
    /// [align-items](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
    pub align_items: AlignItems,
    /// [gap](https://www.w3.org/TR/css-align-3/#gap-shorthand)
    pub gap: Length,
    /// [list-style-type](https://www.w3.org/TR/css-lists-3/#propdef-list-style-type) — inherited.
    pub list_style: ListStyleType,
    /// [box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
    pub box_sizing: BoxSizing,
}

/// Margin/padding edge indices.
pub const EDGE_TOP: usize = 0;
/// Right edge index.
pub const EDGE_RIGHT: usize = 1;
/// Bottom edge index.
pub const EDGE_BOTTOM: usize = 2;
/// Left edge index.
pub const EDGE_LEFT: usize = 3;

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            position: Position::Static,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            color: None,
            background_color: None,
            margin: [Length::Px(0); 4],
            padding: [Length::Px(0); 4],
            width: Length::Auto,
            min_width: Length::Auto,
            max_width: Length::Auto,
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
            white_space: WhiteSpace::Normal,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            flex_grow: 0.0,
            flex_basis: Length::Auto,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            gap: Length::Px(0),
            list_style: ListStyleType::Disc,
            box_sizing: BoxSizing::ContentBox,
        }
    }
}

impl ComputedStyle {
    /// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
    ///
    /// "Some properties are inherited from an ancestor element to its
    /// descendants." Inheritable properties copy the parent's computed
    /// value; the rest start at their initial value.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            // Inherited properties
            color: parent.color,
            font_weight: parent.font_weight,
            font_style: parent.font_style,
            text_align: parent.text_align,
            text_decoration: parent.text_decoration,
            white_space: parent.white_space,
            list_style: parent.list_style,
            // Everything else resets to the initial value
            ..Self::default()
        }
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// Apply one declaration onto this style. Called in ascending
    /// precedence order so later calls win.
    pub fn apply_declaration(&mut self, decl: &Declaration) {
        let value = &decl.value;
        match decl.property.as_str() {
            "display" => {
                if let Some(display) = parse_display(value) {
                    self.display = display;
                }
            }
            "position" => {
                if let Some(k) = value.as_keyword() {
                    self.position = match k {
                        "relative" => Position::Relative,
                        "absolute" => Position::Absolute,
                        "fixed" => Position::Fixed,
                        _ => Position::Static,
                    };
                }
            }
            "color" => {
                if let Some(color) = value.as_color() {
                    self.color = Some(color);
                }
            }
            "background-color" | "background" => {
                // For the `background` shorthand, take the first component
                // that parses as a color.
                if let Some(color) = value.components().find_map(CssValue::as_color) {
                    self.background_color = Some(color);
                } else if value.components().any(|c| c.as_keyword() == Some("transparent")) {
                    self.background_color = None;
                }
            }
            "font-weight" => match value {
                CssValue::Keyword(k) if k == "bold" || k == "bolder" => {
                    self.font_weight = FontWeight::Bold;
                }
                CssValue::Keyword(k) if k == "normal" || k == "lighter" => {
                    self.font_weight = FontWeight::Normal;
                }
                CssValue::Number(n) => {
                    self.font_weight = if *n >= 600.0 {
                        FontWeight::Bold
                    } else {
                        FontWeight::Normal
                    };
                }
                _ => {}
            },
            "font-style" => {
                if let Some(k) = value.as_keyword() {
                    self.font_style = match k {
                        "italic" | "oblique" => FontStyle::Italic,
                        _ => FontStyle::Normal,
                    };
                }
            }
            "margin" => apply_shorthand(&mut self.margin, value),
            "margin-top" => apply_edge(&mut self.margin, EDGE_TOP, value),
            "margin-right" => apply_edge(&mut self.margin, EDGE_RIGHT, value),
            "margin-bottom" => apply_edge(&mut self.margin, EDGE_BOTTOM, value),
            "margin-left" => apply_edge(&mut self.margin, EDGE_LEFT, value),
            "padding" => apply_shorthand(&mut self.padding, value),
            "padding-top" => apply_edge(&mut self.padding, EDGE_TOP, value),
            "padding-right" => apply_edge(&mut self.padding, EDGE_RIGHT, value),
            "padding-bottom" => apply_edge(&mut self.padding, EDGE_BOTTOM, value),
            "padding-left" => apply_edge(&mut self.padding, EDGE_LEFT, value),
            "width" => {
                if let Some(l) = value.as_length() {
                    self.width = l;
                }
            }
            "min-width" => {
                if let Some(l) = value.as_length() {
                    self.min_width = l;
                }
            }
            "max-width" => {
                if let Some(l) = value.as_length() {
                    self.max_width = l;
                } else if value.as_keyword() == Some("none") {
                    self.max_width = Length::Auto;
                }
            }
            "text-align" => {
                if let Some(k) = value.as_keyword() {
                    self.text_align = match k {
                        "right" => TextAlign::Right,
                        "center" => TextAlign::Center,
                        "justify" => TextAlign::Justify,
                        _ => TextAlign::Left,
                    };
                }
            }
            "text-decoration" | "text-decoration-line" => {
                if let Some(k) = value.components().find_map(CssValue::as_keyword) {
                    self.text_decoration = match k {
                        "underline" => TextDecoration::Underline,
                        "line-through" => TextDecoration::LineThrough,
                        _ => TextDecoration::None,
                    };
                }
            }
            "white-space" => {
                if let Some(k) = value.as_keyword() {
                    self.white_space = match k {
                        "pre" | "pre-wrap" | "pre-line" => WhiteSpace::Pre,
                        _ => WhiteSpace::Normal,
                    };
                }
            }
            "flex-direction" => {
                if let Some(k) = value.as_keyword() {
                    self.flex_direction = match k {
                        "row-reverse" => FlexDirection::RowReverse,
                        "column" => FlexDirection::Column,
                        "column-reverse" => FlexDirection::ColumnReverse,
                        _ => FlexDirection::Row,
                    };
                }
            }
            "flex-wrap" => {
                if let Some(k) = value.as_keyword() {
                    self.flex_wrap = match k {
                        "wrap" => FlexWrap::Wrap,
                        "wrap-reverse" => FlexWrap::WrapReverse,
                        _ => FlexWrap::NoWrap,
                    };
                }
            }
            "flex-grow" => {
                if let CssValue::Number(n) = value {
                    self.flex_grow = (*n).max(0.0) as f32;
                }
            }
            "flex-basis" => {
                if let Some(l) = value.as_length() {
                    self.flex_basis = l;
                }
            }
            // `flex: <grow> [<shrink>] [<basis>]` — shrink is parsed and
            // ignored (this engine does not shrink).
            "flex" => {
                let mut components = value.components();
                if let Some(CssValue::Number(grow)) = components.next() {
                    self.flex_grow = (*grow).max(0.0) as f32;
                }
                let rest: Vec<&CssValue> = components.collect();
                if let Some(basis) = rest.iter().rev().find_map(|c| c.as_length()) {
                    self.flex_basis = basis;
                }
            }
            "justify-content" => {
                if let Some(k) = value.as_keyword() {
                    self.justify_content = match k {
                        "flex-end" | "end" => JustifyContent::FlexEnd,
                        "center" => JustifyContent::Center,
                        "space-between" => JustifyContent::SpaceBetween,
                        "space-around" => JustifyContent::SpaceAround,
                        "space-evenly" => JustifyContent::SpaceEvenly,
                        _ => JustifyContent::FlexStart,
                    };
                }
            }
            "align-items" => {
                if let Some(k) = value.as_keyword() {
                    self.align_items = match k {
                        "flex-end" | "end" => AlignItems::FlexEnd,
                        "center" => AlignItems::Center,
                        "baseline" => AlignItems::Baseline,
                        "stretch" => AlignItems::Stretch,
                        _ => AlignItems::FlexStart,
                    };
                }
            }
            "gap" | "column-gap" => {
                if let Some(l) = value.components().find_map(CssValue::as_length) {
                    self.gap = l;
                }
            }
            "list-style" | "list-style-type" => {
                if let Some(k) = value.components().find_map(CssValue::as_keyword) {
                    self.list_style = match k {
                        "none" => ListStyleType::None,
                        "decimal" => ListStyleType::Decimal,
                        // disc, circle, square all render as a bullet.
                        _ => ListStyleType::Disc,
                    };
                }
            }
            "box-sizing" => {
                if let Some(k) = value.as_keyword() {
                    self.box_sizing = match k {
                        "border-box" => BoxSizing::BorderBox,
                        _ => BoxSizing::ContentBox,
                    };
                }
            }
            // Properties the engine knows it does not support get a single
            // warning; everything else is silently CSS from the future.
            "font-size" | "font-family" | "line-height" | "border" | "border-radius"
            | "height" | "min-height" | "max-height" | "float" | "overflow" | "opacity" => {}
            other => {
                warn_once("CSS", &format!("unsupported property '{other}' dropped"));
            }
        }
    }
}

/// [CSS Box Model § margin shorthand](https://www.w3.org/TR/css-box-4/#margin-shorthand)
///
/// "If there is only one component value, it applies to all sides. If
/// there are two values, the top and bottom... are set to the first value
/// and the left and right... to the second. If there are three... If
/// there are four..."
fn apply_shorthand(edges: &mut [Length; 4], value: &CssValue) {
    let components: Vec<Length> = value.components().filter_map(CssValue::as_length).collect();
    let [top, right, bottom, left] = match components.as_slice() {
        [all] => [*all; 4],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left, ..] => [*top, *right, *bottom, *left],
        [] => return,
    };
    edges[EDGE_TOP] = top;
    edges[EDGE_RIGHT] = right;
    edges[EDGE_BOTTOM] = bottom;
    edges[EDGE_LEFT] = left;
}

fn apply_edge(edges: &mut [Length; 4], edge: usize, value: &CssValue) {
    if let Some(l) = value.as_length() {
        edges[edge] = l;
    }
}

fn parse_display(value: &CssValue) -> Option<Display> {
    Some(match value.as_keyword()? {
        "none" => Display::None,
        "inline" => Display::Inline,
        "block" => Display::Block,
        "inline-block" => Display::InlineBlock,
        "list-item" => Display::ListItem,
        "flex" => Display::Flex,
        "inline-flex" => Display::InlineFlex,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;

    fn style_of(css: &str) -> ComputedStyle {
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let decls = parser.parse_declaration_list();
        let mut style = ComputedStyle::default();
        for d in &decls {
            style.apply_declaration(d);
        }
        style
    }

    #[test]
    fn test_margin_shorthand_expansion() {
        let s = style_of("margin: 8px 16px");
        assert_eq!(s.margin[EDGE_TOP], Length::Px(8));
        assert_eq!(s.margin[EDGE_RIGHT], Length::Px(16));
        assert_eq!(s.margin[EDGE_BOTTOM], Length::Px(8));
        assert_eq!(s.margin[EDGE_LEFT], Length::Px(16));
    }

    #[test]
    fn test_margin_auto() {
        let s = style_of("margin: 0 auto");
        assert_eq!(s.margin[EDGE_LEFT], Length::Auto);
        assert_eq!(s.margin[EDGE_RIGHT], Length::Auto);
        assert_eq!(s.margin[EDGE_TOP], Length::Px(0));
    }

    #[test]
    fn test_display_values() {
        assert_eq!(style_of("display: none").display, Display::None);
        assert_eq!(style_of("display: flex").display, Display::Flex);
        assert_eq!(style_of("display: list-item").display, Display::ListItem);
    }

    #[test]
    fn test_colors() {
        assert_eq!(
            style_of("color: #ff0000").color,
            Some(CssColor::rgb(255, 0, 0))
        );
        assert_eq!(
            style_of("color: green").color,
            Some(CssColor::rgb(0, 0x80, 0))
        );
        assert_eq!(
            style_of("background: #333 url(x.png)").background_color,
            Some(CssColor::rgb(0x33, 0x33, 0x33))
        );
    }

    #[test]
    fn test_numeric_font_weight() {
        assert_eq!(style_of("font-weight: 700").font_weight, FontWeight::Bold);
        assert_eq!(style_of("font-weight: 400").font_weight, FontWeight::Normal);
    }

    #[test]
    fn test_flex_shorthand() {
        let s = style_of("flex: 2 1 10px");
        assert_eq!(s.flex_grow, 2.0);
        assert_eq!(s.flex_basis, Length::Px(10));
    }

    #[test]
    fn test_inheritance_set() {
        let parent = ComputedStyle {
            color: Some(CssColor::rgb(1, 2, 3)),
            font_weight: FontWeight::Bold,
            background_color: Some(CssColor::rgb(9, 9, 9)),
            display: Display::Block,
            ..ComputedStyle::default()
        };

        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.color, Some(CssColor::rgb(1, 2, 3)));
        assert_eq!(child.font_weight, FontWeight::Bold);
        // Non-inherited properties reset.
        assert_eq!(child.background_color, None);
        assert_eq!(child.display, Display::Inline);
    }
}
