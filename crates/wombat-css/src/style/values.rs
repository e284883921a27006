//! CSS value types.
//!
//! [CSS Values and Units Module Level 4](https://www.w3.org/TR/css-values-4/)

use serde::Serialize;

/// An sRGB color value.
///
/// [CSS Color Module Level 4 § 4](https://www.w3.org/TR/css-color-4/#numeric-srgb)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CssColor {
    /// Red channel, 0–255.
    pub r: u8,
    /// Green channel, 0–255.
    pub g: u8,
    /// Blue channel, 0–255.
    pub b: u8,
}

impl CssColor {
    /// Create a color from channel values.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// Parse `rgb`, `rrggbb`, or `rrggbbaa` hex digits (no leading `#`).
    /// The alpha digits of the 8-digit form are accepted and discarded.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        match hex.len() {
            3 => {
                let mut it = hex.chars();
                let r = it.next()?.to_digit(16)? as u8;
                let g = it.next()?.to_digit(16)? as u8;
                let b = it.next()?.to_digit(16)? as u8;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// [§ 6.1 Named colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The CSS named colors the engine recognizes (a pragmatic subset of
    /// the full X11 list).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "black" => (0x00, 0x00, 0x00),
            "silver" => (0xc0, 0xc0, 0xc0),
            "gray" | "grey" => (0x80, 0x80, 0x80),
            "white" => (0xff, 0xff, 0xff),
            "maroon" => (0x80, 0x00, 0x00),
            "red" => (0xff, 0x00, 0x00),
            "purple" => (0x80, 0x00, 0x80),
            "fuchsia" | "magenta" => (0xff, 0x00, 0xff),
            "green" => (0x00, 0x80, 0x00),
            "lime" => (0x00, 0xff, 0x00),
            "olive" => (0x80, 0x80, 0x00),
            "yellow" => (0xff, 0xff, 0x00),
            "navy" => (0x00, 0x00, 0x80),
            "blue" => (0x00, 0x00, 0xff),
            "teal" => (0x00, 0x80, 0x80),
            "aqua" | "cyan" => (0x00, 0xff, 0xff),
            "orange" => (0xff, 0xa5, 0x00),
            "brown" => (0xa5, 0x2a, 0x2a),
            "pink" => (0xff, 0xc0, 0xcb),
            "gold" => (0xff, 0xd7, 0x00),
            "indigo" => (0x4b, 0x00, 0x82),
            "violet" => (0xee, 0x82, 0xee),
            "coral" => (0xff, 0x7f, 0x50),
            "salmon" => (0xfa, 0x80, 0x72),
            "khaki" => (0xf0, 0xe6, 0x8c),
            "crimson" => (0xdc, 0x14, 0x3c),
            "lavender" => (0xe6, 0xe6, 0xfa)
,
            "beige" => (0xf5, 0xf5, 0xdc),
            "ivory" => (0xff, 0xff, 0xf0),
            "tomato" => (0xff, 0x63, 0x47),
            "orchid" => (0xda, 0x70, 0xd6),
            "plum" => (0xdd, 0xa0, 0xdd),
            "tan" => (0xd2, 0xb4, 0x8c),
            "sienna" => (0xa0, 0x52, 0x2d),
            "turquoise" => (0x40, 0xe0, 0xd0),
            "skyblue" => (0x87, 0xce, 0xeb),
            "steelblue" => (0x46, 0x82, 0xb4),
            "royalblue" => (0x41, 0x69, 0xe1),
            "darkblue" => (0x00, 0x00, 0x8b),
            "darkgreen" => (0x00, 0x64, 0x00),
            "darkred" => (0x8b, 0x00, 0x00),
            "darkgray" | "darkgrey" => (0xa9, 0xa9, 0xa9),
            "lightgray" | "lightgrey" => (0xd3, 0xd3, 0xd3),
            "lightblue" => (0xad, 0xd8, 0xe6),
            "lightgreen" => (0x90, 0xee, 0x90),
            "lightyellow" => (0xff, 0xff, 0xe0),
            "whitesmoke" => (0xf5, 0xf5, 0xf5),
            "dimgray" | "dimgrey" => (0x69, 0x69, 0x69),
            "slategray" | "slategrey" => (0x70, 0x80, 0x90),
            "rebeccapurple" => (0x66, 0x33, 0x99),
            "transparent" => return None,
            _ => return None,
        };
        Some(Self::rgb(r, g, b))
    }
}

/// A CSS length.
///
/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Lengths resolve to character cells at layout time; see
/// `layout::values` for the px/em → cell ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Length {
    /// An absolute pixel count.
    Px(i32),
    /// A font-relative length (multiples of the em square).
    Em(f32),
    /// A percentage of the containing dimension.
    Percent(f32),
    /// The `auto` keyword (also the "not set" value for width/min/max).
    Auto,
}

impl Length {
    /// Whether this is the `auto` keyword.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Auto
    }
}

/// [CSS Display Module Level 3 § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The display values the engine lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Display {
    /// `display: none` — generates no box.
    None,
    /// `display: inline`
    Inline,
    /// `display: block`
    Block,
    /// `display: inline-block`
    InlineBlock,
    /// `display: list-item` — block box with a marker.
    ListItem,
    /// `display: flex`
    Flex,
    /// `display: inline-flex`
    InlineFlex,
}

impl Display {
    /// Whether the value produces a block-level box.
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(self, Self::Block | Self::ListItem | Self::Flex)
    }

    /// Whether the value establishes a flex formatting context.
    #[must_use]
    pub const fn is_flex(self) -> bool {
        matches!(self, Self::Flex | Self::InlineFlex)
    }
}

/// [CSS Positioned Layout Level 3 § 3](https://www.w3.org/TR/css-position-3/#position-property)
///
/// Parsed but not laid out: positioned layout is out of scope, so every
/// box flows normally regardless of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// `position: relative` (treated as static).
    Relative,
    /// `position: absolute` (treated as static).
    Absolute,
    /// `position: fixed` (treated as static).
    Fixed,
}

/// [CSS Fonts Level 4 § 3.2](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontWeight {
    /// Normal weight.
    #[default]
    Normal,
    /// Bold (keyword `bold` or numeric weight ≥ 600).
    Bold,
}

/// [CSS Fonts Level 4 § 3.4](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic or oblique.
    Italic,
}

/// [CSS Text Level 3 § 6.1](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextAlign {
    /// Left-aligned (the initial value for left-to-right text).
    #[default]
    Left,
    /// Right-aligned.
    Right,
    /// Centered.
    Center,
    /// Justified — falls back to left in this engine.
    Justify,
}

/// [CSS Text Decoration Level 3 § 2](https://www.w3.org/TR/css-text-decor-3/#text-decoration-line-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextDecoration {
    /// No decoration.
    #[default]
    None,
    /// Underline.
    Underline,
    /// Line-through (rendered as reverse video on terminals without
    /// strikethrough support).
    LineThrough,
}

/// [CSS Text Level 3 § 3](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WhiteSpace {
    /// Collapse whitespace, wrap lines.
    #[default]
    Normal,
    /// Preserve whitespace and newlines, no wrapping.
    Pre,
}

/// [CSS Flexbox Level 1 § 5.1](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlexDirection {
    /// Horizontal, source order.
    #[default]
    Row,
    /// Horizontal, reversed.
    RowReverse,
    /// Vertical, source order.
    Column,
    /// Vertical, reversed.
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether the child sequence is reversed.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// [CSS Flexbox Level 1 § 5.2](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlexWrap {
    /// Single line.
    #[default]
    NoWrap,
    /// Multi-line.
    Wrap,
    /// Multi-line, reversed cross axis (treated as `wrap`).
    WrapReverse,
}

/// [CSS Flexbox Level 1 § 8.2](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JustifyContent {
    /// Pack toward the main start.
    #[default]
    FlexStart,
    /// Pack toward the main end.
    FlexEnd,
    /// Center on the line.
    Center,
    /// Even distribution, no end gaps.
    SpaceBetween,
    /// Even distribution, half-size end gaps.
    SpaceAround,
    /// Even distribution, full-size end gaps.
    SpaceEvenly,
}

/// [CSS Flexbox Level 1 § 8.3](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
///
/// `baseline` and `stretch` are treated as `flex-start` in this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlignItems {
    /// Cross-start alignment.
    #[default]
    FlexStart,
    /// Cross-end alignment.
    FlexEnd,
    /// Centered on the cross axis.
    Center,
    /// Baseline alignment (treated as flex-start).
    Baseline,
    /// Stretch to fill (treated as flex-start).
    Stretch,
}

/// [CSS Lists Level 3 § 3](https://www.w3.org/TR/css-lists-3/#text-markers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ListStyleType {
    /// Bullet marker.
    #[default]
    Disc,
    /// 1-based decimal numbering.
    Decimal,
    /// No marker.
    None,
}

/// [CSS Box Sizing Level 3 § 3](https://www.w3.org/TR/css-sizing-3/#box-sizing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BoxSizing {
    /// `width` sets the content box.
    #[default]
    ContentBox,
    /// `width` sets the border box (content = width − padding here, since
    /// borders have no cell width in this engine).
    BorderBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(CssColor::from_hex("fff"), Some(CssColor::rgb(255, 255, 255)));
        assert_eq!(CssColor::from_hex("2563eb"), Some(CssColor::rgb(0x25, 0x63, 0xeb)));
        assert_eq!(CssColor::from_hex("11223344"), Some(CssColor::rgb(0x11, 0x22, 0x33)));
        assert_eq!(CssColor::from_hex("xyz"), None);
        assert_eq!(CssColor::from_hex("12345"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(CssColor::from_name("RED"), Some(CssColor::rgb(255, 0, 0)));
        assert_eq!(CssColor::from_name("rebeccapurple"), Some(CssColor::rgb(0x66, 0x33, 0x99)));
        assert_eq!(CssColor::from_name("notacolor"), None);
    }
}
