//! Computed style representation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).

mod computed;
/// CSS value types (colors, lengths, keyword enums).
pub mod values;

pub use computed::{ComputedStyle, EDGE_BOTTOM, EDGE_LEFT, EDGE_RIGHT, EDGE_TOP};
pub use values::{
    AlignItems, BoxSizing, CssColor, Display, FlexDirection, FlexWrap, FontStyle, FontWeight,
    JustifyContent, Length, ListStyleType, Position, TextAlign, TextDecoration, WhiteSpace,
};
