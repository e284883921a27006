//! The built-in user-agent stylesheet.
//!
//! [HTML Standard § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "The suggested default rendering... is expected to be achievable with
//! a user agent style sheet." Author stylesheets are resolved after this
//! one, so they win every tie.

use crate::parser::{CssParser, Stylesheet};
use crate::tokenizer::CssTokenizer;

/// Default styles applied below all author rules.
///
/// Lengths are tuned for the cell grid: 1em is two columns / one row, so
/// `margin: 1em 0` is one blank row above and below.
const UA_CSS: &str = r"
head, script, style, title, meta, link, base, noscript, template { display: none; }
html, body, div, p, h1, h2, h3, h4, h5, h6,
ul, ol, li, blockquote, pre, hr, address, article, aside, footer,
header, main, nav, section, form, fieldset, figure, figcaption, dl, dt, dd {
    display: block;
}
li { display: list-item; }
p, blockquote, ul, ol, pre, h1, h2, h3, h4, h5, h6 { margin: 1em 0; }
h1, h2, h3, h4, h5, h6 { font-weight: bold; }
b, strong { font-weight: bold; }
i, em, cite, var { font-style: italic; }
u, ins { text-decoration: underline; }
s, del, strike { text-decoration: line-through; }
a { color: #5fafff; text-decoration: underline; }
blockquote { padding-left: 2em; }
ul, ol { padding-left: 2em; }
ol li { list-style-type: decimal; }
pre { white-space: pre; }
center { text-align: center; }
hr { margin: 1em 0; }
dd { padding-left: 2em; }
table, thead, tbody, tfoot, tr, td, th { display: block; }
th { font-weight: bold; }
mark { background-color: #ffff87; color: #000000; }
";

/// Parse the user-agent stylesheet.
#[must_use]
pub fn ua_stylesheet() -> Stylesheet {
    let mut tokenizer = CssTokenizer::new(UA_CSS);
    tokenizer.run();
    let mut parser = CssParser::new(tokenizer.into_tokens());
    parser.parse_stylesheet()
}

#[cfg(test)]
mod tests {
    use super::ua_stylesheet;

    #[test]
    fn test_ua_stylesheet_parses() {
        let sheet = ua_stylesheet();
        // Every rule in the sheet must survive parsing.
        assert!(sheet.rules.len() >= 15, "UA sheet lost rules in parsing");
    }
}
