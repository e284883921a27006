//! CSS tokenizer.
//!
//! [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
//!
//! A pragmatic rendition of the CSS Syntax Level 3 tokenizer: identifiers
//! match `[A-Za-z_-][A-Za-z0-9_-]*`, numbers allow a leading sign, decimal
//! point and exponent, strings honor backslash escapes, and `/* … */`
//! comments are skipped. `url()` tokens and CDO/CDC are not produced.

use super::token::CssToken;

/// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
///
/// CSS tokenizer over a character vector with a cursor, following the CSS
/// Syntax Module Level 3 consumption algorithms.
pub struct CssTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<CssToken>,
}

impl CssTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// "This section describes how to consume a token from a stream of
    /// code points. It will return a single token of any type."
    ///
    /// Runs to completion; the token stream always ends with
    /// [`CssToken::Eof`]. The cursor only moves forward, so termination is
    /// structural.
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CssToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[CssToken] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CssToken {
        // "Consume comments."
        self.consume_comments();

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return CssToken::Eof;
        };

        match c {
            // "whitespace: Consume as much whitespace as possible. Return
            // a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CssToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (\"): Consume a string token."
            '"' => self.consume_string_token('"'),
            '\'' => self.consume_string_token('\''),

            // "U+0023 NUMBER SIGN (#): If the next input code point is an
            // ident code point... Consume an ident sequence, and set the
            // <hash-token>'s value to the returned string."
            '#' => {
                if self.peek().is_some_and(is_ident_code_point) {
                    CssToken::Hash(self.consume_ident_sequence())
                } else {
                    CssToken::Delim('#')
                }
            }

            '(' => CssToken::LeftParen,
            ')' => CssToken::RightParen,
            '[' => CssToken::LeftBracket,
            ']' => CssToken::RightBracket,
            '{' => CssToken::LeftBrace,
            '}' => CssToken::RightBrace,
            ',' => CssToken::Comma,
            ':' => CssToken::Colon,
            ';' => CssToken::Semicolon,

            // "U+002B PLUS SIGN (+): If the input stream starts with a
            // number, reconsume... consume a numeric token."
            '+' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('+')
                }
            }

            // "U+002D HYPHEN-MINUS (-): numbers first, then idents."
            '-' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek().is_some_and(is_ident_code_point) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CssToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.): If the input stream starts with a
            // number..."
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('.')
                }
            }

            // "U+0040 COMMERCIAL AT (@): If the next input code points
            // would start an ident sequence... create an
            // <at-keyword-token>."
            '@' => {
                if self.peek().is_some_and(is_ident_start_code_point) {
                    CssToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CssToken::Delim('@')
                }
            }

            // "digit: Reconsume... Consume a numeric token."
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point: Reconsume... Consume an ident-like
            // token."
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else: Return a <delim-token>."
            c => CssToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "Consume them and all following code points up to and including the
    /// first U+002A ASTERISK (*) followed by U+002F SOLIDUS (/), or up to
    /// an EOF code point."
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let _ = self.consume(); // /
            let _ = self.consume(); // *
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => break, // EOF
                }
            }
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char) -> CssToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                // "ending code point: Return the <string-token>."
                Some(c) if c == ending => return CssToken::String(value),
                // "EOF: This is a parse error. Return the <string-token>."
                None => return CssToken::String(value),
                // "newline: This is a parse error." Recover by ending the
                // string at the newline.
                Some('\n') => {
                    self.reconsume();
                    return CssToken::String(value);
                }
                // "U+005C REVERSE SOLIDUS (\\)"
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => {
                        if let Some(c) = self.consume_escaped_code_point() {
                            value.push(c);
                        }
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CssToken {
        let value = self.consume_number();

        // "If the next input code points would start an ident sequence,
        // create a <dimension-token>."
        if self.peek().is_some_and(is_ident_start_code_point) {
            let unit = self.consume_ident_sequence();
            CssToken::Dimension(value, unit)
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            CssToken::Percentage(value)
        } else {
            CssToken::Number(value)
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CssToken {
        let string = self.consume_ident_sequence();

        // "If the next input code point is U+0028 LEFT PARENTHESIS ((),
        // consume it. Return a <function-token>."
        if self.peek() == Some('(') {
            let _ = self.consume();
            CssToken::Function(string)
        } else {
            CssToken::Ident(string)
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if self.peek().is_some() && self.peek() != Some('\n') => {
                    if let Some(c) = self.consume_escaped_code_point() {
                        result.push(c);
                    }
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> f64 {
        let mut repr = String::new();

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D
        // HYPHEN-MINUS (-), consume it and append it to repr."
        if matches!(self.peek(), Some('+' | '-')) {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
        }

        // "If the next 2 input code points are U+002E FULL STOP (.)
        // followed by a digit, consume them."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            repr.push(self.consume().unwrap_or('.'));
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                if let Some(c) = self.consume() {
                    repr.push(c);
                }
            }
        }

        // Optional exponent: e or E, optional sign, digits.
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign_offset = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self
                .peek_at(1 + sign_offset)
                .is_some_and(|c| c.is_ascii_digit())
            {
                for _ in 0..=sign_offset {
                    if let Some(c) = self.consume() {
                        repr.push(c);
                    }
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    if let Some(c) = self.consume() {
                        repr.push(c);
                    }
                }
            }
        }

        // "Convert repr to a number."
        repr.parse().unwrap_or(0.0)
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> Option<char> {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more
                // than 5."
                for _ in 0..5 {
                    if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        if let Some(c) = self.consume() {
                            hex.push(c);
                        }
                    } else {
                        break;
                    }
                }
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                // "If this number is zero, or is for a surrogate, or is
                // greater than the maximum allowed code point, return
                // U+FFFD."
                if code_point == 0
                    || (0xD800..=0xDFFF).contains(&code_point)
                    || code_point > 0x0010_FFFF
                {
                    Some('\u{FFFD}')
                } else {
                    char::from_u32(code_point)
                }
            }
            // "EOF: This is a parse error. Return U+FFFD."
            None => Some('\u{FFFD}'),
            // "anything else: Return the current input code point."
            Some(c) => Some(c),
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// Called with the sign character already consumed (cursor after it)
    /// or with the cursor before a digit/dot.
    fn would_start_number(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 Definitions — whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// Ident-start: `[A-Za-z_-]` per the engine's pragmatic grammar.
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

/// Ident body: `[A-Za-z0-9_-]` (plus non-ASCII).
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit()
}
