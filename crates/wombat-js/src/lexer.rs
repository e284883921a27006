//! JavaScript lexer.
//!
//! Hand-rolled scanner producing position-tagged tokens. Line and block
//! comments are skipped; string escapes are decoded here so the parser
//! only sees finished literals.

use crate::error::JsError;
use crate::token::{keyword, Token, TokenKind};

/// The lexer. Feed the full source; [`tokenize`](Lexer::tokenize) yields
/// the token list terminated by `Eof`.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    /// Create a lexer over the given source.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the whole input.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` for unterminated strings or characters the
    /// grammar has no token for.
    pub fn tokenize(mut self) -> Result<Vec<Token>, JsError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    lexeme: String::new(),
                    line,
                    column,
                });
                return Ok(tokens);
            };

            let kind = if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
                self.scan_number()?
            } else if c == '"' || c == '\'' {
                self.scan_string(c)?
            } else if is_ident_start(c) {
                self.scan_identifier()
            } else {
                self.scan_operator()?
            };

            let lexeme = self.lexeme_since(line, column, &kind);
            tokens.push(Token {
                kind,
                lexeme,
                line,
                column,
            });
        }
    }

    fn lexeme_since(&self, _line: u32, _column: u32, kind: &TokenKind) -> String {
        // The decoded value is more useful than raw source for literals;
        // for operators the canonical spelling suffices.
        match kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Str(s) => s.clone(),
            TokenKind::Number(n) => format!("{n}"),
            other => format!("{other:?}"),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    let _ = self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        let _ = self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let _ = self.advance();
                    let _ = self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                let _ = self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => break,
                        }
                    }
                }
                _ => return,
            }
        }
    }

    /// Numeric literal with optional fraction and exponent.
    fn scan_number(&mut self) -> Result<TokenKind, JsError> {
        let mut repr = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            repr.push(self.advance().unwrap_or('0'));
        }
        // Fraction (also covers the leading-dot form `.5`).
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            repr.push(self.advance().unwrap_or('.'));
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                repr.push(self.advance().unwrap_or('0'));
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign_len = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign_len).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..=sign_len {
                    repr.push(self.advance().unwrap_or('e'));
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    repr.push(self.advance().unwrap_or('0'));
                }
            }
        }
        repr.parse()
            .map(TokenKind::Number)
            .map_err(|_| JsError::syntax_error(format!("invalid number literal '{repr}'")).at_line(self.line))
    }

    /// String literal with the standard escapes.
    fn scan_string(&mut self, quote: char) -> Result<TokenKind, JsError> {
        let start_line = self.line;
        let _ = self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(
                        JsError::syntax_error("unterminated string literal").at_line(start_line)
                    );
                }
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some('\'') => value.push('\''),
                    Some('0') => value.push('\0'),
                    Some('\n') => {} // line continuation
                    Some(other) => value.push(other),
                    None => {
                        return Err(
                            JsError::syntax_error("unterminated string literal").at_line(start_line)
                        );
                    }
                },
                Some('\n') => {
                    return Err(
                        JsError::syntax_error("unterminated string literal").at_line(start_line)
                    );
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let mut name = String::new();
        while self.peek().is_some_and(is_ident_continue) {
            name.push(self.advance().unwrap_or('_'));
        }
        keyword(&name).unwrap_or(TokenKind::Identifier(name))
    }

    fn scan_operator(&mut self) -> Result<TokenKind, JsError> {
        let line = self.line;
        let c = self.advance().unwrap_or('\0');
        Ok(match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '%' => TokenKind::Percent,
            '?' => {
                if self.matches('?') {
                    TokenKind::QuestionQuestion
                } else {
                    TokenKind::Question
                }
            }
            '+' => {
                if self.matches('+') {
                    TokenKind::PlusPlus
                } else if self.matches('=') {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.matches('-') {
                    TokenKind::MinusMinus
                } else if self.matches('=') {
                    TokenKind::MinusAssign
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.matches('=') {
                    TokenKind::StarAssign
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.matches('=') {
                    TokenKind::SlashAssign
                } else {
                    TokenKind::Slash
                }
            }
            '=' => {
                if self.matches('=') {
                    if self.matches('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.matches('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.matches('=') {
                    if self.matches('=') {
                        TokenKind::NotEqEq
                    } else {
                        TokenKind::NotEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.matches('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.matches('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.matches('&') {
                    TokenKind::AndAnd
                } else {
                    return Err(
                        JsError::syntax_error("bitwise '&' is not supported").at_line(line)
                    );
                }
            }
            '|' => {
                if self.matches('|') {
                    TokenKind::OrOr
                } else {
                    return Err(
                        JsError::syntax_error("bitwise '|' is not supported").at_line(line)
                    );
                }
            }
            other => {
                return Err(
                    JsError::syntax_error(format!("unexpected character '{other}'")).at_line(line)
                );
            }
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Number(42.0), TokenKind::Eof]);
        assert_eq!(kinds("3.25"), vec![TokenKind::Number(3.25), TokenKind::Eof]);
        assert_eq!(kinds("1e3"), vec![TokenKind::Number(1000.0), TokenKind::Eof]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5), TokenKind::Eof]);
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\nb""#),
            vec![TokenKind::Str("a\nb".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds(r"'it\'s'"),
            vec![TokenKind::Str("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            kinds("let letter"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier("letter".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("a === b !== c => d ?? e"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::EqEqEq,
                TokenKind::Identifier("b".to_string()),
                TokenKind::NotEqEq,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Arrow,
                TokenKind::Identifier("d".to_string()),
                TokenKind::QuestionQuestion,
                TokenKind::Identifier("e".to_string()),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("i++ + ++j"),
            vec![
                TokenKind::Identifier("i".to_string()),
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::Identifier("j".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("a // line\n/* block\nstill */ b"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("a\n  b").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }

    #[test]
    fn test_unterminated_string_is_syntax_error() {
        assert!(Lexer::new("\"oops").tokenize().is_err());
    }
}
