//! HTML tokenizer state machine.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "Implementations must act as if they used the following state machine to
//! tokenize HTML."
//!
//! This is a pragmatic subset of the WHATWG machine: the data, tag,
//! attribute, comment, doctype, raw-text, and character-reference state
//! families. Script-escape and CDATA states are not implemented; `<script>`
//! and `<style>` bodies are consumed in the raw-text states and surfaced
//! verbatim as character data.
//!
//! Malformed input never fails: the tokenizer always terminates (a work
//! bound plus a wall-clock deadline guarantee this even on adversarial
//! input) and always ends the stream with [`Token::EndOfFile`].

use std::time::{Duration, Instant};

use strum_macros::Display;

use super::entities::lookup_entity;
use super::token::{Attribute, Token};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in
/// § 13.2.5. The numeric-character-reference-end state of the spec is
/// folded into a helper since it never consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// Simplified: everything up to `>` is buffered and quoted public /
    /// system identifiers are extracted from the buffer.
    AfterDoctypeName,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Entered after a `<script>` or `<style>` start tag; no character
    /// references are decoded here.
    RawText,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RawTextLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RawTextEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RawTextEndTagName,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
}

/// Wall-clock deadline for a single tokenizer run.
const DEADLINE: Duration = Duration::from_secs(2);

/// Tags whose content is consumed as raw text (no nested markup, no
/// character references). Scripts go to the JS engine verbatim; style
/// bodies go to the CSS tokenizer verbatim.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The HTML tokenizer. Feed it the full input up front; [`run`](Self::run)
/// drives the state machine to completion and
/// [`into_tokens`](Self::into_tokens) yields the finite token stream,
/// always terminated by [`Token::EndOfFile`].
pub struct HtmlTokenizer {
    state: TokenizerState,
    return_state: Option<TokenizerState>,
    input: Vec<char>,
    pos: usize,
    current_char: Option<char>,
    // When true, the next loop iteration will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    done: bool,
    tokens: Vec<Token>,

    /// Pending coalesced character data, flushed before any non-character
    /// token is emitted.
    char_buffer: String,
    current_token: Option<Token>,
    current_attr: Option<Attribute>,

    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    /// Temporary buffer for raw-text end tag detection and doctype
    /// identifier capture.
    temp_buffer: String,
    char_ref_code: u32,

    /// "The last start tag token emitted" — used by the raw-text end tag
    /// states to decide whether an end tag is appropriate.
    last_start_tag_name: Option<String>,

    steps: usize,
    max_steps: usize,
    deadline: Instant,
}

impl HtmlTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// The work bound is `max(200_000, 5 * input_len)` state steps; the
    /// wall-clock deadline is ~2 seconds. Hitting either flushes buffered
    /// character data and emits `EndOfFile`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let max_steps = 200_000.max(input.len().saturating_mul(5));
        Self {
            state: TokenizerState::Data,
            return_state: None,
            input,
            pos: 0,
            current_char: None,
            reconsume: false,
            done: false,
            tokens: Vec::new(),
            char_buffer: String::new(),
            current_token: None,
            current_attr: None,
            temp_buffer: String::new(),
            char_ref_code: 0,
            last_start_tag_name: None,
            steps: 0,
            max_steps,
            deadline: Instant::now() + DEADLINE,
        }
    }

    /// Drive the state machine until the end-of-file token is emitted.
    pub fn run(&mut self) {
        while !self.done {
            self.steps += 1;
            if self.steps > self.max_steps
                || (self.steps % 1024 == 0 && Instant::now() > self.deadline)
            {
                // Work bound hit: degrade to best effort and terminate.
                self.emit_eof();
                break;
            }

            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_char = self.advance();
            }

            match self.state {
                TokenizerState::Data => self.handle_data(),
                TokenizerState::TagOpen => self.handle_tag_open(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open(),
                TokenizerState::TagName => self.handle_tag_name(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name(),
                TokenizerState::AttributeName => self.handle_attribute_name(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted('\'');
                }
                TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted(),
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag(),
                TokenizerState::BogusComment => self.handle_bogus_comment(),
                TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open(),
                TokenizerState::CommentStart => self.handle_comment_start(),
                TokenizerState::CommentStartDash => self.handle_comment_start_dash(),
                TokenizerState::Comment => self.handle_comment(),
                TokenizerState::CommentEndDash => self.handle_comment_end_dash(),
                TokenizerState::CommentEnd => self.handle_comment_end(),
                TokenizerState::Doctype => self.handle_doctype(),
                TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name(),
                TokenizerState::DoctypeName => self.handle_doctype_name(),
                TokenizerState::AfterDoctypeName => self.handle_after_doctype_name(),
                TokenizerState::RawText => self.handle_raw_text(),
                TokenizerState::RawTextLessThanSign => self.handle_raw_text_less_than_sign(),
                TokenizerState::RawTextEndTagOpen => self.handle_raw_text_end_tag_open(),
                TokenizerState::RawTextEndTagName => self.handle_raw_text_end_tag_name(),
                TokenizerState::CharacterReference => self.handle_character_reference(),
                TokenizerState::NamedCharacterReference => self.handle_named_character_reference(),
                TokenizerState::NumericCharacterReference => {
                    self.handle_numeric_character_reference();
                }
                TokenizerState::HexCharacterReferenceStart => {
                    self.handle_hex_character_reference_start();
                }
                TokenizerState::DecimalCharacterReferenceStart => {
                    self.handle_decimal_character_reference_start();
                }
                TokenizerState::HexCharacterReference => self.handle_hex_character_reference(),
                TokenizerState::DecimalCharacterReference => {
                    self.handle_decimal_character_reference();
                }
            }
        }
    }

    /// Consume the tokenizer and return the token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The collected tokens so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume = true;
        self.state = state;
    }

    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }

    // ------------------------------------------------------------------
    // Emission helpers
    // ------------------------------------------------------------------

    fn flush_char_buffer(&mut self) {
        if !self.char_buffer.is_empty() {
            let data = std::mem::take(&mut self.char_buffer);
            self.tokens.push(Token::Character(data));
        }
    }

    fn emit_eof(&mut self) {
        self.flush_char_buffer();
        self.tokens.push(Token::EndOfFile);
        self.done = true;
    }

    fn emit_comment(&mut self) {
        self.flush_char_buffer();
        if let Some(token @ Token::Comment(_)) = self.current_token.take() {
            self.tokens.push(token);
        }
    }

    fn emit_doctype(&mut self) {
        self.flush_char_buffer();
        if let Some(token @ Token::Doctype { .. }) = self.current_token.take() {
            self.tokens.push(token);
        }
    }

    /// Emit the current tag token and pick the next state: raw text after
    /// `<script>`/`<style>` start tags, data otherwise.
    fn emit_tag_and_switch(&mut self) {
        self.finish_attribute();
        self.flush_char_buffer();
        let mut next = TokenizerState::Data;
        if let Some(token) = self.current_token.take() {
            if let Token::StartTag { name, .. } = &token {
                self.last_start_tag_name = Some(name.clone());
                if RAW_TEXT_TAGS.contains(&name.as_str()) {
                    next = TokenizerState::RawText;
                }
            }
            self.tokens.push(token);
        }
        self.switch_to(next);
    }

    /// Move the attribute under construction onto the current start tag.
    ///
    /// "If there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    fn finish_attribute(&mut self) {
        let Some(attr) = self.current_attr.take() else {
            return;
        };
        if let Some(Token::StartTag { attributes, .. }) = &mut self.current_token {
            if attributes.iter().any(|a| a.name == attr.name) {
                return;
            }
            attributes.push(attr);
        }
        // Attributes on end tags are discarded.
    }

    fn start_new_attribute(&mut self) {
        self.finish_attribute();
        self.current_attr = Some(Attribute::new(String::new(), String::new()));
    }

    fn append_to_tag_name(&mut self, c: char) {
        match &mut self.current_token {
            Some(Token::StartTag { name, .. } | Token::EndTag { name }) => {
                name.push(c.to_ascii_lowercase());
            }
            _ => {}
        }
    }

    fn append_to_attr_name(&mut self, c: char) {
        if let Some(attr) = &mut self.current_attr {
            attr.name.push(c.to_ascii_lowercase());
        }
    }

    fn append_to_attr_value(&mut self, c: char) {
        if let Some(attr) = &mut self.current_attr {
            attr.value.push(c);
        }
    }

    fn append_to_comment(&mut self, c: char) {
        if let Some(Token::Comment(data)) = &mut self.current_token {
            data.push(c);
        }
    }

    /// Whether the return state is one of the attribute-value states.
    ///
    /// Decoded character references must be routed to the current
    /// attribute's value in that case, never to the character buffer.
    fn charref_in_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// Emit a decoded (or passed-through) character-reference code point
    /// to the right sink for the return state.
    fn emit_char_ref(&mut self, c: char) {
        if self.charref_in_attribute() {
            self.append_to_attr_value(c);
        } else {
            self.char_buffer.push(c);
        }
    }

    fn emit_char_ref_str(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_char_ref(c);
        }
    }

    fn return_from_char_ref(&mut self) {
        let state = self.return_state.take().unwrap_or(TokenizerState::Data);
        self.switch_to(state);
    }

    fn reconsume_in_return_state(&mut self) {
        let state = self.return_state.take().unwrap_or(TokenizerState::Data);
        self.reconsume_in(state);
    }

    // ------------------------------------------------------------------
    // Data / tag states
    // ------------------------------------------------------------------

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data(&mut self) {
        match self.current_char {
            // "Set the return state to the data state. Switch to the
            // character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::Data);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "This is an unexpected-null-character parse error."
            Some('\0') => self.char_buffer.push('\u{FFFD}'),
            // "Emit an end-of-file token."
            None => self.emit_eof(),
            Some(c) => self.char_buffer.push(c),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open(&mut self) {
        match self.current_char {
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token... Reconsume in the bogus
            // comment state."
            Some('?') => {
                self.current_token = Some(Token::Comment(String::new()));
                self.reconsume_in(TokenizerState::BogusComment);
            }
            None => {
                self.char_buffer.push('<');
                self.emit_eof();
            }
            // "This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token. Reconsume in
            // the data state."
            Some(_) => {
                self.char_buffer.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is a missing-end-tag-name parse error. Switch to the
            // data state."
            Some('>') => self.switch_to(TokenizerState::Data),
            None => {
                self.char_buffer.push('<');
                self.char_buffer.push('/');
                self.emit_eof();
            }
            Some(_) => {
                self.current_token = Some(Token::Comment(String::new()));
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_tag_and_switch(),
            Some('\0') => self.append_to_tag_name('\u{FFFD}'),
            None => self.emit_eof(),
            Some(c) => self.append_to_tag_name(c),
        }
    }

    // ------------------------------------------------------------------
    // Attribute states
    // ------------------------------------------------------------------

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name
            // parse error. Start a new attribute in the current tag token.
            // Set that attribute's name to the current input character."
            Some('=') => {
                self.start_new_attribute();
                self.append_to_attr_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => self.append_to_attr_name('\u{FFFD}'),
            // "This is an unexpected-character-in-attribute-name parse
            // error. Treat it as per the 'anything else' entry below."
            Some(c) => self.append_to_attr_name(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_tag_and_switch(),
            None => self.emit_eof(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error."
            Some('>') => self.emit_tag_and_switch(),
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36/37 Attribute value (quoted) states](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    fn handle_attribute_value_quoted(&mut self, quote: char) {
        let this_state = if quote == '"' {
            TokenizerState::AttributeValueDoubleQuoted
        } else {
            TokenizerState::AttributeValueSingleQuoted
        };
        match self.current_char {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = Some(this_state);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => self.append_to_attr_value('\u{FFFD}'),
            None => self.emit_eof(),
            Some(c) => self.append_to_attr_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                self.return_state = Some(TokenizerState::AttributeValueUnquoted);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => self.emit_tag_and_switch(),
            Some('\0') => self.append_to_attr_value('\u{FFFD}'),
            None => self.emit_eof(),
            Some(c) => self.append_to_attr_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_tag_and_switch(),
            None => self.emit_eof(),
            // "This is a missing-whitespace-between-attributes parse
            // error. Reconsume in the before attribute name state."
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag(&mut self) {
        match self.current_char {
            Some('>') => {
                if let Some(Token::StartTag { self_closing, .. }) = &mut self.current_token {
                    *self_closing = true;
                }
                self.emit_tag_and_switch();
            }
            None => self.emit_eof(),
            // "This is an unexpected-solidus-in-tag parse error."
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    // ------------------------------------------------------------------
    // Comment / doctype states
    // ------------------------------------------------------------------

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment(&mut self) {
        match self.current_char {
            Some('>') => {
                self.emit_comment();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some('\0') => self.append_to_comment('\u{FFFD}'),
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open(&mut self) {
        // "If the next few characters are: Two U+002D HYPHEN-MINUS
        // characters (-) — consume those two characters, create a comment
        // token... switch to the comment start state."
        if self.current_char == Some('-') && self.peek(0) == Some('-') {
            let _ = self.advance();
            self.current_token = Some(Token::Comment(String::new()));
            self.switch_to(TokenizerState::CommentStart);
            return;
        }

        // "ASCII case-insensitive match for the word 'DOCTYPE'"
        if self
            .current_char
            .is_some_and(|c| c.eq_ignore_ascii_case(&'d'))
        {
            let rest = "octype";
            let matches = rest
                .chars()
                .enumerate()
                .all(|(i, expected)| self.peek(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected)));
            if matches {
                for _ in 0..rest.len() {
                    let _ = self.advance();
                }
                self.switch_to(TokenizerState::Doctype);
                return;
            }
        }

        // "This is an incorrectly-opened-comment parse error."
        self.current_token = Some(Token::Comment(String::new()));
        self.reconsume_in(TokenizerState::BogusComment);
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start(&mut self) {
        match self.current_char {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error."
            Some('>') => {
                self.emit_comment();
                self.switch_to(TokenizerState::Data);
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash(&mut self) {
        match self.current_char {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.emit_comment();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment(&mut self) {
        match self.current_char {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => self.append_to_comment('\u{FFFD}'),
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash(&mut self) {
        match self.current_char {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end(&mut self) {
        match self.current_char {
            Some('>') => {
                self.emit_comment();
                self.switch_to(TokenizerState::Data);
            }
            Some('-') => self.append_to_comment('-'),
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.append_to_comment('-');
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            None => {
                self.current_token = Some(Token::new_doctype());
                self.emit_doctype();
                self.emit_eof();
            }
            // "This is a missing-whitespace-before-doctype-name parse
            // error. Reconsume in the before DOCTYPE name state."
            Some(_) => self.reconsume_in(TokenizerState::BeforeDoctypeName),
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {}
            None => {
                self.current_token = Some(Token::new_doctype());
                self.emit_doctype();
                self.emit_eof();
            }
            // "This is a missing-doctype-name parse error."
            Some('>') => {
                self.current_token = Some(Token::new_doctype());
                self.emit_doctype();
                self.switch_to(TokenizerState::Data);
            }
            Some(c) => {
                self.current_token = Some(Token::Doctype {
                    name: Some(c.to_ascii_lowercase().to_string()),
                    public_identifier: None,
                    system_identifier: None,
                });
                self.switch_to(TokenizerState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                self.temp_buffer.clear();
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => {
                self.emit_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                if let Some(Token::Doctype {
                    name: Some(name), ..
                }) = &mut self.current_token
                {
                    name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// Simplified: everything up to `>` is buffered, then the first two
    /// quoted strings (if any) become the public and system identifiers.
    fn handle_after_doctype_name(&mut self) {
        match self.current_char {
            Some('>') => {
                self.extract_doctype_identifiers();
                self.emit_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.extract_doctype_identifiers();
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => self.temp_buffer.push(c),
        }
    }

    fn extract_doctype_identifiers(&mut self) {
        let buffered = std::mem::take(&mut self.temp_buffer);
        let mut quoted: Vec<String> = Vec::new();
        let mut current: Option<(char, String)> = None;
        for c in buffered.chars() {
            match &mut current {
                Some((quote, acc)) => {
                    if c == *quote {
                        quoted.push(std::mem::take(acc));
                        current = None;
                    } else {
                        acc.push(c);
                    }
                }
                None if c == '"' || c == '\'' => current = Some((c, String::new())),
                None => {}
            }
        }
        let has_public = buffered.to_ascii_uppercase().contains("PUBLIC");
        let mut ids = quoted.into_iter();
        if let Some(Token::Doctype {
            public_identifier,
            system_identifier,
            ..
        }) = &mut self.current_token
        {
            if has_public {
                *public_identifier = ids.next();
                *system_identifier = ids.next();
            } else {
                *system_identifier = ids.next();
            }
        }
    }

    // ------------------------------------------------------------------
    // Raw text states (script / style content)
    // ------------------------------------------------------------------

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_raw_text(&mut self) {
        match self.current_char {
            Some('<') => self.switch_to(TokenizerState::RawTextLessThanSign),
            Some('\0') => self.char_buffer.push('\u{FFFD}'),
            None => self.emit_eof(),
            Some(c) => self.char_buffer.push(c),
        }
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_raw_text_less_than_sign(&mut self) {
        match self.current_char {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(TokenizerState::RawTextEndTagOpen);
            }
            _ => {
                self.char_buffer.push('<');
                self.reconsume_in(TokenizerState::RawText);
            }
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn handle_raw_text_end_tag_open(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::RawTextEndTagName);
            }
            _ => {
                self.char_buffer.push('<');
                self.char_buffer.push('/');
                self.reconsume_in(TokenizerState::RawText);
            }
        }
    }

    /// Whether the end tag under construction matches the last emitted
    /// start tag.
    fn is_appropriate_end_tag(&self) -> bool {
        match (&self.current_token, &self.last_start_tag_name) {
            (Some(Token::EndTag { name }), Some(last)) => name == last,
            _ => false,
        }
    }

    fn raw_text_end_tag_anything_else(&mut self) {
        self.current_token = None;
        self.char_buffer.push('<');
        self.char_buffer.push('/');
        let buffered = std::mem::take(&mut self.temp_buffer);
        self.char_buffer.push_str(&buffered);
        self.reconsume_in(TokenizerState::RawText);
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    fn handle_raw_text_end_tag_name(&mut self) {
        match self.current_char {
            Some(c) if Self::is_whitespace(c) => {
                if self.is_appropriate_end_tag() {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                } else {
                    self.raw_text_end_tag_anything_else();
                }
            }
            Some('/') => {
                if self.is_appropriate_end_tag() {
                    self.switch_to(TokenizerState::SelfClosingStartTag);
                } else {
                    self.raw_text_end_tag_anything_else();
                }
            }
            Some('>') => {
                if self.is_appropriate_end_tag() {
                    self.emit_tag_and_switch();
                } else {
                    self.raw_text_end_tag_anything_else();
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c);
                self.temp_buffer.push(c);
            }
            _ => self.raw_text_end_tag_anything_else(),
        }
    }

    // ------------------------------------------------------------------
    // Character reference states
    // ------------------------------------------------------------------

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    fn handle_character_reference(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            Some('#') => {
                self.temp_buffer.clear();
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                // Bare ampersand: pass it through literally.
                self.emit_char_ref('&');
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// Simplified from the spec's trie-driven longest match: consume the
    /// alphanumeric name (bounded), check for the terminating semicolon,
    /// and fall back to emitting the raw text for unknown names.
    fn handle_named_character_reference(&mut self) {
        let mut name = String::new();
        if let Some(c) = self.current_char {
            name.push(c);
        }
        // Longest entity name we know is well under this bound.
        while name.len() < 32 && self.peek(0).is_some_and(|c| c.is_ascii_alphanumeric()) {
            if let Some(c) = self.advance() {
                name.push(c);
            }
        }
        let has_semicolon = self.peek(0) == Some(';');
        if let Some(decoded) = lookup_entity(&name) {
            if has_semicolon {
                let _ = self.advance();
            } else if self.charref_in_attribute()
                && self.peek(0).is_some_and(|c| c.is_ascii_alphanumeric() || c == '=')
            {
                // "If the character reference was consumed as part of an
                // attribute, and the last character matched is not a
                // semicolon, and the next input character is either an
                // alphanumeric or an equals sign, then flush... as is."
                self.emit_char_ref('&');
                self.emit_char_ref_str(&name);
                self.return_from_char_ref();
                return;
            }
            self.emit_char_ref(decoded);
        } else {
            // Unknown name: pass through literally.
            self.emit_char_ref('&');
            self.emit_char_ref_str(&name);
            if has_semicolon {
                let _ = self.advance();
                self.emit_char_ref(';');
            }
        }
        self.return_from_char_ref();
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    fn handle_numeric_character_reference(&mut self) {
        self.char_ref_code = 0;
        match self.current_char {
            Some(c @ ('x' | 'X')) => {
                self.temp_buffer.push(c);
                self.switch_to(TokenizerState::HexCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    fn handle_hex_character_reference_start(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexCharacterReference);
            }
            _ => {
                // "This is an absence-of-digits-in-numeric-character-
                // reference parse error."
                self.emit_char_ref('&');
                self.emit_char_ref('#');
                let buffered = std::mem::take(&mut self.temp_buffer);
                self.emit_char_ref_str(&buffered);
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    fn handle_decimal_character_reference_start(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => {
                self.emit_char_ref('&');
                self.emit_char_ref('#');
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    fn handle_hex_character_reference(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_hexdigit() => {
                let digit = c.to_digit(16).unwrap_or(0);
                self.char_ref_code = self.char_ref_code.saturating_mul(16).saturating_add(digit);
            }
            Some(';') => {
                self.numeric_character_reference_end();
                self.return_from_char_ref();
            }
            _ => {
                // "This is a missing-semicolon-after-character-reference
                // parse error."
                self.numeric_character_reference_end();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    fn handle_decimal_character_reference(&mut self) {
        match self.current_char {
            Some(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                self.char_ref_code = self.char_ref_code.saturating_mul(10).saturating_add(digit);
            }
            Some(';') => {
                self.numeric_character_reference_end();
                self.return_from_char_ref();
            }
            _ => {
                self.numeric_character_reference_end();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// "If the number is 0x00, or a surrogate, or greater than 0x10FFFF,
    /// set the character reference code to 0xFFFD."
    fn numeric_character_reference_end(&mut self) {
        let code = self.char_ref_code;
        let decoded = if code == 0 || code > 0x0010_FFFF || (0xD800..=0xDFFF).contains(&code) {
            '\u{FFFD}'
        } else {
            char::from_u32(code).unwrap_or('\u{FFFD}')
        };
        self.emit_char_ref(decoded);
        self.temp_buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut t = HtmlTokenizer::new(input);
        t.run();
        t.into_tokens()
    }

    #[test]
    fn test_char_ref_in_attribute_routes_to_value() {
        // A reference decoded inside a quoted attribute value must land in
        // the attribute, not the character buffer.
        let tokens = tokenize("<a href=\"?a=1&amp;b=2\">x</a>");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].value, "?a=1&b=2");
            }
            other => panic!("expected start tag, got {other:?}"),
        }
        assert_eq!(tokens[1], Token::Character("x".to_string()));
    }

    #[test]
    fn test_named_reference_without_semicolon_in_attr_followed_by_alnum() {
        // "&amper" inside an attribute where "amp" matches but is followed
        // by alphanumerics must be flushed literally.
        let tokens = tokenize("<a href=\"x&ampy\">");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].value, "x&ampy");
            }
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn test_work_bound_terminates() {
        // Pathological nested ampersands still terminate with EOF last.
        let input = "&".repeat(10_000);
        let tokens = tokenize(&input);
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_equals_before_attribute_name() {
        // Unexpected '=' before an attribute name starts an attribute
        // whose name begins with '='.
        let tokens = tokenize("<div =foo>");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].name, "=foo");
            }
            other => panic!("expected start tag, got {other:?}"),
        }
    }
}
