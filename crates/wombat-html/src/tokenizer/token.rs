//! HTML token types.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens: DOCTYPE, start tag, end tag, comment, character,
//! end-of-file."

/// An attribute on a start tag token.
///
/// Per [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name" — lowercased on emission.
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer emits tokens of these types to the tree construction
/// stage. Unlike the spec's per-code-point character tokens, consecutive
/// character data is coalesced into a single [`Token::Character`] whose
/// payload is a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system
    /// identifier, and a force-quirks flag."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and
    /// a list of attributes."
    StartTag {
        /// "a tag name" — lowercased on emission.
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are discarded.
    EndTag {
        /// "a tag name" — lowercased on emission.
        name: String,
    },

    /// A run of character data (consecutive character tokens coalesced).
    Character(String),

    /// "Comment and character tokens have data."
    Comment(String),

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// Whether this is the end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// "When a DOCTYPE token is created, its name, public identifier, and
    /// system identifier must be marked as missing."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
        }
    }

    /// "When a start or end tag token is created, its self-closing flag
    /// must be unset... and its attributes list must be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new end tag token per spec.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }
}
