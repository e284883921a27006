//! JavaScript error values.

use std::fmt;

/// The error classes the engine throws.
///
/// [ECMA-262 § 20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsErrorKind {
    /// Generic `Error`.
    Error,
    /// `TypeError` — wrong kind of value (const reassignment, calling a
    /// non-function, ...).
    TypeError,
    /// `ReferenceError` — unresolvable reference or TDZ access.
    ReferenceError,
    /// `SyntaxError` — lexing/parsing failures and redeclarations.
    SyntaxError,
    /// `RangeError` — call stack exhaustion.
    RangeError,
}

impl JsErrorKind {
    /// The constructor name as scripts would see it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::TypeError => "TypeError",
            Self::ReferenceError => "ReferenceError",
            Self::SyntaxError => "SyntaxError",
            Self::RangeError => "RangeError",
        }
    }
}

/// A thrown JavaScript error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsError {
    /// Which error class this is.
    pub kind: JsErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Source line where the error arose, when known (1-based).
    pub line: Option<u32>,
}

impl JsError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: JsErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Shorthand for a `TypeError`.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(JsErrorKind::TypeError, message)
    }

    /// Shorthand for a `ReferenceError`.
    #[must_use]
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new(JsErrorKind::ReferenceError, message)
    }

    /// Shorthand for a `SyntaxError`.
    #[must_use]
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::new(JsErrorKind::SyntaxError, message)
    }

    /// Shorthand for a `RangeError`.
    #[must_use]
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(JsErrorKind::RangeError, message)
    }

    /// Attach a source line.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}: {} (line {line})", self.kind.name(), self.message),
            None => write!(f, "{}: {}", self.kind.name(), self.message),
        }
    }
}

impl std::error::Error for JsError {}
