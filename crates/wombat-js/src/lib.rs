//! JavaScript engine for the Wombat terminal browser.
//!
//! # Scope
//!
//! - **Lexer** — position-tagged tokens, the engine's keyword set,
//!   numeric/string literals with escapes, comments skipped
//! - **Parser** — Pratt parser producing a statement/expression tree
//! - **Interpreter** — tree-walking with lexical scopes, closures,
//!   prototypes, `var` hoisting, `let`/`const` dead zones, a recursion
//!   cap, and non-strict free-write semantics
//! - **Built-ins** — `console` (sink-routed), `JSON` (serde_json-backed),
//!   `Math`, and the usual global functions
//! - **DOM bindings** — live `document`/element wrappers over
//!   `wombat-dom`; mutations are reflected in the underlying tree
//!
//! # Not Implemented
//!
//! - `try`/`catch`, `throw`, generators, async, classes, getters/setters
//! - Regular expressions and the `Date` object

/// The abstract syntax tree.
pub mod ast;
/// Built-in globals.
pub mod builtins;
/// DOM bindings.
pub mod dom;
/// Error values.
pub mod error;
/// The interpreter.
pub mod interpreter;
/// The lexer.
pub mod lexer;
/// The parser.
pub mod parser;
/// Lexical scopes.
pub mod scope;
/// JavaScript tokens.
pub mod token;
/// Runtime values.
pub mod value;

pub use dom::{install_document, DocHandle, DocumentState};
pub use error::{JsError, JsErrorKind};
pub use interpreter::{ConsoleLevel, ConsoleMessage, ConsoleSink, Interpreter};
pub use value::Value;

/// A JavaScript runtime for one document.
///
/// Each document gets its own runtime with its own global object; the
/// runtime lives from document load to navigation.
pub struct JsRuntime {
    interpreter: Interpreter,
}

impl JsRuntime {
    /// Create a runtime with the built-in globals registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Bind a document: installs `document`/`window` and routes DOM
    /// property access to the given state.
    pub fn bind_document(&mut self, doc: &DocHandle) {
        install_document(&mut self.interpreter, doc);
    }

    /// Execute JavaScript source.
    ///
    /// # Errors
    ///
    /// Returns the first `SyntaxError` or uncaught runtime error. The
    /// caller (the browser shell) reports it through the console sink and
    /// continues; script failure never halts the render pipeline.
    pub fn execute(&mut self, source: &str) -> Result<Value, JsError> {
        self.interpreter.execute(source)
    }

    /// The console sink (shared; clone to observe output).
    #[must_use]
    pub fn console(&self) -> ConsoleSink {
        self.interpreter.console.clone()
    }

    /// Echo console output to stderr as it arrives.
    pub fn set_console_echo(&mut self, echo: bool) {
        self.interpreter.console.echo = echo;
    }

    /// Direct access to the interpreter (tests, embedding).
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }
}

impl Default for JsRuntime {
    fn default() -> Self {
        Self::new()
    }
}
