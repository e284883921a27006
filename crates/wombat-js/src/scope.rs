//! Lexical scopes.
//!
//! A scope maps names to bindings and links to its parent; the global
//! scope has no parent. `var` declarations land in the nearest function
//! scope, `let`/`const` in the current block scope with a temporal dead
//! zone.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::BindingKind;
use crate::error::JsError;
use crate::value::Value;

/// Shared handle to a scope.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// One name binding.
#[derive(Clone)]
pub struct Binding {
    /// Current value.
    pub value: Value,
    /// How the name was declared.
    pub kind: BindingKind,
    /// `false` while a `let`/`const` is in its temporal dead zone.
    pub initialized: bool,
}

/// A lexical scope.
pub struct Scope {
    bindings: HashMap<String, Binding>,
    parent: Option<ScopeRef>,
    /// `var` hoisting stops at the nearest scope with this flag (function
    /// bodies and the global scope).
    is_function_scope: bool,
}

impl Scope {
    /// The global scope.
    #[must_use]
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: None,
            is_function_scope: true,
        }))
    }

    /// A block scope under `parent`.
    #[must_use]
    pub fn block(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
            is_function_scope: false,
        }))
    }

    /// A function scope under `parent` (the closure environment).
    #[must_use]
    pub fn function(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
            is_function_scope: true,
        }))
    }
}

/// Declare a `var` in the nearest function scope.
///
/// Re-declaring a `var` with `var` overwrites; colliding with a
/// `let`/`const` in that scope is a `SyntaxError`.
///
/// # Errors
///
/// `SyntaxError` on a lexical collision.
pub fn declare_var(scope: &ScopeRef, name: &str, value: Value) -> Result<(), JsError> {
    let target = function_scope_of(scope);
    let mut target_ref = target.borrow_mut();
    if let Some(existing) = target_ref.bindings.get(name) {
        if existing.kind != BindingKind::Var {
            return Err(JsError::syntax_error(format!(
                "Identifier '{name}' has already been declared"
            )));
        }
    }
    let _ = target_ref.bindings.insert(
        name.to_string(),
        Binding {
            value,
            kind: BindingKind::Var,
            initialized: true,
        },
    );
    Ok(())
}

/// Declare a `let`/`const` in the current scope.
///
/// # Errors
///
/// `SyntaxError` when the name is already bound in this scope.
pub fn declare_lexical(
    scope: &ScopeRef,
    name: &str,
    kind: BindingKind,
    value: Value,
    initialized: bool,
) -> Result<(), JsError> {
    let mut scope_ref = scope.borrow_mut();
    if scope_ref.bindings.contains_key(name) {
        return Err(JsError::syntax_error(format!(
            "Identifier '{name}' has already been declared"
        )));
    }
    let _ = scope_ref.bindings.insert(
        name.to_string(),
        Binding {
            value,
            kind,
            initialized,
        },
    );
    Ok(())
}

/// Initialize a hoisted-but-uninitialized lexical binding (executing its
/// declaration statement).
pub fn initialize(scope: &ScopeRef, name: &str, value: Value) {
    if let Some(binding) = scope.borrow_mut().bindings.get_mut(name) {
        binding.value = value;
        binding.initialized = true;
    }
}

/// Read a name, walking outward.
///
/// # Errors
///
/// `ReferenceError` for unresolvable names and TDZ reads.
pub fn get(scope: &ScopeRef, name: &str) -> Result<Value, JsError> {
    let mut current = Some(scope.clone());
    while let Some(s) = current {
        let s_ref = s.borrow();
        if let Some(binding) = s_ref.bindings.get(name) {
            if !binding.initialized {
                return Err(JsError::reference_error(format!(
                    "Cannot access '{name}' before initialization"
                )));
            }
            return Ok(binding.value.clone());
        }
        current = s_ref.parent.clone();
    }
    Err(JsError::reference_error(format!("{name} is not defined")))
}

/// Whether the name is bound in this scope itself (used when executing a
/// declaration whose binding was pre-hoisted into the scope).
#[must_use]
pub fn has_own(scope: &ScopeRef, name: &str) -> bool {
    scope.borrow().bindings.contains_key(name)
}

/// Whether the name resolves anywhere in the chain (drives the
/// never-throwing `typeof`).
#[must_use]
pub fn has(scope: &ScopeRef, name: &str) -> bool {
    let mut current = Some(scope.clone());
    while let Some(s) = current {
        let s_ref = s.borrow();
        if s_ref.bindings.contains_key(name) {
            return true;
        }
        current = s_ref.parent.clone();
    }
    false
}

/// Assign to a name.
///
/// Assigning to an initialized `const` is a `TypeError`; a TDZ write is a
/// `ReferenceError`; an unresolvable name is created on the global scope
/// (non-strict semantics).
///
/// # Errors
///
/// `TypeError` or `ReferenceError` as above.
pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> Result<(), JsError> {
    let mut current = Some(scope.clone());
    let mut last = scope.clone();
    while let Some(s) = current {
        {
            let mut s_ref = s.borrow_mut();
            if let Some(binding) = s_ref.bindings.get_mut(name) {
                if !binding.initialized {
                    return Err(JsError::reference_error(format!(
                        "Cannot access '{name}' before initialization"
                    )));
                }
                if binding.kind == BindingKind::Const {
                    return Err(JsError::type_error(format!(
                        "Assignment to constant variable '{name}'"
                    )));
                }
                binding.value = value;
                return Ok(());
            }
        }
        let parent = s.borrow().parent.clone();
        last = s;
        current = parent;
    }
    // Writing a free name creates it on the global scope.
    let _ = last.borrow_mut().bindings.insert(
        name.to_string(),
        Binding {
            value,
            kind: BindingKind::Var,
            initialized: true,
        },
    );
    Ok(())
}

/// The nearest enclosing function (or global) scope.
fn function_scope_of(scope: &ScopeRef) -> ScopeRef {
    let mut current = scope.clone();
    loop {
        let next = {
            let current_ref = current.borrow();
            if current_ref.is_function_scope {
                return current.clone();
            }
            current_ref.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_hoists_to_function_scope() {
        let global = Scope::global();
        let block = Scope::block(&global);
        declare_var(&block, "x", Value::Number(1.0)).unwrap();
        // Visible from the global scope, not just the block.
        assert!(has(&global, "x"));
    }

    #[test]
    fn test_var_redeclaration_allowed() {
        let global = Scope::global();
        declare_var(&global, "x", Value::Number(1.0)).unwrap();
        declare_var(&global, "x", Value::Number(2.0)).unwrap();
        assert_eq!(get(&global, "x").unwrap().to_number(), 2.0);
    }

    #[test]
    fn test_lexical_redeclaration_rejected() {
        let global = Scope::global();
        declare_lexical(&global, "x", BindingKind::Let, Value::Undefined, true).unwrap();
        assert!(declare_lexical(&global, "x", BindingKind::Let, Value::Undefined, true).is_err());
        assert!(declare_var(&global, "x", Value::Undefined).is_err());
    }

    #[test]
    fn test_tdz_read() {
        let global = Scope::global();
        declare_lexical(&global, "x", BindingKind::Let, Value::Undefined, false).unwrap();
        let err = get(&global, "x").unwrap_err();
        assert_eq!(err.kind, crate::error::JsErrorKind::ReferenceError);
        initialize(&global, "x", Value::Number(5.0));
        assert_eq!(get(&global, "x").unwrap().to_number(), 5.0);
    }

    #[test]
    fn test_const_reassignment() {
        let global = Scope::global();
        declare_lexical(&global, "k", BindingKind::Const, Value::Number(1.0), true).unwrap();
        let err = assign(&global, "k", Value::Number(2.0)).unwrap_err();
        assert_eq!(err.kind, crate::error::JsErrorKind::TypeError);
    }

    #[test]
    fn test_free_write_creates_global() {
        let global = Scope::global();
        let inner = Scope::function(&global);
        assign(&inner, "free", Value::Number(9.0)).unwrap();
        assert_eq!(get(&global, "free").unwrap().to_number(), 9.0);
    }

    #[test]
    fn test_unresolved_read_is_reference_error() {
        let global = Scope::global();
        assert!(get(&global, "nope").is_err());
    }
}
