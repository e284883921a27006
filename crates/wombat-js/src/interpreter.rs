//! The tree-walking interpreter.
//!
//! Statements evaluate to a [`ControlFlow`]; expressions to a [`Value`].
//! Function-scope hoisting runs before the first statement of each
//! function body, recursion is capped by `max_call_depth`, and an overall
//! step budget keeps runaway scripts from stalling the pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    ArrowBody, AssignOp, BindingKind, BinaryOp, Expression, Literal, LogicalOp, MemberProperty,
    PropertyKey, Statement, UnaryOp,
};
use crate::error::JsError;
use crate::lexer::Lexer;
use crate::parser::parse_program;
use crate::scope::{self, Scope, ScopeRef};
use crate::value::{loose_equals, strict_equals, FnKind, JsFunction, JsObject, Value};

/// Console message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// `console.log`
    Log,
    /// `console.error`
    Error,
    /// `console.warn`
    Warn,
    /// `console.info`
    Info,
    /// `console.debug`
    Debug,
}

/// One formatted console message.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    /// Severity.
    pub level: ConsoleLevel,
    /// Formatted text.
    pub text: String,
}

/// Shared sink collecting console output; optionally echoes to stderr.
#[derive(Clone, Default)]
pub struct ConsoleSink {
    messages: Rc<RefCell<Vec<ConsoleMessage>>>,
    /// Echo messages to stderr as they arrive.
    pub echo: bool,
}

impl ConsoleSink {
    /// Record a message.
    pub fn write(&self, level: ConsoleLevel, text: String) {
        if self.echo {
            eprintln!("[console] {text}");
        }
        self.messages.borrow_mut().push(ConsoleMessage { level, text });
    }

    /// Snapshot of all messages so far.
    #[must_use]
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages.borrow().clone()
    }
}

/// Statement completion for control flow.
#[derive(Debug, Clone)]
pub enum ControlFlow {
    /// Fall through to the next statement.
    None,
    /// `return` with a value.
    Return(Value),
    /// `break` out of the nearest loop.
    Break,
    /// `continue` the nearest loop.
    Continue,
}

/// Default recursion cap.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;
/// Default statement-step budget for one `execute` call.
const DEFAULT_MAX_STEPS: u64 = 10_000_000;

/// The interpreter: global scope, console sink, optional DOM binding.
pub struct Interpreter {
    /// The global scope.
    pub global: ScopeRef,
    /// Console output sink.
    pub console: ConsoleSink,
    /// Bound document state, when `install_document` has run.
    pub dom: Option<crate::dom::DocHandle>,
    max_call_depth: usize,
    depth: usize,
    steps: u64,
    max_steps: u64,
    /// Value of the most recent expression statement (the program's
    /// completion value).
    last_expression_value: Value,
}

impl Interpreter {
    /// Create an interpreter with the built-in globals installed.
    #[must_use]
    pub fn new() -> Self {
        let mut interp = Self {
            global: Scope::global(),
            console: ConsoleSink::default(),
            dom: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            depth: 0,
            steps: 0,
            max_steps: DEFAULT_MAX_STEPS,
            last_expression_value: Value::Undefined,
        };
        crate::builtins::install(&mut interp);
        interp
    }

    /// Override the recursion cap.
    pub fn set_max_call_depth(&mut self, depth: usize) {
        self.max_call_depth = depth;
    }

    /// Lex, parse, and run a script; returns the last top-level
    /// expression statement's value.
    ///
    /// # Errors
    ///
    /// `SyntaxError` from lexing/parsing, or whatever the script throws.
    pub fn execute(&mut self, source: &str) -> Result<Value, JsError> {
        let tokens = Lexer::new(source).tokenize()?;
        let program = parse_program(tokens)?;
        self.steps = 0;
        self.run_program(&program)
    }

    /// Run a parsed program in the global scope.
    ///
    /// # Errors
    ///
    /// Propagates runtime errors.
    pub fn run_program(&mut self, program: &[Statement]) -> Result<Value, JsError> {
        let global = self.global.clone();
        self.hoist(program, &global)?;
        self.last_expression_value = Value::Undefined;
        for statement in program {
            match self.exec_statement(statement, &global, &Value::Undefined)? {
                ControlFlow::None => {}
                // return/break/continue at top level end execution.
                ControlFlow::Return(v) => return Ok(v),
                ControlFlow::Break | ControlFlow::Continue => break,
            }
        }
        // Completion value: the most recent expression statement, REPL
        // style (so `if (c) 'a'; else 'b'` completes to the taken branch).
        Ok(self.last_expression_value.clone())
    }

    // ------------------------------------------------------------------
    // Hoisting
    // ------------------------------------------------------------------

    /// Function-scope hoisting: `var` names bind (undefined) and function
    /// declarations bind fully before the first statement executes.
    fn hoist(&mut self, statements: &[Statement], function_scope: &ScopeRef) -> Result<(), JsError> {
        self.hoist_vars(statements, function_scope)?;
        for statement in statements {
            if let Statement::FunctionDeclaration { name, params, body } = statement {
                let function =
                    self.make_function(Some(name.as_str()), params, body, function_scope, None);
                scope::declare_var(function_scope, name, function)?;
            }
        }
        self.hoist_lexicals(statements, function_scope)?;
        Ok(())
    }

    /// `var` declarations hoist through blocks to the function scope.
    fn hoist_vars(&self, statements: &[Statement], function_scope: &ScopeRef) -> Result<(), JsError> {
        for statement in statements {
            match statement {
                Statement::VariableDeclaration {
                    kind: BindingKind::Var,
                    declarations,
                } => {
                    for (name, _) in declarations {
                        scope::declare_var(function_scope, name, Value::Undefined)?;
                    }
                }
                Statement::Block(inner) => self.hoist_vars(inner, function_scope)?,
                Statement::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    self.hoist_vars(std::slice::from_ref(then_branch.as_ref()), function_scope)?;
                    if let Some(alt) = else_branch {
                        self.hoist_vars(std::slice::from_ref(alt.as_ref()), function_scope)?;
                    }
                }
                Statement::While { body, .. } => {
                    self.hoist_vars(std::slice::from_ref(body.as_ref()), function_scope)?;
                }
                Statement::For { init, body, .. } => {
                    if let Some(init) = init {
                        self.hoist_vars(std::slice::from_ref(init.as_ref()), function_scope)?;
                    }
                    self.hoist_vars(std::slice::from_ref(body.as_ref()), function_scope)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// `let`/`const` declared directly in this statement list enter their
    /// temporal dead zone now (uninitialized bindings in this scope).
    fn hoist_lexicals(
        &self,
        statements: &[Statement],
        scope: &ScopeRef,
    ) -> Result<(), JsError> {
        for statement in statements {
            if let Statement::VariableDeclaration {
                kind: kind @ (BindingKind::Let | BindingKind::Const),
                declarations,
            } = statement
            {
                for (name, _) in declarations {
                    scope::declare_lexical(scope, name, *kind, Value::Undefined, false)?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn step(&mut self) -> Result<(), JsError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(JsError::range_error("script execution budget exceeded"));
        }
        Ok(())
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        scope: &ScopeRef,
        this: &Value,
    ) -> Result<ControlFlow, JsError> {
        self.step()?;
        match statement {
            Statement::Expression(expression) => {
                let value = self.eval(expression, scope, this)?;
                self.last_expression_value = value;
                Ok(ControlFlow::None)
            }
            Statement::VariableDeclaration { kind, declarations } => {
                for (name, init) in declarations {
                    let value = match init {
                        Some(expression) => self.eval(expression, scope, this)?,
                        None => Value::Undefined,
                    };
                    match kind {
                        BindingKind::Var => scope::declare_var(scope, name, value)?,
                        BindingKind::Let | BindingKind::Const => {
                            if scope::has_own(scope, name) {
                                // Pre-hoisted: leaving the dead zone.
                                scope::initialize(scope, name, value);
                            } else {
                                scope::declare_lexical(scope, name, *kind, value, true)?;
                            }
                        }
                    }
                }
                Ok(ControlFlow::None)
            }
            Statement::Block(statements) => {
                let block_scope = Scope::block(scope);
                self.hoist_lexicals(statements, &block_scope)?;
                self.exec_statements(statements, &block_scope, this)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, scope, this)?.is_truthy() {
                    self.exec_statement(then_branch, scope, this)
                } else if let Some(alt) = else_branch {
                    self.exec_statement(alt, scope, this)
                } else {
                    Ok(ControlFlow::None)
                }
            }
            Statement::While { condition, body } => {
                while self.eval(condition, scope, this)?.is_truthy() {
                    self.step()?;
                    match self.exec_statement(body, scope, this)? {
                        ControlFlow::None | ControlFlow::Continue => {}
                        ControlFlow::Break => break,
                        flow @ ControlFlow::Return(_) => return Ok(flow),
                    }
                }
                Ok(ControlFlow::None)
            }
            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                let loop_scope = Scope::block(scope);
                if let Some(init) = init {
                    self.hoist_lexicals(std::slice::from_ref(init.as_ref()), &loop_scope)?;
                    let _ = self.exec_statement(init, &loop_scope, this)?;
                }
                loop {
                    self.step()?;
                    if let Some(condition) = condition {
                        if !self.eval(condition, &loop_scope, this)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec_statement(body, &loop_scope, this)? {
                        ControlFlow::None | ControlFlow::Continue => {}
                        ControlFlow::Break => break,
                        flow @ ControlFlow::Return(_) => return Ok(flow),
                    }
                    if let Some(update) = update {
                        let _ = self.eval(update, &loop_scope, this)?;
                    }
                }
                Ok(ControlFlow::None)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expression) => self.eval(expression, scope, this)?,
                    None => Value::Undefined,
                };
                Ok(ControlFlow::Return(value))
            }
            Statement::Break => Ok(ControlFlow::Break),
            Statement::Continue => Ok(ControlFlow::Continue),
            Statement::FunctionDeclaration { name, params, body } => {
                let function = self.make_function(Some(name.as_str()), params, body, scope, None);
                scope::declare_var(scope, name, function)?;
                Ok(ControlFlow::None)
            }
            Statement::Empty => Ok(ControlFlow::None),
        }
    }

    fn exec_statements(
        &mut self,
        statements: &[Statement],
        scope: &ScopeRef,
        this: &Value,
    ) -> Result<ControlFlow, JsError> {
        for statement in statements {
            match self.exec_statement(statement, scope, this)? {
                ControlFlow::None => {}
                flow => return Ok(flow),
            }
        }
        Ok(ControlFlow::None)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Evaluate an expression.
    ///
    /// # Errors
    ///
    /// Propagates thrown errors.
    pub fn eval(
        &mut self,
        expression: &Expression,
        scope: &ScopeRef,
        this: &Value,
    ) -> Result<Value, JsError> {
        match expression {
            Expression::Literal(literal) => Ok(match literal {
                Literal::Undefined => Value::Undefined,
                Literal::Null => Value::Null,
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::string(s.clone()),
            }),
            Expression::Identifier(name) => scope::get(scope, name),
            Expression::This => Ok(this.clone()),
            Expression::Binary { op, left, right } => {
                let lhs = self.eval(left, scope, this)?;
                let rhs = self.eval(right, scope, this)?;
                self.binary_op(*op, &lhs, &rhs)
            }
            Expression::Logical { op, left, right } => {
                let lhs = self.eval(left, scope, this)?;
                // Short-circuit, returning the deciding operand itself.
                let take_right = match op {
                    LogicalOp::And => lhs.is_truthy(),
                    LogicalOp::Or => !lhs.is_truthy(),
                    LogicalOp::Nullish => lhs.is_nullish(),
                };
                if take_right {
                    self.eval(right, scope, this)
                } else {
                    Ok(lhs)
                }
            }
            Expression::Unary { op, operand } => {
                let value = self.eval(operand, scope, this)?;
                Ok(match op {
                    UnaryOp::Not => Value::Boolean(!value.is_truthy()),
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                })
            }
            Expression::TypeOf(operand) => {
                // `typeof` of an unbound identifier yields "undefined"
                // without throwing.
                if let Expression::Identifier(name) = operand.as_ref() {
                    if !scope::has(scope, name) {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval(operand, scope, this)?;
                Ok(Value::string(value.type_of()))
            }
            Expression::Update {
                increment,
                prefix,
                target,
            } => {
                let old = self.eval(target, scope, this)?.to_number();
                let new = if *increment { old + 1.0 } else { old - 1.0 };
                self.assign_to(target, Value::Number(new), scope, this)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expression::Assignment { op, target, value } => {
                let rhs = self.eval(value, scope, this)?;
                let result = match op {
                    AssignOp::Assign => rhs,
                    compound => {
                        let old = self.eval(target, scope, this)?;
                        let binary = match compound {
                            AssignOp::Add => BinaryOp::Add,
                            AssignOp::Sub => BinaryOp::Sub,
                            AssignOp::Mul => BinaryOp::Mul,
                            AssignOp::Div | AssignOp::Assign => BinaryOp::Div,
                        };
                        self.binary_op(binary, &old, &rhs)?
                    }
                };
                self.assign_to(target, result.clone(), scope, this)?;
                Ok(result)
            }
            Expression::Conditional {
                condition,
                consequent,
                alternate,
            } => {
                if self.eval(condition, scope, this)?.is_truthy() {
                    self.eval(consequent, scope, this)
                } else {
                    self.eval(alternate, scope, this)
                }
            }
            Expression::Call { callee, arguments } => {
                // `a.f()` binds `this = a`; free calls get undefined.
                let (function, call_this) = match callee.as_ref() {
                    Expression::Member { object, property } => {
                        let receiver = self.eval(object, scope, this)?;
                        let key = self.member_key(property, scope, this)?;
                        let function = self.member_get(&receiver, &key)?;
                        (function, receiver)
                    }
                    other => (self.eval(other, scope, this)?, Value::Undefined),
                };
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval(argument, scope, this)?);
                }
                self.call_function(&function, &call_this, &args)
            }
            Expression::New { callee, arguments } => {
                let function = self.eval(callee, scope, this)?;
                let Value::Function(f) = &function else {
                    return Err(JsError::type_error("constructor is not a function"));
                };
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval(argument, scope, this)?);
                }
                // Create the instance, linked to F.prototype, then call F
                // with `this` bound to it.
                let instance = Rc::new(RefCell::new(JsObject::new()));
                instance.borrow_mut().prototype = Some(f.prototype_object());
                let instance_value = Value::Object(instance);
                let result = self.call_function(&function, &instance_value, &args)?;
                // "if F returns an object, that replaces the new object."
                if matches!(result, Value::Object(_) | Value::Array(_)) {
                    Ok(result)
                } else {
                    Ok(instance_value)
                }
            }
            Expression::Member { object, property } => {
                let receiver = self.eval(object, scope, this)?;
                let key = self.member_key(property, scope, this)?;
                self.member_get(&receiver, &key)
            }
            Expression::ArrayLiteral(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(element, scope, this)?);
                }
                Ok(Value::Array(Rc::new(RefCell::new(items))))
            }
            Expression::ObjectLiteral(properties) => {
                let object = Rc::new(RefCell::new(JsObject::new()));
                for (key, value_expr) in properties {
                    let key = match key {
                        PropertyKey::Named(name) => name.clone(),
                        PropertyKey::Computed(expression) => {
                            self.eval(expression, scope, this)?.to_js_string()
                        }
                    };
                    let value = self.eval(value_expr, scope, this)?;
                    object.borrow_mut().set(&key, value);
                }
                Ok(Value::Object(object))
            }
            Expression::Function { name, params, body } => {
                Ok(self.make_function(name.as_deref(), params, body, scope, None))
            }
            Expression::ArrowFunction { params, body } => {
                let body = match body {
                    ArrowBody::Block(statements) => statements.clone(),
                    // A concise body is an implicit return.
                    ArrowBody::Expression(expression) => {
                        Rc::new(vec![Statement::Return(Some((**expression).clone()))])
                    }
                };
                Ok(self.make_function(None, params, &body, scope, Some(this.clone())))
            }
        }
    }

    fn member_key(
        &mut self,
        property: &MemberProperty,
        scope: &ScopeRef,
        this: &Value,
    ) -> Result<String, JsError> {
        match property {
            MemberProperty::Named(name) => Ok(name.clone()),
            MemberProperty::Computed(expression) => {
                Ok(self.eval(expression, scope, this)?.to_js_string())
            }
        }
    }

    fn make_function(
        &self,
        name: Option<&str>,
        params: &[String],
        body: &Rc<Vec<Statement>>,
        scope: &ScopeRef,
        captured_this: Option<Value>,
    ) -> Value {
        Value::Function(Rc::new(JsFunction {
            name: name.unwrap_or("").to_string(),
            kind: FnKind::User {
                params: params.to_vec(),
                body: body.clone(),
                closure: scope.clone(),
                captured_this: captured_this.map(Box::new),
            },
            prototype: RefCell::new(None),
        }))
    }

    /// Call a function value with an explicit `this` and arguments.
    ///
    /// # Errors
    ///
    /// `TypeError` for non-functions, `RangeError` past the recursion cap,
    /// and whatever the body throws.
    pub fn call_function(
        &mut self,
        function: &Value,
        this: &Value,
        args: &[Value],
    ) -> Result<Value, JsError> {
        let Value::Function(f) = function else {
            return Err(JsError::type_error(format!(
                "{} is not a function",
                function.to_js_string()
            )));
        };
        if self.depth >= self.max_call_depth {
            return Err(JsError::range_error("Maximum call stack size exceeded"));
        }
        self.depth += 1;
        let result = self.call_inner(f, this, args);
        self.depth -= 1;
        result
    }

    fn call_inner(
        &mut self,
        f: &Rc<JsFunction>,
        this: &Value,
        args: &[Value],
    ) -> Result<Value, JsError> {
        match &f.kind {
            FnKind::Native(native) => native.clone()(self, this, args),
            FnKind::User {
                params,
                body,
                closure,
                captured_this,
            } => {
                let call_scope = Scope::function(closure);
                for (index, param) in params.iter().enumerate() {
                    let value = args.get(index).cloned().unwrap_or(Value::Undefined);
                    scope::declare_var(&call_scope, param, value)?;
                }
                self.hoist(body, &call_scope)?;
                // Arrow functions keep their captured `this`.
                let body_this = captured_this
                    .as_deref()
                    .cloned()
                    .unwrap_or_else(|| this.clone());
                match self.exec_statements(body, &call_scope, &body_this)? {
                    ControlFlow::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    fn binary_op(&mut self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, JsError> {
        Ok(match op {
            BinaryOp::Add => {
                // "+ string-concatenates if either operand is a string"
                // (objects and arrays reach strings via ToPrimitive).
                let stringy = |v: &Value| {
                    matches!(v, Value::Str(_) | Value::Object(_) | Value::Array(_))
                };
                if stringy(lhs) || stringy(rhs) {
                    Value::string(format!("{}{}", lhs.to_js_string(), rhs.to_js_string()))
                } else {
                    Value::Number(lhs.to_number() + rhs.to_number())
                }
            }
            BinaryOp::Sub => Value::Number(lhs.to_number() - rhs.to_number()),
            BinaryOp::Mul => Value::Number(lhs.to_number() * rhs.to_number()),
            BinaryOp::Div => Value::Number(lhs.to_number() / rhs.to_number()),
            BinaryOp::Mod => Value::Number(lhs.to_number() % rhs.to_number()),
            BinaryOp::Eq => Value::Boolean(loose_equals(lhs, rhs)),
            BinaryOp::NotEq => Value::Boolean(!loose_equals(lhs, rhs)),
            BinaryOp::StrictEq => Value::Boolean(strict_equals(lhs, rhs)),
            BinaryOp::StrictNotEq => Value::Boolean(!strict_equals(lhs, rhs)),
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
                self.compare(op, lhs, rhs)
            }
            BinaryOp::InstanceOf => Value::Boolean(instance_of(lhs, rhs)?),
        })
    }

    fn compare(&self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Value {
        // Two strings compare lexicographically; anything else compares
        // numerically (NaN makes every comparison false).
        if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
            return Value::Boolean(match op {
                BinaryOp::Less => a < b,
                BinaryOp::LessEq => a <= b,
                BinaryOp::Greater => a > b,
                _ => a >= b,
            });
        }
        let (a, b) = (lhs.to_number(), rhs.to_number());
        if a.is_nan() || b.is_nan() {
            return Value::Boolean(false);
        }
        Value::Boolean(match op {
            BinaryOp::Less => a < b,
            BinaryOp::LessEq => a <= b,
            BinaryOp::Greater => a > b,
            _ => a >= b,
        })
    }

    fn assign_to(
        &mut self,
        target: &Expression,
        value: Value,
        scope: &ScopeRef,
        this: &Value,
    ) -> Result<(), JsError> {
        match target {
            Expression::Identifier(name) => scope::assign(scope, name, value),
            Expression::Member { object, property } => {
                let receiver = self.eval(object, scope, this)?;
                let key = self.member_key(property, scope, this)?;
                self.member_set(&receiver, &key, value)
            }
            _ => Err(JsError::syntax_error("invalid assignment target")),
        }
    }

    // ------------------------------------------------------------------
    // Member access
    // ------------------------------------------------------------------

    /// Property read with prototype-chain walk and host dispatch.
    ///
    /// # Errors
    ///
    /// `TypeError` when reading from `undefined`/`null`.
    pub fn member_get(&mut self, receiver: &Value, key: &str) -> Result<Value, JsError> {
        match receiver {
            Value::Undefined | Value::Null => Err(JsError::type_error(format!(
                "Cannot read properties of {} (reading '{key}')",
                receiver.to_js_string()
            ))),
            Value::Object(object) => {
                let host = object.borrow().host;
                if let Some(host) = host {
                    if let Some(value) = crate::dom::host_get(self, host, key)? {
                        return Ok(value);
                    }
                }
                // Own properties, then the prototype chain.
                let mut current = Some(object.clone());
                while let Some(obj) = current {
                    let obj_ref = obj.borrow();
                    if let Some(value) = obj_ref.get_own(key) {
                        return Ok(value);
                    }
                    current = obj_ref.prototype.clone();
                }
                Ok(Value::Undefined)
            }
            Value::Array(items) => Ok(crate::builtins::array_member(items, key)),
            Value::Str(s) => Ok(crate::builtins::string_member(s, key)),
            Value::Function(f) => Ok(match key {
                "prototype" => Value::Object(f.prototype_object()),
                "name" => Value::string(f.name.clone()),
                "call" => crate::builtins::function_call_helper(),
                "apply" => crate::builtins::function_apply_helper(),
                _ => Value::Undefined,
            }),
            Value::Number(_) => Ok(match key {
                "toFixed" => crate::builtins::number_to_fixed(),
                _ => Value::Undefined,
            }),
            Value::Boolean(_) => Ok(Value::Undefined),
        }
    }

    /// Property write with host dispatch.
    ///
    /// # Errors
    ///
    /// `TypeError` for non-assignable receivers.
    pub fn member_set(&mut self, receiver: &Value, key: &str, value: Value) -> Result<(), JsError> {
        match receiver {
            Value::Object(object) => {
                let host = object.borrow().host;
                if let Some(host) = host {
                    if crate::dom::host_set(self, host, key, &value)? {
                        return Ok(());
                    }
                }
                object.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(items) => {
                if key == "length" {
                    let new_len = value.to_number().max(0.0) as usize;
                    items.borrow_mut().resize(new_len, Value::Undefined);
                    return Ok(());
                }
                if let Ok(index) = key.parse::<usize>() {
                    let mut items = items.borrow_mut();
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                    return Ok(());
                }
                Ok(())
            }
            Value::Function(f) => {
                if key == "prototype" {
                    if let Value::Object(proto) = value {
                        *f.prototype.borrow_mut() = Some(proto);
                    }
                }
                Ok(())
            }
            _ => Err(JsError::type_error(format!(
                "Cannot set properties of {}",
                receiver.to_js_string()
            ))),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// [ECMA-262 § 13.10.2 InstanceofOperator](https://tc39.es/ecma262/#sec-instanceofoperator)
///
/// Walks the value's prototype chain comparing against
/// `constructor.prototype` by identity.
fn instance_of(value: &Value, constructor: &Value) -> Result<bool, JsError> {
    let Value::Function(f) = constructor else {
        return Err(JsError::type_error(
            "Right-hand side of 'instanceof' is not callable",
        ));
    };
    let target = f.prototype_object();
    let Value::Object(object) = value else {
        return Ok(false);
    };
    let mut current = object.borrow().prototype.clone();
    while let Some(proto) = current {
        if Rc::ptr_eq(&proto, &target) {
            return Ok(true);
        }
        let next = proto.borrow().prototype.clone();
        current = next;
    }
    Ok(false)
}
