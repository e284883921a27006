//! Integration tests for the JavaScript engine.

use wombat_js::{JsErrorKind, JsRuntime, Value};

fn eval(source: &str) -> Value {
    JsRuntime::new()
        .execute(source)
        .unwrap_or_else(|e| panic!("script failed: {e}\n{source}"))
}

fn eval_number(source: &str) -> f64 {
    eval(source).to_number()
}

fn eval_string(source: &str) -> String {
    eval(source).to_js_string()
}

fn eval_err(source: &str) -> JsErrorKind {
    JsRuntime::new()
        .execute(source)
        .expect_err("script should have thrown")
        .kind
}

#[test]
fn test_arithmetic_and_precedence() {
    assert_eq!(eval_number("1 + 2 * 3"), 7.0);
    assert_eq!(eval_number("(1 + 2) * 3"), 9.0);
    assert_eq!(eval_number("10 % 3"), 1.0);
    assert_eq!(eval_number("2 * 3 + 4 * 5"), 26.0);
    assert_eq!(eval_number("-3 + 1"), -2.0);
}

#[test]
fn test_string_concatenation() {
    // "+ string-concatenates if either operand is a string."
    assert_eq!(eval_string("'a' + 'b'"), "ab");
    assert_eq!(eval_string("'n=' + 5"), "n=5");
    assert_eq!(eval_string("1 + '2'"), "12");
    assert_eq!(eval_number("'3' - 1"), 2.0);
}

#[test]
fn test_variables_and_assignment() {
    assert_eq!(eval_number("var x = 1; x += 4; x"), 5.0);
    assert_eq!(eval_number("let y = 10; y *= 2; y"), 20.0);
    assert_eq!(eval_number("let a = 1, b = 2; a + b"), 3.0);
}

#[test]
fn test_equality_table() {
    assert_eq!(eval("undefined == null"), Value::Boolean(true));
    assert_eq!(eval("undefined === null"), Value::Boolean(false));
    assert_eq!(eval("1 == '1'"), Value::Boolean(true));
    assert_eq!(eval("1 === '1'"), Value::Boolean(false));
    assert_eq!(eval("true == 1"), Value::Boolean(true));
    assert_eq!(eval("NaN == NaN"), Value::Boolean(false));
    assert_eq!(eval("NaN === NaN"), Value::Boolean(false));
    // Reference identity for objects.
    assert_eq!(eval("var o = {}; o === o"), Value::Boolean(true));
    assert_eq!(eval("({} === {})"), Value::Boolean(false));
}

#[test]
fn test_logical_operators_return_operands() {
    // "&&/|| short-circuit and return the deciding operand."
    assert_eq!(eval_number("0 || 7"), 7.0);
    assert_eq!(eval_string("'x' && 'y'"), "y");
    assert_eq!(eval_number("null ?? 3"), 3.0);
    assert_eq!(eval_number("0 ?? 3"), 0.0);
    // Short-circuit: the right side must not run.
    assert_eq!(
        eval_number("var n = 0; function boom() { n = 99; } false && boom(); n"),
        0.0
    );
}

#[test]
fn test_control_flow() {
    assert_eq!(
        eval_number("var total = 0; for (var i = 1; i <= 4; i++) { total += i; } total"),
        10.0
    );
    assert_eq!(
        eval_number("var n = 0; while (n < 5) { n++; if (n === 3) break; } n"),
        3.0
    );
    assert_eq!(
        eval_number(
            "var odd = 0; for (var i = 0; i < 6; i++) { if (i % 2 === 0) continue; odd++; } odd"
        ),
        3.0
    );
    assert_eq!(eval_string("if (1 > 2) 'a'; else 'b'"), "b");
}

#[test]
fn test_functions_and_closures() {
    // Spec scenario: mk(3)(4) === 7 with the closure capturing by
    // reference.
    assert_eq!(
        eval_number("function mk(x){ return function(y){ return x + y; }; } mk(3)(4)"),
        7.0
    );
    // Mutating the captured variable after closure creation is observed.
    assert_eq!(
        eval_number(
            "var x = 1;
             function get() { return x; }
             x = 42;
             get()"
        ),
        42.0
    );
    // Counter closure over let.
    assert_eq!(
        eval_number(
            "function counter() { let n = 0; return function() { n++; return n; }; }
             var c = counter(); c(); c(); c()"
        ),
        3.0
    );
}

#[test]
fn test_hoisting() {
    // Function declarations hoist above their call sites.
    assert_eq!(eval_number("before(); function before() { return 8; }"), 8.0);
    // var hoists as undefined.
    assert_eq!(eval_string("typeof x; var x = 1;"), "undefined");
}

#[test]
fn test_typeof_never_throws() {
    assert_eq!(eval_string("typeof neverDeclared"), "undefined");
    assert_eq!(eval_string("typeof 5"), "number");
    assert_eq!(eval_string("typeof 'a'"), "string");
    assert_eq!(eval_string("typeof null"), "object");
    assert_eq!(eval_string("typeof undefined"), "undefined");
    assert_eq!(eval_string("typeof {}"), "object");
    assert_eq!(eval_string("typeof typeof 1"), "string");
    assert_eq!(eval_string("function f(){} typeof f"), "function");
}

#[test]
fn test_scope_errors() {
    // Reading a free name throws.
    assert_eq!(eval_err("missing + 1"), JsErrorKind::ReferenceError);
    // let/const TDZ.
    assert_eq!(eval_err("{ tooSoon; let tooSoon = 1; }"), JsErrorKind::ReferenceError);
    // const reassignment.
    assert_eq!(eval_err("const k = 1; k = 2;"), JsErrorKind::TypeError);
    // let redeclaration.
    assert_eq!(eval_err("let d = 1; let d = 2;"), JsErrorKind::SyntaxError);
    // var-over-var is fine.
    assert_eq!(eval_number("var v = 1; var v = 2; v"), 2.0);
}

#[test]
fn test_free_write_creates_global() {
    // Non-strict: writing a free name creates it on the global scope.
    assert_eq!(
        eval_number("function set() { leaked = 5; } set(); leaked"),
        5.0
    );
}

#[test]
fn test_block_scoping() {
    assert_eq!(
        eval_number("let x = 1; { let x = 2; } x"),
        1.0
    );
    assert_eq!(
        eval_number("var y = 1; { var y = 2; } y"),
        2.0
    );
}

#[test]
fn test_objects_and_prototypes() {
    assert_eq!(eval_number("var o = { a: 1, b: { c: 2 } }; o.a + o.b.c"), 3.0);
    assert_eq!(eval_number("var o = {}; o.x = 9; o['x']"), 9.0);
    assert_eq!(
        eval_number(
            "function Point(x, y) { this.x = x; this.y = y; }
             Point.prototype.norm1 = function() { return this.x + this.y; };
             var p = new Point(3, 4);
             p.norm1()"
        ),
        7.0
    );
    assert_eq!(
        eval("function Animal(){} var a = new Animal(); a instanceof Animal"),
        Value::Boolean(true)
    );
    // A constructor returning an object replaces the instance.
    assert_eq!(
        eval_number("function F() { return { marker: 13 }; } new F().marker"),
        13.0
    );
}

#[test]
fn test_this_binding() {
    // Method call: this = receiver.
    assert_eq!(
        eval_number("var o = { v: 5, get: function() { return this.v; } }; o.get()"),
        5.0
    );
    // Free call: this = undefined → typeof is "undefined".
    assert_eq!(
        eval_string("function f() { return typeof this; } f()"),
        "undefined"
    );
    // Arrows capture this lexically and are never re-bound.
    assert_eq!(
        eval_number(
            "var o = { v: 6, get: function() { var arrow = () => this.v; return arrow(); } };
             o.get()"
        ),
        6.0
    );
}

#[test]
fn test_arrays() {
    assert_eq!(eval_number("[1, 2, 3].length"), 3.0);
    assert_eq!(eval_number("var a = [1, 2]; a.push(3); a[2]"), 3.0);
    assert_eq!(eval_string("[1, 2, 3].join('-')"), "1-2-3");
    assert_eq!(eval_number("[5, 6, 7].indexOf(6)"), 1.0);
    assert_eq!(eval_number("[1, 2, 3].map(x => x * 2)[2]"), 6.0);
    assert_eq!(eval_number("[1, 2, 3, 4].filter(x => x % 2 === 0).length"), 2.0);
    assert_eq!(eval("Array.isArray([])"), Value::Boolean(true));
    assert_eq!(eval("Array.isArray('no')"), Value::Boolean(false));
}

#[test]
fn test_string_methods() {
    assert_eq!(eval_number("'hello'.length"), 5.0);
    assert_eq!(eval_string("'hello'.toUpperCase()"), "HELLO");
    assert_eq!(eval_string("'a,b,c'.split(',')[1]"), "b");
    assert_eq!(eval_number("'abcdef'.indexOf('cd')"), 2.0);
    assert_eq!(eval_string("'  pad  '.trim()"), "pad");
    assert_eq!(eval_string("'abcdef'.slice(1, 3)"), "bc");
    assert_eq!(eval_string("'abcdef'.slice(-2)"), "ef");
}

#[test]
fn test_update_expressions() {
    assert_eq!(eval_number("var i = 5; i++"), 5.0);
    assert_eq!(eval_number("var i = 5; i++; i"), 6.0);
    assert_eq!(eval_number("var i = 5; ++i"), 6.0);
    assert_eq!(eval_number("var i = 5; --i; i--; i"), 3.0);
}

#[test]
fn test_conditional_expression() {
    assert_eq!(eval_string("1 < 2 ? 'yes' : 'no'"), "yes");
    assert_eq!(eval_number("false ? 1 : true ? 2 : 3"), 2.0);
}

#[test]
fn test_recursion_and_depth_cap() {
    assert_eq!(
        eval_number("function fib(n) { return n < 2 ? n : fib(n-1) + fib(n-2); } fib(12)"),
        144.0
    );
    assert_eq!(
        eval_err("function forever() { return forever(); } forever()"),
        JsErrorKind::RangeError
    );
}

#[test]
fn test_globals() {
    assert_eq!(eval_number("parseInt('42px')"), 42.0);
    assert_eq!(eval_number("parseInt('ff', 16)"), 255.0);
    assert_eq!(eval_number("parseFloat('2.5rem')"), 2.5);
    assert_eq!(eval("isNaN('abc')"), Value::Boolean(true));
    assert_eq!(eval("isFinite(1 / 0)"), Value::Boolean(false));
    assert_eq!(eval_number("Number('17')"), 17.0);
    assert_eq!(eval_string("String(false)"), "false");
    assert_eq!(eval("Boolean('')"), Value::Boolean(false));
    assert_eq!(eval_string("Object.keys({ a: 1, b: 2 }).join(',')"), "a,b");
}

#[test]
fn test_math() {
    assert_eq!(eval_number("Math.abs(-4)"), 4.0);
    assert_eq!(eval_number("Math.max(1, 9, 4)"), 9.0);
    assert_eq!(eval_number("Math.min(2, -1)"), -1.0);
    assert_eq!(eval_number("Math.pow(2, 10)"), 1024.0);
    assert_eq!(eval_number("Math.floor(2.9)"), 2.0);
    assert_eq!(eval_number("Math.round(2.5)"), 3.0);
    assert_eq!(eval_number("Math.sign(-9)"), -1.0);
    assert!(eval_number("Math.PI") > 3.14);
    assert!(eval_number("Math.random()") < 1.0);
}

#[test]
fn test_json_round_trip() {
    // JSON-safe values survive parse(stringify(v)).
    assert_eq!(
        eval_number("JSON.parse(JSON.stringify({ n: 1.5 })).n"),
        1.5
    );
    assert_eq!(
        eval("JSON.parse(JSON.stringify({ b: true })).b"),
        Value::Boolean(true)
    );
    assert_eq!(
        eval_string("JSON.parse(JSON.stringify({ a: ['x', null, 3] })).a.join('|')"),
        "x||3"
    );
    assert_eq!(
        eval("JSON.parse(JSON.stringify({ z: null })).z"),
        Value::Null
    );
    assert_eq!(eval_string("JSON.stringify({ b: true })"), "{\"b\":true}");
    // NaN and Infinity stringify to null; functions are omitted.
    assert_eq!(eval_string("JSON.stringify([0 / 0, 1 / 0])"), "[null,null]");
    assert_eq!(eval_string("JSON.stringify({ f: function() {} })"), "{}");
    assert_eq!(eval_number("JSON.parse('{\"a\": [1, 2]}').a[1]"), 2.0);
    // Malformed JSON throws SyntaxError.
    assert_eq!(eval_err("JSON.parse('{nope')"), JsErrorKind::SyntaxError);
}

#[test]
fn test_console_sink() {
    let mut runtime = JsRuntime::new();
    let _ = runtime
        .execute("console.log('a', 1, [2, 3]); console.error('bad');")
        .unwrap();
    let messages = runtime.console().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "a 1 [2, 3]");
    assert_eq!(messages[1].text, "bad");
}

#[test]
fn test_call_and_apply() {
    assert_eq!(
        eval_number(
            "function get() { return this.v; }
             get.call({ v: 11 })"
        ),
        11.0
    );
    assert_eq!(
        eval_number("function add(a, b) { return a + b; } add.apply(undefined, [3, 4])"),
        7.0
    );
}

#[test]
fn test_syntax_errors() {
    assert_eq!(eval_err("let = 5"), JsErrorKind::SyntaxError);
    assert_eq!(eval_err("function () {}"), JsErrorKind::SyntaxError);
    assert_eq!(eval_err("1 ="), JsErrorKind::SyntaxError);
    assert_eq!(eval_err("\"unterminated"), JsErrorKind::SyntaxError);
}
