//! Built-in globals and the method surfaces of primitive values.

mod console;
mod json;
mod math;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::scope;
use crate::value::{strict_equals, ArrayRef, JsFunction, JsObject, Value};

/// Install all global bindings into the interpreter's global scope.
pub fn install(interp: &mut Interpreter) {
    let global = interp.global.clone();
    let declare = |name: &str, value: Value| {
        // The global scope is empty at install time; declaration cannot
        // collide.
        let _ = scope::declare_var(&global, name, value);
    };

    declare("console", console::make_console());
    declare("Math", math::make_math());
    declare("JSON", json::make_json());

    declare("undefined", Value::Undefined);
    declare("NaN", Value::Number(f64::NAN));
    declare("Infinity", Value::Number(f64::INFINITY));

    declare(
        "parseInt",
        JsFunction::native("parseInt", |_, _, args| {
            let text = args.first().map_or_else(String::new, Value::to_js_string);
            let radix = match args.get(1).map(Value::to_number) {
                Some(r) if r.is_finite() && (2.0..=36.0).contains(&r) => r as u32,
                _ => 10,
            };
            Ok(Value::Number(parse_int(&text, radix)))
        }),
    );
    declare(
        "parseFloat",
        JsFunction::native("parseFloat", |_, _, args| {
            let text = args.first().map_or_else(String::new, Value::to_js_string);
            Ok(Value::Number(parse_float(&text)))
        }),
    );
    declare(
        "isNaN",
        JsFunction::native("isNaN", |_, _, args| {
            let n = args.first().map_or(f64::NAN, Value::to_number);
            Ok(Value::Boolean(n.is_nan()))
        }),
    );
    declare(
        "isFinite",
        JsFunction::native("isFinite", |_, _, args| {
            let n = args.first().map_or(f64::NAN, Value::to_number);
            Ok(Value::Boolean(n.is_finite()))
        }),
    );
    declare(
        "Number",
        JsFunction::native("Number", |_, _, args| {
            Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
        }),
    );
    declare(
        "String",
        JsFunction::native("String", |_, _, args| {
            Ok(Value::string(
                args.first().map_or_else(String::new, Value::to_js_string),
            ))
        }),
    );
    declare(
        "Boolean",
        JsFunction::native("Boolean", |_, _, args| {
            Ok(Value::Boolean(args.first().is_some_and(Value::is_truthy)))
        }),
    );

    // Array.isArray
    let array = Rc::new(RefCell::new(JsObject::new()));
    array.borrow_mut().set(
        "isArray",
        JsFunction::native("isArray", |_, _, args| {
            Ok(Value::Boolean(matches!(args.first(), Some(Value::Array(_)))))
        }),
    );
    declare("Array", Value::Object(array));

    // Object.keys / values / entries
    let object = Rc::new(RefCell::new(JsObject::new()));
    object.borrow_mut().set(
        "keys",
        JsFunction::native("keys", |_, _, args| {
            Ok(match args.first() {
                Some(Value::Object(o)) => Value::Array(Rc::new(RefCell::new(
                    o.borrow().keys().into_iter().map(Value::string).collect(),
                ))),
                Some(Value::Array(items)) => Value::Array(Rc::new(RefCell::new(
                    (0..items.borrow().len())
                        .map(|i| Value::string(i.to_string()))
                        .collect(),
                ))),
                _ => Value::Array(Rc::new(RefCell::new(Vec::new()))),
            })
        }),
    );
    object.borrow_mut().set(
        "values",
        JsFunction::native("values", |_, _, args| {
            Ok(match args.first() {
                Some(Value::Object(o)) => Value::Array(Rc::new(RefCell::new(
                    o.borrow().entries().into_iter().map(|(_, v)| v).collect(),
                ))),
                Some(Value::Array(items)) => Value::Array(Rc::new(RefCell::new(
                    items.borrow().clone(),
                ))),
                _ => Value::Array(Rc::new(RefCell::new(Vec::new()))),
            })
        }),
    );
    object.borrow_mut().set(
        "entries",
        JsFunction::native("entries", |_, _, args| {
            Ok(match args.first() {
                Some(Value::Object(o)) => Value::Array(Rc::new(RefCell::new(
                    o.borrow()
                        .entries()
                        .into_iter()
                        .map(|(k, v)| {
                            Value::Array(Rc::new(RefCell::new(vec![Value::string(k), v])))
                        })
                        .collect(),
                ))),
                _ => Value::Array(Rc::new(RefCell::new(Vec::new()))),
            })
        }),
    );
    declare("Object", Value::Object(object));
}

/// [ECMA-262 § 19.2.5 parseInt](https://tc39.es/ecma262/#sec-parseint-string-radix)
fn parse_int(text: &str, mut radix: u32) -> f64 {
    let mut s = text.trim();
    let mut sign = 1.0;
    if let Some(rest) = s.strip_prefix('-') {
        sign = -1.0;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if radix == 16 || radix == 10 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }
    let digits: String = s.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        value = value * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0));
    }
    sign * value
}

/// [ECMA-262 § 19.2.4 parseFloat](https://tc39.es/ecma262/#sec-parsefloat-string)
fn parse_float(text: &str) -> f64 {
    let s = text.trim();
    // Longest prefix that parses as a float.
    let mut end = 0;
    let bytes: Vec<char> = s.chars().collect();
    let mut best: Option<f64> = None;
    while end < bytes.len() {
        end += 1;
        let candidate: String = bytes[..end].iter().collect();
        if let Ok(v) = candidate.parse::<f64>() {
            best = Some(v);
        }
    }
    best.unwrap_or(f64::NAN)
}

// ----------------------------------------------------------------------
// Primitive member surfaces
// ----------------------------------------------------------------------

/// Property access on an array value.
#[must_use]
pub fn array_member(items: &ArrayRef, key: &str) -> Value {
    if key == "length" {
        return Value::Number(items.borrow().len() as f64);
    }
    if let Ok(index) = key.parse::<usize>() {
        return items.borrow().get(index).cloned().unwrap_or(Value::Undefined);
    }
    match key {
        "push" => JsFunction::native("push", |_, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("push called on non-array"));
            };
            items.borrow_mut().extend(args.iter().cloned());
            Ok(Value::Number(items.borrow().len() as f64))
        }),
        "pop" => JsFunction::native("pop", |_, this, _| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("pop called on non-array"));
            };
            let popped = items.borrow_mut().pop();
            Ok(popped.unwrap_or(Value::Undefined))
        }),
        "join" => JsFunction::native("join", |_, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("join called on non-array"));
            };
            let separator = args.first().map_or_else(|| ",".to_string(), Value::to_js_string);
            let joined = items
                .borrow()
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(&separator);
            Ok(Value::string(joined))
        }),
        "indexOf" => JsFunction::native("indexOf", |_, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("indexOf called on non-array"));
            };
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            let index = items
                .borrow()
                .iter()
                .position(|v| strict_equals(v, &needle));
            Ok(Value::Number(index.map_or(-1.0, |i| i as f64)))
        }),
        "includes" => JsFunction::native("includes", |_, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("includes called on non-array"));
            };
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            let found = items.borrow().iter().any(|v| strict_equals(v, &needle));
            Ok(Value::Boolean(found))
        }),
        "slice" => JsFunction::native("slice", |_, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("slice called on non-array"));
            };
            let items = items.borrow();
            let (start, end) = slice_bounds(items.len(), args);
            Ok(Value::Array(Rc::new(RefCell::new(
                items[start..end].to_vec(),
            ))))
        }),
        "forEach" => JsFunction::native("forEach", |interp, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("forEach called on non-array"));
            };
            let callback = args.first().cloned().unwrap_or(Value::Undefined);
            let snapshot = items.borrow().clone();
            for (index, item) in snapshot.into_iter().enumerate() {
                let _ = interp.call_function(
                    &callback,
                    &Value::Undefined,
                    &[item, Value::Number(index as f64)],
                )?;
            }
            Ok(Value::Undefined)
        }),
        "map" => JsFunction::native("map", |interp, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("map called on non-array"));
            };
            let callback = args.first().cloned().unwrap_or(Value::Undefined);
            let snapshot = items.borrow().clone();
            let mut mapped = Vec::with_capacity(snapshot.len());
            for (index, item) in snapshot.into_iter().enumerate() {
                mapped.push(interp.call_function(
                    &callback,
                    &Value::Undefined,
                    &[item, Value::Number(index as f64)],
                )?);
            }
            Ok(Value::Array(Rc::new(RefCell::new(mapped))))
        }),
        "filter" => JsFunction::native("filter", |interp, this, args| {
            let Value::Array(items) = this else {
                return Err(JsError::type_error("filter called on non-array"));
            };
            let callback = args.first().cloned().unwrap_or(Value::Undefined);
            let snapshot = items.borrow().clone();
            let mut kept = Vec::new();
            for (index, item) in snapshot.into_iter().enumerate() {
                let keep = interp.call_function(
                    &callback,
                    &Value::Undefined,
                    &[item.clone(), Value::Number(index as f64)],
                )?;
                if keep.is_truthy() {
                    kept.push(item);
                }
            }
            Ok(Value::Array(Rc::new(RefCell::new(kept))))
        }),
        _ => Value::Undefined,
    }
}

/// Slice bounds from (start, end) arguments with negative indexing.
fn slice_bounds(len: usize, args: &[Value]) -> (usize, usize) {
    let resolve = |v: Option<&Value>, default: i64| -> i64 {
        v.map_or(default, |v| {
            let n = v.to_number();
            if n.is_nan() { default } else { n as i64 }
        })
    };
    let len_i = len as i64;
    let mut start = resolve(args.first(), 0);
    let mut end = resolve(args.get(1), len_i);
    if start < 0 {
        start += len_i;
    }
    if end < 0 {
        end += len_i;
    }
    let start = start.clamp(0, len_i) as usize;
    let end = end.clamp(0, len_i) as usize;
    (start, end.max(start))
}

/// Property access on a string value.
#[must_use]
pub fn string_member(s: &Rc<String>, key: &str) -> Value {
    if key == "length" {
        return Value::Number(s.chars().count() as f64);
    }
    if let Ok(index) = key.parse::<usize>() {
        return s
            .chars()
            .nth(index)
            .map_or(Value::Undefined, |c| Value::string(c.to_string()));
    }
    match key {
        "charAt" => JsFunction::native("charAt", |_, this, args| {
            let text = this.to_js_string();
            let index = args.first().map_or(0.0, Value::to_number).max(0.0) as usize;
            Ok(Value::string(
                text.chars().nth(index).map(String::from).unwrap_or_default(),
            ))
        }),
        "charCodeAt" => JsFunction::native("charCodeAt", |_, this, args| {
            let text = this.to_js_string();
            let index = args.first().map_or(0.0, Value::to_number).max(0.0) as usize;
            Ok(text
                .chars()
                .nth(index)
                .map_or(Value::Number(f64::NAN), |c| Value::Number(f64::from(c as u32))))
        }),
        "indexOf" => JsFunction::native("indexOf", |_, this, args| {
            let text = this.to_js_string();
            let needle = args.first().map_or_else(String::new, Value::to_js_string);
            let index = text
                .find(&needle)
                .map_or(-1.0, |byte| text[..byte].chars().count() as f64);
            Ok(Value::Number(index))
        }),
        "includes" => JsFunction::native("includes", |_, this, args| {
            let text = this.to_js_string();
            let needle = args.first().map_or_else(String::new, Value::to_js_string);
            Ok(Value::Boolean(text.contains(&needle)))
        }),
        "startsWith" => JsFunction::native("startsWith", |_, this, args| {
            let text = this.to_js_string();
            let needle = args.first().map_or_else(String::new, Value::to_js_string);
            Ok(Value::Boolean(text.starts_with(&needle)))
        }),
        "endsWith" => JsFunction::native("endsWith", |_, this, args| {
            let text = this.to_js_string();
            let needle = args.first().map_or_else(String::new, Value::to_js_string);
            Ok(Value::Boolean(text.ends_with(&needle)))
        }),
        "slice" | "substring" => JsFunction::native("slice", |_, this, args| {
            let chars: Vec<char> = this.to_js_string().chars().collect();
            let (start, end) = slice_bounds(chars.len(), args);
            Ok(Value::string(chars[start..end].iter().collect::<String>()))
        }),
        "toUpperCase" => JsFunction::native("toUpperCase", |_, this, _| {
            Ok(Value::string(this.to_js_string().to_uppercase()))
        }),
        "toLowerCase" => JsFunction::native("toLowerCase", |_, this, _| {
            Ok(Value::string(this.to_js_string().to_lowercase()))
        }),
        "trim" => JsFunction::native("trim", |_, this, _| {
            Ok(Value::string(this.to_js_string().trim().to_string()))
        }),
        "split" => JsFunction::native("split", |_, this, args| {
            let text = this.to_js_string();
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::Undefined) => vec![Value::string(text)],
                Some(separator) => {
                    let sep = separator.to_js_string();
                    if sep.is_empty() {
                        text.chars().map(|c| Value::string(c.to_string())).collect()
                    } else {
                        text.split(&sep).map(Value::string).collect()
                    }
                }
            };
            Ok(Value::Array(Rc::new(RefCell::new(parts))))
        }),
        "repeat" => JsFunction::native("repeat", |_, this, args| {
            let count = args.first().map_or(0.0, Value::to_number);
            if count < 0.0 || !count.is_finite() {
                return Err(JsError::range_error("Invalid count value"));
            }
            Ok(Value::string(this.to_js_string().repeat(count as usize)))
        }),
        "replace" => JsFunction::native("replace", |_, this, args| {
            let text = this.to_js_string();
            let from = args.first().map_or_else(String::new, Value::to_js_string);
            let to = args.get(1).map_or_else(String::new, Value::to_js_string);
            Ok(Value::string(text.replacen(&from, &to, 1)))
        }),
        "toString" => JsFunction::native("toString", |_, this, _| {
            Ok(Value::string(this.to_js_string()))
        }),
        _ => Value::Undefined,
    }
}

/// `Function.prototype.call` — `f.call(thisArg, ...args)`.
#[must_use]
pub fn function_call_helper() -> Value {
    JsFunction::native("call", |interp, this, args| {
        let bound_this = args.first().cloned().unwrap_or(Value::Undefined);
        let rest = args.get(1..).unwrap_or(&[]);
        interp.call_function(this, &bound_this, rest)
    })
}

/// `Function.prototype.apply` — `f.apply(thisArg, argsArray)`.
#[must_use]
pub fn function_apply_helper() -> Value {
    JsFunction::native("apply", |interp, this, args| {
        let bound_this = args.first().cloned().unwrap_or(Value::Undefined);
        let rest: Vec<Value> = match args.get(1) {
            Some(Value::Array(items)) => items.borrow().clone(),
            _ => Vec::new(),
        };
        interp.call_function(this, &bound_this, &rest)
    })
}

/// `Number.prototype.toFixed`.
#[must_use]
pub fn number_to_fixed() -> Value {
    JsFunction::native("toFixed", |_, this, args| {
        let digits = args.first().map_or(0.0, Value::to_number).clamp(0.0, 100.0) as usize;
        Ok(Value::string(format!("{:.digits$}", this.to_number())))
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_float, parse_int};

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42", 10), 42.0);
        assert_eq!(parse_int("  -17px", 10), -17.0);
        assert_eq!(parse_int("ff", 16), 255.0);
        assert_eq!(parse_int("0x1F", 10), 31.0);
        assert_eq!(parse_int("101", 2), 5.0);
        assert!(parse_int("zz", 10).is_nan());
        assert!(parse_int("", 10).is_nan());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("3.5abc"), 3.5);
        assert_eq!(parse_float("  1e2 "), 100.0);
        assert!(parse_float("abc").is_nan());
    }
}
