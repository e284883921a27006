//! The `JSON` global: round-tripping between JS values and JSON text via
//! serde_json.
//!
//! Stringify follows the usual lossy mappings: functions and `undefined`
//! are omitted from objects and become `null` in arrays; `NaN` and
//! infinities become `null`. Parse maps JSON values straight onto the
//! engine's primitives, arrays, and objects.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::JsError;
use crate::value::{JsFunction, JsObject, Value};

/// Depth bound standing in for real cycle detection.
const MAX_DEPTH: usize = 128;

/// Build the `JSON` object.
#[must_use]
pub fn make_json() -> Value {
    let json = Rc::new(RefCell::new(JsObject::new()));

    json.borrow_mut().set(
        "stringify",
        JsFunction::native("stringify", |_, _, args| {
            let Some(value) = args.first() else {
                return Ok(Value::Undefined);
            };
            let Some(tree) = to_json(value, 0)? else {
                // JSON.stringify(undefined) === undefined
                return Ok(Value::Undefined);
            };
            let pretty = args.get(2).is_some_and(Value::is_truthy);
            let text = if pretty {
                serde_json::to_string_pretty(&tree)
            } else {
                serde_json::to_string(&tree)
            }
            .map_err(|e| JsError::type_error(format!("stringify failed: {e}")))?;
            Ok(Value::string(text))
        }),
    );

    json.borrow_mut().set(
        "parse",
        JsFunction::native("parse", |_, _, args| {
            let text = args.first().map_or_else(String::new, Value::to_js_string);
            let tree: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| JsError::syntax_error(format!("Unexpected token in JSON: {e}")))?;
            Ok(from_json(&tree))
        }),
    );

    Value::Object(json)
}

/// JS value → JSON tree; `None` means "omit" (functions, undefined).
fn to_json(value: &Value, depth: usize) -> Result<Option<serde_json::Value>, JsError> {
    if depth > MAX_DEPTH {
        return Err(JsError::type_error("Converting circular structure to JSON"));
    }
    Ok(match value {
        Value::Undefined | Value::Function(_) => None,
        Value::Null => Some(serde_json::Value::Null),
        Value::Boolean(b) => Some(serde_json::Value::Bool(*b)),
        Value::Number(n) => Some(
            serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        ),
        Value::Str(s) => Some(serde_json::Value::String(s.as_ref().clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.borrow().len());
            for item in items.borrow().iter() {
                // Unserializable array elements become null.
                out.push(to_json(item, depth + 1)?.unwrap_or(serde_json::Value::Null));
            }
            Some(serde_json::Value::Array(out))
        }
        Value::Object(object) => {
            let mut map = serde_json::Map::new();
            for (key, value) in object.borrow().entries() {
                if let Some(v) = to_json(&value, depth + 1)? {
                    let _ = map.insert(key, v);
                }
            }
            Some(serde_json::Value::Object(map))
        }
    })
}

/// JSON tree → JS value.
fn from_json(tree: &serde_json::Value) -> Value {
    match tree {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(Rc::new(RefCell::new(items.iter().map(from_json).collect())))
        }
        serde_json::Value::Object(map) => {
            let object = Rc::new(RefCell::new(JsObject::new()));
            for (key, value) in map {
                object.borrow_mut().set(key, from_json(value));
            }
            Value::Object(object)
        }
    }
}
